//! Cloud Billing API client implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use super::models::{DisableBillingRequest, ListProjectBillingInfoResponse};
use crate::backend::{BillingBackend, BillingError, ProjectBillingInfo};

/// Cloud Billing API base URL.
const API_BASE: &str = "https://cloudbilling.googleapis.com/v1";

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Google Cloud Billing backend.
#[derive(Clone)]
pub struct GcpBilling {
    /// HTTP client.
    client: Client,
    /// Access token (from service account or user).
    access_token: String,
    /// API base URL, overridable for tests.
    base_url: String,
}

impl GcpBilling {
    /// Create a new Cloud Billing client.
    ///
    /// # Arguments
    /// * `access_token` - `OAuth2` access token with billing admin scope
    ///
    /// # Errors
    /// Returns error if the token is empty or the HTTP client cannot be
    /// created.
    pub fn new(access_token: impl Into<String>) -> Result<Self, BillingError> {
        let access_token = access_token.into();
        if access_token.is_empty() {
            return Err(BillingError::Auth(
                "Cloud Billing access token is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(BillingError::Http)?;

        Ok(Self {
            client,
            access_token,
            base_url: API_BASE.to_string(),
        })
    }

    /// Point the client at a different API base URL (used in tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Strip an optional `billingAccounts/` resource prefix.
    fn account_id(id: &str) -> &str {
        id.strip_prefix("billingAccounts/").unwrap_or(id)
    }

    /// Strip an optional `projects/` resource prefix.
    fn project_id(id: &str) -> &str {
        id.strip_prefix("projects/").unwrap_or(id)
    }

    /// Make an authenticated GET request.
    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, BillingError> {
        debug!(url = %url, "GET request");

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Make an authenticated PUT request.
    async fn put<T, B>(&self, url: &str, body: &B) -> Result<T, BillingError>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize,
    {
        debug!(url = %url, "PUT request");

        let response = self
            .client
            .put(url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Handle API response.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BillingError> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str(&text).map_err(|e| {
                warn!(error = %e, body = %text, "Failed to parse response");
                BillingError::Serialization(e)
            })
        } else if status == StatusCode::NOT_FOUND {
            Err(BillingError::NotFound(text))
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(BillingError::Auth(text))
        } else {
            Err(BillingError::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}

#[async_trait]
impl BillingBackend for GcpBilling {
    async fn list_projects(&self, billing_account_id: &str) -> Result<Vec<String>, BillingError> {
        let account = Self::account_id(billing_account_id);

        let mut project_ids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let url = match &page_token {
                Some(token) => format!(
                    "{}/billingAccounts/{}/projects?pageToken={}",
                    self.base_url, account, token
                ),
                None => format!("{}/billingAccounts/{}/projects", self.base_url, account),
            };

            let page: ListProjectBillingInfoResponse = self.get(&url).await?;
            project_ids.extend(page.project_billing_info.into_iter().map(|p| p.project_id));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        info!(
            billing_account = %account,
            project_count = project_ids.len(),
            "Listed projects for billing account"
        );

        Ok(project_ids)
    }

    async fn get_billing_info(
        &self,
        project_id: &str,
    ) -> Result<ProjectBillingInfo, BillingError> {
        let project = Self::project_id(project_id);

        let url = format!("{}/projects/{}/billingInfo", self.base_url, project);
        self.get(&url).await
    }

    async fn disable_billing(
        &self,
        project_id: &str,
    ) -> Result<ProjectBillingInfo, BillingError> {
        let project = Self::project_id(project_id);

        info!(project = %project, "Disabling billing");

        let url = format!("{}/projects/{}/billingInfo", self.base_url, project);
        let info: ProjectBillingInfo = self.put(&url, &DisableBillingRequest::new()).await?;

        info!(project = %project, "Billing disabled");
        Ok(info)
    }
}
