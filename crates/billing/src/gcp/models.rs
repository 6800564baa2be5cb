//! Wire models for the Cloud Billing REST API.

use serde::Deserialize;

use crate::backend::ProjectBillingInfo;

/// Response page of `billingAccounts.projects.list`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectBillingInfoResponse {
    /// Billing info for the projects on this page.
    #[serde(default)]
    pub project_billing_info: Vec<ProjectBillingInfo>,
    /// Token for the next page; absent on the last page.
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Request body of `projects.updateBillingInfo` when disabling billing.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisableBillingRequest {
    /// Clearing the billing account name detaches the project.
    pub billing_account_name: String,
}

impl DisableBillingRequest {
    pub fn new() -> Self {
        Self {
            billing_account_name: String::new(),
        }
    }
}

impl Default for DisableBillingRequest {
    fn default() -> Self {
        Self::new()
    }
}
