//! Billing backend trait and common types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during billing backend operations.
#[derive(Error, Debug)]
pub enum BillingError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Authentication error.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Billing state of a single project.
///
/// Mirrors the Cloud Billing `ProjectBillingInfo` resource. `billingEnabled`
/// is absent on the wire when billing is off, so it defaults to `false`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectBillingInfo {
    /// Resource name, e.g. `projects/my-project/billingInfo`.
    pub name: String,
    /// Raw project id, e.g. `my-project`.
    pub project_id: String,
    /// Billing account the project draws from; empty when billing is disabled.
    pub billing_account_name: String,
    /// Whether billing is currently enabled for the project.
    pub billing_enabled: bool,
}

/// Trait for billing backends.
///
/// Project identifiers are raw ids (`my-project`), never the
/// `projects/<id>` resource form; implementations build resource paths
/// themselves.
#[async_trait]
pub trait BillingBackend: Send + Sync {
    /// List the ids of all projects attached to a billing account,
    /// in the order the backend returns them.
    async fn list_projects(&self, billing_account_id: &str) -> Result<Vec<String>, BillingError>;

    /// Read the billing state of a project.
    async fn get_billing_info(&self, project_id: &str)
        -> Result<ProjectBillingInfo, BillingError>;

    /// Disable billing on a project by clearing its billing account
    /// association. Disabling an already-disabled project is a no-op
    /// on the backend side.
    async fn disable_billing(&self, project_id: &str)
        -> Result<ProjectBillingInfo, BillingError>;
}
