//! Google Cloud Billing API integration.

mod client;
mod models;

pub use client::GcpBilling;
pub use models::ListProjectBillingInfoResponse;
