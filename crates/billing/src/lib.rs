//! Cloud Billing API client for budget enforcement.
//!
//! This crate provides the billing-backend capability used by the enforcer:
//! listing the projects attached to a billing account, reading a project's
//! billing state, and disabling billing on a project.
//!
//! The [`BillingBackend`] trait is the seam the enforcement pipeline is
//! written against; [`GcpBilling`] implements it on top of the Google Cloud
//! Billing REST API (`cloudbilling.googleapis.com/v1`).

pub mod backend;
pub mod gcp;

pub use backend::{BillingBackend, BillingError, ProjectBillingInfo};
pub use gcp::GcpBilling;
