//! Budget-enforcement handler.
//!
//! Receives billing-budget notifications, classifies them against alert and
//! hard-budget thresholds, and disables billing on every non-exempt project
//! of an account that has exceeded its budget.
//!
//! Pipeline: push envelope → [`event::parse_event`] → [`classify::classify`]
//! → notification → (hard overbudget only) [`enforce::enforce_account`].
//!
//! Each invocation is stateless; the only state that survives is the
//! read-only exemption set loaded at startup. All failures are converted to
//! logged/notified outcomes - one project's failure never stops the run.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classify;
pub mod config;
pub mod enforce;
pub mod event;
pub mod exempt;
pub mod handler;
pub mod server;

pub use classify::{classify, Classification};
pub use config::Config;
pub use enforce::{
    enforce_account, EnforcementSummary, ProjectAction, ProjectEnforcer, ProjectOutcome,
};
pub use event::{parse_event, BudgetEvent, EventError, PushEnvelope, PushMessage};
pub use exempt::ExemptionSet;
pub use handler::handle_budget_event;
