//! Top-level budget notification handler.
//!
//! Drives the full pipeline for one delivery: normalize the event, classify
//! it, report the classification, and run enforcement when the account is
//! hard over budget.

use billing::BillingBackend;
use notify::{Notifier, Severity};
use tracing::warn;

use crate::classify::{classify, Classification};
use crate::config::Config;
use crate::enforce::{enforce_account, EnforcementSummary, ProjectEnforcer};
use crate::event::{parse_event, EventError, PushEnvelope};

/// Handle one budget notification delivery.
///
/// Always emits exactly one classification notification. Enforcement runs
/// only for [`Classification::HardOverbudget`], and only when a host project
/// is configured (the safety valve for accidental deployment); for every
/// other classification the summary is empty.
///
/// # Errors
/// Returns [`EventError`] when the envelope is malformed; no billing calls
/// are made in that case.
pub async fn handle_budget_event(
    envelope: &PushEnvelope,
    config: &Config,
    backend: &dyn BillingBackend,
    notifier: &Notifier,
) -> Result<(Classification, EnforcementSummary), EventError> {
    let event = parse_event(envelope)?;

    let (classification, message) = classify(&event);
    let severity = match classification {
        Classification::HardOverbudget => Severity::Alert,
        Classification::NoThresholdCrossed
        | Classification::AlertThreshold
        | Classification::ForecastThreshold => Severity::Notice,
    };
    notifier.notify(severity, &message).await;

    if classification != Classification::HardOverbudget {
        return Ok((classification, Vec::new()));
    }

    if config.host_project_id.is_none() {
        warn!(
            billing_account = %event.billing_account_id,
            "No host project configured, skipping enforcement"
        );
        return Ok((classification, Vec::new()));
    }

    let enforcer = ProjectEnforcer::default();
    let summary = enforce_account(
        &event.billing_account_id,
        &config.exempt_projects,
        &enforcer,
        backend,
        notifier,
    )
    .await;

    Ok((classification, summary))
}
