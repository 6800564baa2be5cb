//! Billing enforcement: per-project disablement and account-wide orchestration.
//!
//! This is the only part of the pipeline with irreversible side effects.
//! Every failure path is converted into a recorded outcome plus a
//! notification; nothing here raises past the orchestrator boundary, so one
//! project's failure never stops processing of the rest.

use billing::BillingBackend;
use notify::{Notifier, Severity};
use serde::Serialize;
use tracing::{debug, info};

use crate::exempt::ExemptionSet;

/// What happened to one project during an enforcement run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectAction {
    /// Project is on the exemption list; untouched.
    Exempted,
    /// Billing was already off; no mutation issued.
    AlreadyDisabled,
    /// Billing was on and has been disabled.
    Disabled,
    /// The billing-state read failed; enforcement proceeded fail-open.
    CheckFailed,
    /// The disable mutation was rejected; the project keeps spending.
    DisableFailed,
}

impl ProjectAction {
    /// Get display name for this action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exempted => "exempted",
            Self::AlreadyDisabled => "already_disabled",
            Self::Disabled => "disabled",
            Self::CheckFailed => "check_failed",
            Self::DisableFailed => "disable_failed",
        }
    }
}

/// Outcome for a single project, recorded once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectOutcome {
    /// Raw project id.
    pub project_id: String,
    /// Action taken (or not taken) for the project.
    pub action: ProjectAction,
}

/// Ordered per-project outcomes of one enforcement run, one entry per
/// project returned by the listing call.
pub type EnforcementSummary = Vec<ProjectOutcome>;

/// Disables billing on a single project.
#[derive(Debug, Clone)]
pub struct ProjectEnforcer {
    /// When the billing-state read fails, assume billing is enabled and
    /// attempt the disable anyway. An unreachable check must not silently
    /// skip enforcement.
    pub fail_open_on_check_error: bool,
}

impl Default for ProjectEnforcer {
    fn default() -> Self {
        Self {
            fail_open_on_check_error: true,
        }
    }
}

impl ProjectEnforcer {
    /// Check a project's billing state and disable it if enabled.
    ///
    /// Each outcome triggers exactly one notification naming the project and
    /// the action; a fail-open check failure notifies once for the failed
    /// check and once for the subsequent disable attempt.
    pub async fn enforce(
        &self,
        project_id: &str,
        backend: &dyn BillingBackend,
        notifier: &Notifier,
    ) -> ProjectAction {
        let check_failed = match backend.get_billing_info(project_id).await {
            Ok(info) => {
                if !info.billing_enabled {
                    debug!(project = %project_id, "Billing already disabled");
                    notifier
                        .notify(
                            Severity::Notice,
                            &format!("Billing already disabled on project \"{project_id}\"."),
                        )
                        .await;
                    return ProjectAction::AlreadyDisabled;
                }
                false
            }
            Err(e) => {
                notifier
                    .notify(
                        Severity::Warning,
                        &format!(
                            "Unable to determine if billing is enabled on project \
                             \"{project_id}\", assuming billing is enabled. ({e})"
                        ),
                    )
                    .await;
                if !self.fail_open_on_check_error {
                    return ProjectAction::CheckFailed;
                }
                true
            }
        };

        match backend.disable_billing(project_id).await {
            Ok(_) => {
                info!(project = %project_id, "Billing disabled");
                notifier
                    .notify(
                        Severity::Notice,
                        &format!("Billing disabled on project \"{project_id}\"."),
                    )
                    .await;
                if check_failed {
                    ProjectAction::CheckFailed
                } else {
                    ProjectAction::Disabled
                }
            }
            Err(e) => {
                // Terminal for this project: overspend continues until a
                // human intervenes.
                notifier
                    .notify(
                        Severity::Critical,
                        &format!(
                            "!!! FAILED to disable billing on project \"{project_id}\"! ({e})"
                        ),
                    )
                    .await;
                if check_failed {
                    ProjectAction::CheckFailed
                } else {
                    ProjectAction::DisableFailed
                }
            }
        }
    }
}

/// Run enforcement over every project attached to a billing account.
///
/// Projects are processed sequentially in listing order. Listing failure
/// aborts the run with an empty summary; per-project failures are recorded
/// and the loop continues. The returned summary has one entry per listed
/// project.
pub async fn enforce_account(
    billing_account_id: &str,
    exemptions: &ExemptionSet,
    enforcer: &ProjectEnforcer,
    backend: &dyn BillingBackend,
    notifier: &Notifier,
) -> EnforcementSummary {
    let projects = match backend.list_projects(billing_account_id).await {
        Ok(projects) => projects,
        Err(e) => {
            notifier
                .notify(
                    Severity::Error,
                    &format!(
                        "Failed to list projects for billing account \
                         \"{billing_account_id}\": {e}. No enforcement action taken."
                    ),
                )
                .await;
            return Vec::new();
        }
    };

    info!(
        billing_account = %billing_account_id,
        project_count = projects.len(),
        "Starting billing enforcement"
    );

    let mut summary = EnforcementSummary::with_capacity(projects.len());

    for project in &projects {
        // Listing may hand back `projects/<id>` resource names; the
        // exemption list and billing calls use raw ids.
        let project_id = project.strip_prefix("projects/").unwrap_or(project);

        let action = if exemptions.contains(project_id) {
            notifier
                .notify(
                    Severity::Warning,
                    &format!("Project \"{project_id}\" is excluded from billing enforcement."),
                )
                .await;
            ProjectAction::Exempted
        } else {
            enforcer.enforce(project_id, backend, notifier).await
        };

        summary.push(ProjectOutcome {
            project_id: project_id.to_string(),
            action,
        });
    }

    info!(
        billing_account = %billing_account_id,
        outcomes = summary.len(),
        "Enforcement run complete"
    );

    summary
}
