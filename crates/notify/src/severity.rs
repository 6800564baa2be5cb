//! Notification severity levels.

use serde::{Deserialize, Serialize};

/// Severity of a notification, following Cloud Logging severity names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Normal but significant event - no action needed
    Notice,
    /// Something needs attention
    Warning,
    /// An operation failed
    Error,
    /// Immediate action required
    Critical,
    /// A person must act right now
    Alert,
}

impl Severity {
    /// Get the Cloud Logging severity name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Notice => "NOTICE",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
            Self::Alert => "ALERT",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
