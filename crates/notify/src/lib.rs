//! Structured-log and chat notifications for budget enforcement.
//!
//! Every decision point in the enforcement pipeline reports through a
//! [`Notifier`]: each call emits exactly one structured log record, then
//! forwards the message to any configured chat channels on a best-effort
//! basis. Chat delivery failures are logged and swallowed; they never
//! propagate into the pipeline.
//!
//! # Usage
//!
//! ```no_run
//! use notify::{Notifier, Severity};
//!
//! # async fn example() {
//! let notifier = Notifier::from_env();
//! notifier
//!     .notify(Severity::Notice, "No budget threshold exceeded.")
//!     .await;
//! # }
//! ```
//!
//! # Configuration
//!
//! - `SLACK_ACCESS_TOKEN`: Slack bot token (enables the Slack channel)
//! - `SLACK_CHANNEL`: channel id or name messages are posted to

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod channels;
pub mod error;
pub mod severity;

pub use channels::slack::SlackChannel;
pub use channels::NotifyChannel;
pub use error::ChannelError;
pub use severity::Severity;

use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Central notification dispatcher.
///
/// Owns the configured channels and guarantees the one-log-record-per-call
/// contract regardless of chat delivery outcomes.
pub struct Notifier {
    channels: Vec<Arc<dyn NotifyChannel>>,
}

impl Notifier {
    /// Create a new notifier from environment variables.
    ///
    /// Auto-detects which channels are configured and enables them
    /// accordingly.
    #[must_use]
    pub fn from_env() -> Self {
        let mut channels: Vec<Arc<dyn NotifyChannel>> = vec![];

        let slack = SlackChannel::from_env();
        if slack.enabled() {
            info!("Slack notifications enabled");
            channels.push(Arc::new(slack));
        }

        if channels.is_empty() {
            warn!("No notification channels configured, logging only");
        }

        Self { channels }
    }

    /// Create a notifier with specific channels.
    #[must_use]
    pub fn with_channels(channels: Vec<Arc<dyn NotifyChannel>>) -> Self {
        Self { channels }
    }

    /// Create a log-only notifier (no chat channels).
    #[must_use]
    pub const fn disabled() -> Self {
        Self { channels: vec![] }
    }

    /// Check if any chat channels are enabled.
    #[must_use]
    pub fn has_channels(&self) -> bool {
        self.channels.iter().any(|c| c.enabled())
    }

    /// Emit one structured log record and forward the message to all
    /// enabled channels.
    ///
    /// Delivery failures are logged and otherwise ignored.
    pub async fn notify(&self, severity: Severity, text: &str) {
        match severity {
            Severity::Notice => info!(severity = severity.as_str(), "{text}"),
            Severity::Warning => warn!(severity = severity.as_str(), "{text}"),
            Severity::Error | Severity::Critical | Severity::Alert => {
                error!(severity = severity.as_str(), "{text}");
            }
        }

        for channel in &self.channels {
            let channel_name = channel.name();

            if !channel.enabled() {
                debug!(channel = channel_name, "Channel disabled, skipping");
                continue;
            }

            if let Err(e) = channel.send(severity, text).await {
                error!(
                    channel = channel_name,
                    error = %e,
                    "Failed to deliver notification"
                );
            }
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingChannel {
        enabled: bool,
        sends: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl NotifyChannel for CountingChannel {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn enabled(&self) -> bool {
            self.enabled
        }

        async fn send(&self, _severity: Severity, _text: &str) -> Result<(), ChannelError> {
            self.sends.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_disabled_notifier_has_no_channels() {
        let notifier = Notifier::disabled();
        assert!(!notifier.has_channels());
    }

    #[tokio::test]
    async fn test_disabled_channel_is_skipped() {
        let channel = Arc::new(CountingChannel {
            enabled: false,
            sends: AtomicUsize::new(0),
        });
        let notifier = Notifier::with_channels(vec![channel.clone()]);

        notifier.notify(Severity::Notice, "hello").await;

        assert_eq!(channel.sends.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_enabled_channel_receives_message() {
        let channel = Arc::new(CountingChannel {
            enabled: true,
            sends: AtomicUsize::new(0),
        });
        let notifier = Notifier::with_channels(vec![channel.clone()]);

        notifier.notify(Severity::Critical, "disable failed").await;

        assert_eq!(channel.sends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_channel_failure_is_swallowed() {
        struct FailingChannel;

        #[async_trait::async_trait]
        impl NotifyChannel for FailingChannel {
            fn name(&self) -> &'static str {
                "failing"
            }

            fn enabled(&self) -> bool {
                true
            }

            async fn send(&self, _severity: Severity, _text: &str) -> Result<(), ChannelError> {
                Err(ChannelError::Rejected("channel_not_found".to_string()))
            }
        }

        let notifier = Notifier::with_channels(vec![Arc::new(FailingChannel)]);

        // Must not panic or propagate.
        notifier.notify(Severity::Error, "listing failed").await;
    }
}
