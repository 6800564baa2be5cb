//! Slack Web API notification channel.
//!
//! Posts plain-text messages via `chat.postMessage` with a bot token.
//! When no token is configured the channel is disabled and never touches
//! the network.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ChannelError;
use crate::severity::Severity;
use crate::NotifyChannel;

/// Environment variable for the Slack bot access token.
const ENV_SLACK_ACCESS_TOKEN: &str = "SLACK_ACCESS_TOKEN";

/// Environment variable for the Slack channel id or name.
const ENV_SLACK_CHANNEL: &str = "SLACK_CHANNEL";

/// Slack Web API base URL.
const SLACK_API_BASE: &str = "https://slack.com/api";

/// Slack Web API notification channel.
pub struct SlackChannel {
    token: Option<String>,
    channel: String,
    client: reqwest::Client,
    base_url: String,
}

impl SlackChannel {
    /// Create a new Slack channel from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let token = std::env::var(ENV_SLACK_ACCESS_TOKEN)
            .ok()
            .filter(|t| !t.is_empty());
        let channel = std::env::var(ENV_SLACK_CHANNEL).unwrap_or_default();

        if token.is_some() {
            debug!("Slack notifications enabled");
        } else {
            debug!("Slack notifications disabled (SLACK_ACCESS_TOKEN not set)");
        }

        Self {
            token,
            channel,
            client: reqwest::Client::new(),
            base_url: SLACK_API_BASE.to_string(),
        }
    }

    /// Create a Slack channel with a specific token and channel.
    ///
    /// An empty token disables the channel, matching the behavior of
    /// [`SlackChannel::from_env`] with the variable unset.
    #[must_use]
    pub fn new(token: impl Into<String>, channel: impl Into<String>) -> Self {
        let token = Some(token.into()).filter(|t| !t.is_empty());
        Self {
            token,
            channel: channel.into(),
            client: reqwest::Client::new(),
            base_url: SLACK_API_BASE.to_string(),
        }
    }

    /// Point the channel at a different API base URL (used in tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl NotifyChannel for SlackChannel {
    fn name(&self) -> &'static str {
        "slack"
    }

    fn enabled(&self) -> bool {
        self.token.is_some()
    }

    async fn send(&self, severity: Severity, text: &str) -> Result<(), ChannelError> {
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| ChannelError::NotConfigured(ENV_SLACK_ACCESS_TOKEN.to_string()))?;

        debug!(channel = "slack", severity = %severity, "Sending notification");

        let payload = PostMessageRequest {
            channel: &self.channel,
            text,
        };

        let response = self
            .client
            .post(format!("{}/chat.postMessage", self.base_url))
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                channel = "slack",
                status = %status,
                body = %body,
                "Slack API request failed"
            );
            return Err(ChannelError::Rejected(format!(
                "Slack returned {status}: {body}"
            )));
        }

        // Slack reports API-level failures with 200 and {"ok": false}.
        let body: PostMessageResponse = response.json().await?;
        if body.ok {
            debug!(channel = "slack", "Notification sent successfully");
            Ok(())
        } else {
            let reason = body.error.unwrap_or_else(|| "unknown error".to_string());
            warn!(channel = "slack", error = %reason, "Slack rejected message");
            Err(ChannelError::Rejected(reason))
        }
    }
}

// =============================================================================
// Slack API types
// =============================================================================

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_disables_channel() {
        let channel = SlackChannel::new("", "#billing");
        assert!(!channel.enabled());
    }

    #[test]
    fn test_token_enables_channel() {
        let channel = SlackChannel::new("xoxb-test", "#billing");
        assert!(channel.enabled());
    }
}
