//! Error types for the notification system.

use thiserror::Error;

/// Errors that can occur when delivering notifications.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Channel is not configured
    #[error("Channel not configured: {0}")]
    NotConfigured(String),

    /// The service rejected the message
    #[error("Delivery rejected: {0}")]
    Rejected(String),
}
