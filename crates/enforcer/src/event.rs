//! Budget notification parsing.
//!
//! Normalizes a Pub/Sub push delivery of a billing-budget notification into
//! a typed [`BudgetEvent`]. Parsing is pure: no side effects, deterministic,
//! and safe to call repeatedly on the same envelope.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use thiserror::Error;

/// Attribute carrying the billing account id on budget notifications.
const ATTR_BILLING_ACCOUNT_ID: &str = "billingAccountId";

/// Errors produced while normalizing a notification.
///
/// Every variant means the same thing to the pipeline: the event is
/// malformed, classification is aborted and no enforcement action is taken.
#[derive(Debug, Error)]
pub enum EventError {
    /// A required message attribute is missing
    #[error("missing required attribute: {0}")]
    MissingAttribute(&'static str),

    /// The message carries no data payload
    #[error("notification has no data payload")]
    MissingData,

    /// The data field is not valid base64
    #[error("data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded data is not valid UTF-8
    #[error("data is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The decoded data is not a valid budget notification body
    #[error("data is not a valid budget notification: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pub/Sub push delivery envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct PushEnvelope {
    /// The wrapped Pub/Sub message.
    pub message: PushMessage,
    /// Subscription that delivered the message.
    #[serde(default)]
    pub subscription: Option<String>,
}

/// A Pub/Sub message as delivered by a push subscription.
#[derive(Debug, Clone, Deserialize)]
pub struct PushMessage {
    /// Base64-encoded notification body.
    #[serde(default)]
    pub data: Option<String>,
    /// Message attributes; budget notifications carry `billingAccountId` here.
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    /// Server-assigned message id.
    #[serde(default, rename = "messageId")]
    pub message_id: Option<String>,
}

/// Decoded budget notification body.
///
/// The real notification format carries additional fields
/// (`budgetAmountType`, `costIntervalStart`, ...) which are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BudgetNotification {
    budget_display_name: String,
    cost_amount: f64,
    budget_amount: f64,
    #[serde(default)]
    alert_threshold_exceeded: Option<f64>,
    #[serde(default)]
    forecast_threshold_exceeded: Option<f64>,
}

/// A normalized budget notification event.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetEvent {
    /// Billing account the notification is about.
    pub billing_account_id: String,
    /// Display name of the budget.
    pub budget_name: String,
    /// Cost accrued so far in the budget period.
    pub cost_amount: f64,
    /// Configured budget amount.
    pub budget_amount: f64,
    /// Fraction of the budget whose alert threshold was crossed, if any.
    pub alert_threshold_fraction: Option<f64>,
    /// Fraction of the budget forecast to be crossed, if any.
    pub forecast_threshold_fraction: Option<f64>,
}

/// Parse a push envelope into a [`BudgetEvent`].
///
/// The billing account id comes from the message attributes; everything else
/// from the base64-encoded JSON body. At most one of the threshold fields is
/// expected per delivery; when both appear the classifier gives the alert
/// threshold priority.
///
/// # Errors
/// Returns [`EventError`] when the attribute is missing or the body cannot
/// be decoded.
pub fn parse_event(envelope: &PushEnvelope) -> Result<BudgetEvent, EventError> {
    let billing_account_id = envelope
        .message
        .attributes
        .get(ATTR_BILLING_ACCOUNT_ID)
        .cloned()
        .ok_or(EventError::MissingAttribute(ATTR_BILLING_ACCOUNT_ID))?;

    let data = envelope.message.data.as_deref().ok_or(EventError::MissingData)?;
    let decoded = BASE64.decode(data)?;
    let body = String::from_utf8(decoded)?;
    let notification: BudgetNotification = serde_json::from_str(&body)?;

    Ok(BudgetEvent {
        billing_account_id,
        budget_name: notification.budget_display_name,
        cost_amount: notification.cost_amount,
        budget_amount: notification.budget_amount,
        alert_threshold_fraction: notification.alert_threshold_exceeded,
        forecast_threshold_fraction: notification.forecast_threshold_exceeded,
    })
}

/// Render a raw dump of the envelope: attributes as JSON plus the decoded
/// body, with placeholders when either is absent.
///
/// Used by the dump endpoint that forwards notifications verbatim to chat.
#[must_use]
pub fn describe_envelope(envelope: &PushEnvelope) -> String {
    let attributes = if envelope.message.attributes.is_empty() {
        "No attributes passed in".to_string()
    } else {
        serde_json::to_string(&envelope.message.attributes)
            .unwrap_or_else(|_| "No attributes passed in".to_string())
    };

    let data = envelope
        .message
        .data
        .as_deref()
        .and_then(|d| BASE64.decode(d).ok())
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| "No data passed in".to_string());

    format!("{attributes}, {data}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(body: &serde_json::Value, attributes: &[(&str, &str)]) -> PushEnvelope {
        PushEnvelope {
            message: PushMessage {
                data: Some(BASE64.encode(body.to_string())),
                attributes: attributes
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
                message_id: Some("123".to_string()),
            },
            subscription: None,
        }
    }

    #[test]
    fn test_parse_complete_notification() {
        let envelope = envelope(
            &serde_json::json!({
                "budgetDisplayName": "team-budget",
                "costAmount": 80.0,
                "budgetAmount": 100.0,
                "alertThresholdExceeded": 0.5,
                "budgetAmountType": "SPECIFIED_AMOUNT"
            }),
            &[("billingAccountId", "012345-6789AB-CDEF01")],
        );

        let event = parse_event(&envelope).expect("Should parse");
        assert_eq!(event.billing_account_id, "012345-6789AB-CDEF01");
        assert_eq!(event.budget_name, "team-budget");
        assert!((event.cost_amount - 80.0).abs() < f64::EPSILON);
        assert!((event.budget_amount - 100.0).abs() < f64::EPSILON);
        assert_eq!(event.alert_threshold_fraction, Some(0.5));
        assert_eq!(event.forecast_threshold_fraction, None);
    }

    #[test]
    fn test_parse_without_threshold_fields() {
        let envelope = envelope(
            &serde_json::json!({
                "budgetDisplayName": "team-budget",
                "costAmount": 10.0,
                "budgetAmount": 100.0
            }),
            &[("billingAccountId", "ACC")],
        );

        let event = parse_event(&envelope).expect("Should parse");
        assert_eq!(event.alert_threshold_fraction, None);
        assert_eq!(event.forecast_threshold_fraction, None);
    }

    #[test]
    fn test_missing_billing_account_attribute() {
        let envelope = envelope(
            &serde_json::json!({
                "budgetDisplayName": "team-budget",
                "costAmount": 10.0,
                "budgetAmount": 100.0
            }),
            &[],
        );

        let err = parse_event(&envelope).expect_err("Should fail");
        assert!(matches!(err, EventError::MissingAttribute("billingAccountId")));
    }

    #[test]
    fn test_missing_budget_amount_is_malformed() {
        let envelope = envelope(
            &serde_json::json!({
                "budgetDisplayName": "team-budget",
                "costAmount": 10.0
            }),
            &[("billingAccountId", "ACC")],
        );

        let err = parse_event(&envelope).expect_err("Should fail");
        assert!(matches!(err, EventError::Json(_)));
    }

    #[test]
    fn test_invalid_base64_is_malformed() {
        let envelope = PushEnvelope {
            message: PushMessage {
                data: Some("not base64!!!".to_string()),
                attributes: [("billingAccountId".to_string(), "ACC".to_string())]
                    .into_iter()
                    .collect(),
                message_id: None,
            },
            subscription: None,
        };

        let err = parse_event(&envelope).expect_err("Should fail");
        assert!(matches!(err, EventError::Base64(_)));
    }

    #[test]
    fn test_missing_data_is_malformed() {
        let envelope = PushEnvelope {
            message: PushMessage {
                data: None,
                attributes: [("billingAccountId".to_string(), "ACC".to_string())]
                    .into_iter()
                    .collect(),
                message_id: None,
            },
            subscription: None,
        };

        let err = parse_event(&envelope).expect_err("Should fail");
        assert!(matches!(err, EventError::MissingData));
    }

    #[test]
    fn test_describe_envelope_with_placeholders() {
        let envelope = PushEnvelope {
            message: PushMessage {
                data: None,
                attributes: HashMap::new(),
                message_id: None,
            },
            subscription: None,
        };

        assert_eq!(
            describe_envelope(&envelope),
            "No attributes passed in, No data passed in"
        );
    }

    #[test]
    fn test_describe_envelope_with_content() {
        let envelope = envelope(
            &serde_json::json!({"costAmount": 1.0}),
            &[("billingAccountId", "ACC")],
        );

        let dump = describe_envelope(&envelope);
        assert!(dump.contains("billingAccountId"));
        assert!(dump.contains("costAmount"));
    }
}
