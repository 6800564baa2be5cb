//! HTTP-level tests for the Slack channel against a mock server.

use notify::{ChannelError, NotifyChannel, SlackChannel, Severity};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn posts_message_with_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .and(header("Authorization", "Bearer xoxb-test"))
        .and(body_json(serde_json::json!({
            "channel": "#billing-alerts",
            "text": "Billing disabled on project \"p1\"."
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let channel = SlackChannel::new("xoxb-test", "#billing-alerts").with_base_url(server.uri());

    channel
        .send(Severity::Notice, "Billing disabled on project \"p1\".")
        .await
        .expect("delivery should succeed");
}

#[tokio::test]
async fn slack_level_rejection_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": false,
            "error": "channel_not_found"
        })))
        .mount(&server)
        .await;

    let channel = SlackChannel::new("xoxb-test", "#missing").with_base_url(server.uri());

    let err = channel
        .send(Severity::Warning, "exempted")
        .await
        .expect_err("ok=false should be an error");

    match err {
        ChannelError::Rejected(reason) => assert_eq!(reason, "channel_not_found"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn http_failure_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .respond_with(ResponseTemplate::new(503).set_body_string("service unavailable"))
        .mount(&server)
        .await;

    let channel = SlackChannel::new("xoxb-test", "#billing-alerts").with_base_url(server.uri());

    let err = channel
        .send(Severity::Critical, "disable failed")
        .await
        .expect_err("503 should be an error");

    assert!(matches!(err, ChannelError::Rejected(_)));
}

#[tokio::test]
async fn unconfigured_channel_never_calls_the_api() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let channel = SlackChannel::new("", "#billing-alerts").with_base_url(server.uri());
    assert!(!channel.enabled());

    let err = channel
        .send(Severity::Notice, "hello")
        .await
        .expect_err("unconfigured send should fail");
    assert!(matches!(err, ChannelError::NotConfigured(_)));
}
