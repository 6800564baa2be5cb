//! HTTP server receiving Pub/Sub push deliveries.
//!
//! Provides endpoints for:
//! - Health checks
//! - Budget notification push deliveries (the enforcement entry point)
//! - Raw notification dumps forwarded to chat without enforcement

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use billing::BillingBackend;
use notify::{Notifier, Severity};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Config;
use crate::event::{describe_envelope, PushEnvelope};
use crate::handler::handle_budget_event;

/// Server state shared across handlers.
pub struct AppState {
    /// Process configuration
    pub config: Config,
    /// Billing backend
    pub backend: Arc<dyn BillingBackend>,
    /// Notification dispatcher
    pub notifier: Notifier,
}

/// Build the HTTP router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/pubsub/push", post(push_handler))
        .route("/pubsub/dump", post(dump_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// # Errors
///
/// Returns an error if the server fails to bind or serve.
pub async fn run_server(state: Arc<AppState>, addr: &str) -> anyhow::Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Budget enforcer listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check handler.
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Budget notification handler - main entry point for enforcement.
///
/// Always acks with 204: redelivery cannot fix a malformed notification,
/// and enforcement failures are already converted into notified outcomes.
/// The body is decoded by hand so that even a delivery that is not a valid
/// envelope gets acked instead of looping through redelivery.
async fn push_handler(State(state): State<Arc<AppState>>, body: Bytes) -> StatusCode {
    let envelope: PushEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            state
                .notifier
                .notify(
                    Severity::Error,
                    &format!("Discarding undecodable push delivery: {e}"),
                )
                .await;
            return StatusCode::NO_CONTENT;
        }
    };

    info!(
        message_id = envelope.message.message_id.as_deref().unwrap_or("-"),
        "Received budget notification"
    );

    match handle_budget_event(&envelope, &state.config, state.backend.as_ref(), &state.notifier)
        .await
    {
        Ok((classification, summary)) => {
            info!(
                classification = ?classification,
                outcomes = summary.len(),
                "Budget notification handled"
            );
        }
        Err(e) => {
            state
                .notifier
                .notify(
                    Severity::Error,
                    &format!("Discarding malformed budget notification: {e}"),
                )
                .await;
        }
    }

    StatusCode::NO_CONTENT
}

/// Raw dump handler - forwards the notification content to chat verbatim.
async fn dump_handler(State(state): State<Arc<AppState>>, body: Bytes) -> StatusCode {
    match serde_json::from_slice::<PushEnvelope>(&body) {
        Ok(envelope) => {
            let dump = describe_envelope(&envelope);
            state.notifier.notify(Severity::Notice, &dump).await;
        }
        Err(e) => {
            error!(error = %e, "Discarding undecodable dump delivery");
        }
    }

    StatusCode::NO_CONTENT
}
