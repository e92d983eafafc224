use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::core::endpoint::{Changes, Endpoint};
use crate::core::provider::Provider;
use crate::error::Error;
use crate::health::Health;

/// Media type the external-dns webhook protocol negotiates on.
pub const MEDIA_TYPE: &str = "application/external-dns.webhook+json;version=1";

#[derive(Clone)]
struct AppState {
    provider: Arc<dyn Provider>,
}

pub fn router(provider: Arc<dyn Provider>) -> Router {
    Router::new()
        .route("/", get(negotiate))
        .route("/records", get(get_records).post(apply_changes))
        .route("/adjustendpoints", post(adjust_endpoints))
        .with_state(AppState { provider })
}

/// Capability negotiation: the provider's domain filter, unmodified.
async fn negotiate(State(state): State<AppState>) -> Response {
    webhook_json(StatusCode::OK, &state.provider.domain_filter())
}

async fn get_records(State(state): State<AppState>) -> Response {
    match state.provider.records().await {
        Ok(endpoints) => webhook_json(StatusCode::OK, &endpoints),
        Err(err) => internal_error("failed to fetch records", err),
    }
}

async fn apply_changes(
    State(state): State<AppState>,
    Json(changes): Json<Changes>,
) -> Response {
    match state.provider.apply_changes(changes).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => internal_error("failed to apply changes", err),
    }
}

async fn adjust_endpoints(
    State(state): State<AppState>,
    Json(endpoints): Json<Vec<Endpoint>>,
) -> Response {
    match state.provider.adjust_endpoints(endpoints).await {
        Ok(adjusted) => webhook_json(StatusCode::OK, &adjusted),
        Err(err) => internal_error("failed to adjust endpoints", err),
    }
}

fn webhook_json<T: Serialize>(status: StatusCode, value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(MEDIA_TYPE))],
            body,
        )
            .into_response(),
        Err(err) => internal_error("failed to serialize response", Error::Provider(err.to_string())),
    }
}

fn internal_error(message: &str, err: Error) -> Response {
    error!(error = %err, "{message}");
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
}

pub async fn serve(addr: String, provider: Arc<dyn Provider>, health: Health) -> Result<(), Error> {
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "webhook server listening");

    health.set_healthy(true);
    let result = axum::serve(listener, router(provider)).await;
    health.set_healthy(false);

    result?;
    Ok(())
}
