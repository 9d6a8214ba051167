//! Registration API handlers.
//!
//! Each handler parses the request, calls exactly one registry operation and
//! shapes the response. Mutations that change the live set regenerate the
//! proxy document before responding. Regeneration runs on its own task, so a
//! request dropped mid-flight (timeout, client disconnect) still gets its
//! mutation published.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::http::response::{
    ApiError, ClientList, ClientView, RegisterResponse, ServiceStatus, StatusMessage,
};
use crate::http::server::AppState;
use crate::observability::metrics;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub id: String,
    // Wide type so out-of-range ports are reported as such, not as bad JSON.
    #[serde(default)]
    pub port: i64,
}

#[derive(Debug, Deserialize)]
pub struct IdParams {
    pub id: Option<String>,
}

impl IdParams {
    fn require(self) -> Result<String, ApiError> {
        self.id.filter(|id| !id.is_empty()).ok_or(ApiError::MissingId)
    }
}

// The registry has already committed; detaching the publish keeps the
// artifact in step even if the caller stops polling.
async fn publish_live_set(state: &AppState) {
    let registry = state.registry.clone();
    let publisher = state.publisher.clone();
    let task = tokio::spawn(async move { publisher.regenerate(&registry).await });

    if let Err(e) = task.await {
        tracing::error!(error = %e, "Proxy config regeneration task failed");
    }
}

pub async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RegisterResponse>, ApiError> {
    let request: RegisterRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected register body");
        metrics::record_registration("invalid_json");
        ApiError::InvalidJson
    })?;

    let record = state
        .registry
        .register(&request.id, request.port)
        .inspect_err(|e| {
            tracing::warn!(id = %request.id, port = request.port, error = %e, "Registration rejected");
            metrics::record_registration(e.kind());
        })?;

    metrics::record_registration("registered");
    tracing::info!(id = %record.display_name, port = record.port, "Client registered");
    publish_live_set(&state).await;

    Ok(Json(RegisterResponse {
        status: "registered".to_string(),
        url: state.publisher.template().hostname(&record.display_name),
    }))
}

pub async fn heartbeat(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<StatusMessage>, ApiError> {
    let id = params.require()?;

    state.registry.heartbeat(&id).inspect_err(|e| {
        tracing::debug!(id = %id, "Heartbeat for unknown client");
        metrics::record_heartbeat(e.kind());
    })?;

    metrics::record_heartbeat("ok");
    tracing::trace!(id = %id, "Heartbeat");
    Ok(Json(StatusMessage::new("ok")))
}

pub async fn unregister(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<StatusMessage>, ApiError> {
    let id = params.require()?;

    state
        .registry
        .unregister(&id)
        .inspect_err(|e| metrics::record_unregistration(e.kind()))?;

    metrics::record_unregistration("unregistered");
    tracing::info!(id = %id, "Client unregistered");
    publish_live_set(&state).await;

    Ok(Json(StatusMessage::new("unregistered")))
}

pub async fn status(State(state): State<AppState>) -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: "ok".to_string(),
        clients: state.registry.len(),
    })
}

pub async fn list_clients(State(state): State<AppState>) -> Json<ClientList> {
    let template = state.publisher.template();
    let clients = state
        .registry
        .snapshot()
        .iter()
        .map(|record| ClientView::new(record, template.hostname(&record.display_name)))
        .collect();

    Json(ClientList { clients })
}
