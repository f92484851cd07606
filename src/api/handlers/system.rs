//! System endpoints: health check, service banner, ICE config, live stats.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::dto::{IceConfigResponse, ServiceInfoResponse};
use crate::app_state::AppState;
use crate::service::EngineStats;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /api/`: Service banner.
#[utoipa::path(
    get,
    path = "/api/",
    tag = "System",
    summary = "Service banner",
    responses(
        (status = 200, description = "Service is online", body = ServiceInfoResponse),
    )
)]
pub async fn root_handler() -> impl IntoResponse {
    Json(ServiceInfoResponse {
        message: "Random Chat API".to_string(),
        status: "online".to_string(),
    })
}

/// `GET /api/config`: ICE servers for `RTCPeerConnection`.
#[utoipa::path(
    get,
    path = "/api/config",
    tag = "System",
    summary = "WebRTC ICE configuration",
    description = "Returns the STUN/TURN servers clients should pass to `RTCPeerConnection`.",
    responses(
        (status = 200, description = "ICE server list", body = IceConfigResponse),
    )
)]
pub async fn ice_config_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(IceConfigResponse::from_urls(&state.ice_servers))
}

/// `GET /api/stats`: Live pairing counters.
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "System",
    summary = "Live counters",
    description = "Connected clients, clients waiting for a partner, and open rooms. The three numbers come from one consistent snapshot.",
    responses(
        (status = 200, description = "Current counters", body = EngineStats),
    )
)]
pub async fn stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.engine.stats().await)
}

/// System routes mounted at the root level (not under `/api`).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api", get(root_handler))
        .route("/api/", get(root_handler))
}

/// Service routes mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/config", get(ice_config_handler))
        .route("/stats", get(stats_handler))
}
