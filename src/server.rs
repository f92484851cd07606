//! Router assembly: REST API, WebSocket endpoint, and HTTP middleware.

use std::time::Duration;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::get;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::config::GatewayConfig;
use crate::ws::handler::ws_handler;

/// Builds the full application router.
///
/// REST routes get a request timeout; the WebSocket route does not, since
/// the upgraded connection outlives the request.
pub fn build_app(state: AppState, config: &GatewayConfig) -> Router {
    let rest = api::build_router().layer(TimeoutLayer::new(Duration::from_secs(
        config.request_timeout_secs,
    )));

    Router::new()
        .merge(rest)
        .route("/ws/{client_id}", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
        .with_state(state)
}

/// Permissive when `origins` contains `*`, otherwise an exact allow-list.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
