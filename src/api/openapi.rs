//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::dto::{
    CreateReportRequest, CreateUserRequest, IceConfigResponse, IceServerDto, ServiceInfoResponse,
};
use super::handlers::{messages, reports, system, users};
use crate::app_state::AppState;
use crate::error::{ErrorBody, ErrorResponse};
use crate::persistence::models::{Report, StoredMessage, UserProfile};
use crate::service::EngineStats;

/// Generated OpenAPI description of every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "pairing-gateway",
        description = "Anonymous one-on-one matchmaking with WebRTC signaling relay. Realtime traffic uses the WebSocket endpoint `/ws/{client_id}`."
    ),
    paths(
        system::health_handler,
        system::root_handler,
        system::ice_config_handler,
        system::stats_handler,
        users::create_user,
        users::get_user,
        reports::create_report,
        messages::list_room_messages,
    ),
    components(schemas(
        CreateUserRequest,
        CreateReportRequest,
        IceConfigResponse,
        IceServerDto,
        ServiceInfoResponse,
        EngineStats,
        UserProfile,
        Report,
        StoredMessage,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "System", description = "Health, configuration, and live counters"),
        (name = "Users", description = "Anonymous profiles"),
        (name = "Reports", description = "Abuse reports"),
        (name = "Messages", description = "Logged room chat"),
    )
)]
pub struct ApiDoc;

/// Swagger UI at `/swagger-ui`, serving the document at `/api-docs/openapi.json`.
#[cfg(feature = "swagger-ui")]
pub fn docs_routes() -> axum::Router<AppState> {
    utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

/// No documentation routes without the `swagger-ui` feature.
#[cfg(not(feature = "swagger-ui"))]
pub fn docs_routes() -> axum::Router<AppState> {
    axum::Router::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_rest_path() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/",
            "/api/config",
            "/api/stats",
            "/api/users",
            "/api/users/{id}",
            "/api/reports",
            "/api/messages/{room_id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
