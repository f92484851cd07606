//! Abuse report handler.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{CreateReportRequest, ReporterQuery};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};
use crate::persistence::models::Report;

/// `POST /api/reports?reporter_id=`: File an abuse report.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] if an id or the reason is blank,
/// or [`GatewayError::PersistenceError`] if the store fails.
#[utoipa::path(
    post,
    path = "/api/reports",
    tag = "Reports",
    summary = "Report a client",
    params(ReporterQuery),
    request_body = CreateReportRequest,
    responses(
        (status = 201, description = "Report stored", body = Report),
        (status = 400, description = "Missing reporter, target, or reason", body = ErrorResponse),
    )
)]
pub async fn create_report(
    State(state): State<AppState>,
    Query(query): Query<ReporterQuery>,
    Json(req): Json<CreateReportRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let report = req.into_report(query.reporter_id)?;
    state.store.create_report(&report).await?;
    tracing::info!(
        report_id = %report.id,
        reporter_id = %report.reporter_id,
        reported_id = %report.reported_id,
        "report filed"
    );
    Ok((StatusCode::CREATED, Json(report)))
}

/// Report routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports", post(create_report))
}
