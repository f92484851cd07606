//! Abuse report DTOs.

use chrono::Utc;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::GatewayError;
use crate::persistence::models::Report;

/// Request body for `POST /api/reports`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReportRequest {
    /// Client being reported.
    pub reported_id: String,
    /// Free-text reason.
    pub reason: String,
}

/// Query parameters for `POST /api/reports`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReporterQuery {
    /// Client filing the report.
    pub reporter_id: String,
}

impl CreateReportRequest {
    /// Validates the request and builds a report filed by `reporter_id`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if any identifier or the
    /// reason is blank.
    pub fn into_report(self, reporter_id: String) -> Result<Report, GatewayError> {
        if reporter_id.trim().is_empty() || self.reported_id.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "reporter_id and reported_id are required".to_string(),
            ));
        }
        if self.reason.trim().is_empty() {
            return Err(GatewayError::InvalidRequest("reason is required".to_string()));
        }
        Ok(Report {
            id: Uuid::new_v4(),
            reporter_id,
            reported_id: self.reported_id,
            reason: self.reason,
            timestamp: Utc::now(),
        })
    }
}
