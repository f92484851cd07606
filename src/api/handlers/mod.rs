//! REST endpoint handlers organized by resource.

pub mod messages;
pub mod reports;
pub mod system;
pub mod users;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(system::api_routes())
        .merge(users::routes())
        .merge(reports::routes())
        .merge(messages::routes())
}
