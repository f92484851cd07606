//! Anonymous profile handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::CreateUserRequest;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};
use crate::persistence::models::UserProfile;

/// `POST /api/users`: Create an anonymous profile.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] on bad input or
/// [`GatewayError::PersistenceError`] if the store fails.
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    summary = "Create profile",
    description = "Stores an anonymous profile. Every field is optional; `language` defaults to `en`.",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Profile created", body = UserProfile),
        (status = 400, description = "Invalid profile", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let profile = req.into_profile()?;
    state.store.create_user(&profile).await?;
    tracing::info!(user_id = %profile.id, "profile created");
    Ok((StatusCode::CREATED, Json(profile)))
}

/// `GET /api/users/{id}`: Fetch a profile.
///
/// # Errors
///
/// Returns [`GatewayError::UserNotFound`] if no profile has this id.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    summary = "Get profile",
    params(("id" = Uuid, Path, description = "Profile identifier")),
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 404, description = "Unknown profile", body = ErrorResponse),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let profile = state
        .store
        .get_user(id)
        .await?
        .ok_or(GatewayError::UserNotFound(id))?;
    Ok(Json(profile))
}

/// Profile routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/{id}", get(get_user))
}
