//! Anonymous profile DTOs.

use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::GatewayError;
use crate::persistence::models::UserProfile;

/// Longest accepted username.
const MAX_USERNAME_LEN: usize = 50;

/// Request body for `POST /api/users`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// Optional display name.
    #[serde(default)]
    pub username: Option<String>,
    /// Declared interests.
    #[serde(default)]
    pub interests: Vec<String>,
    /// Optional age.
    #[serde(default)]
    pub age: Option<i32>,
    /// Optional gender.
    #[serde(default)]
    pub gender: Option<String>,
    /// Preferred language code. Defaults to `"en"`.
    #[serde(default = "default_language")]
    pub language: Option<String>,
}

fn default_language() -> Option<String> {
    Some("en".to_string())
}

impl CreateUserRequest {
    /// Validates the request and builds a new profile.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for an overlong username or
    /// a negative age.
    pub fn into_profile(self) -> Result<UserProfile, GatewayError> {
        if let Some(name) = &self.username
            && name.chars().count() > MAX_USERNAME_LEN
        {
            return Err(GatewayError::InvalidRequest(format!(
                "username longer than {MAX_USERNAME_LEN} characters"
            )));
        }
        if self.age.is_some_and(|age| age < 0) {
            return Err(GatewayError::InvalidRequest("age must not be negative".to_string()));
        }
        Ok(UserProfile {
            id: Uuid::new_v4(),
            username: self.username,
            interests: self.interests,
            age: self.age,
            gender: self.gender,
            language: self.language,
            created_at: Utc::now(),
        })
    }
}
