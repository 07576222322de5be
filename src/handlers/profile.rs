use crate::dtos::{ProfileResponse, UpsertProfileRequest};
use crate::error::AppError;
use crate::middleware::user_id::UserId;
use crate::models::UserProfile;
use crate::startup::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use validator::Validate;

pub async fn get_profile(
    State(state): State<AppState>,
    user_id: UserId,
) -> Result<impl IntoResponse, AppError> {
    let profile = state.store.get_profile(&user_id.0).await?.ok_or_else(|| {
        AppError::NotFound(anyhow::anyhow!("profile not found for user {}", user_id.0))
    })?;
    Ok(Json(ProfileResponse::from(profile)))
}

/// Onboarding write: upserts the profile and marks onboarding complete.
pub async fn upsert_profile(
    State(state): State<AppState>,
    user_id: UserId,
    Json(payload): Json<UpsertProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let profile = UserProfile {
        id: user_id.0,
        first_name: payload.first_name.trim().to_string(),
        last_name: payload.last_name.trim().to_string(),
        company_name: payload.company_name.filter(|name| !name.trim().is_empty()),
        company_address: payload
            .company_address
            .filter(|address| !address.trim().is_empty()),
        company_type: payload.company_type,
        onboarding_complete: true,
        updated_at: Utc::now(),
    };
    state.store.upsert_profile(profile.clone()).await?;
    tracing::info!(user_id = %profile.id, "Profile updated");

    Ok(Json(ProfileResponse::from(profile)))
}
