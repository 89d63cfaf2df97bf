use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use crate::authentication::models::Identity;
use crate::inbound::http::router::AppState;

/// Revoke all refresh tokens of the caller. Access tokens run to expiry.
pub async fn logout(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<StatusCode, ApiError> {
    state.auth_service.logout(identity.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
