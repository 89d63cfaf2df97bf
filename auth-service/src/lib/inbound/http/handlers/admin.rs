use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::authentication::models::Identity;

/// Reachable only through the admin role gate.
pub async fn admin_ping(Extension(identity): Extension<Identity>) -> ApiSuccess<AdminPingData> {
    tracing::debug!(user_id = %identity.user_id, "Admin ping");

    ApiSuccess::new(
        StatusCode::OK,
        AdminPingData {
            message: "pong".to_string(),
            user_id: identity.user_id.0,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminPingData {
    pub message: String,
    pub user_id: i64,
}
