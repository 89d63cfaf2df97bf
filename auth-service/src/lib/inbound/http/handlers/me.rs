use auth::Role;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiSuccess;
use crate::authentication::models::Identity;

pub async fn me(Extension(identity): Extension<Identity>) -> ApiSuccess<MeResponseData> {
    ApiSuccess::new(StatusCode::OK, (&identity).into())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeResponseData {
    pub user_id: i64,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

impl From<&Identity> for MeResponseData {
    fn from(identity: &Identity) -> Self {
        Self {
            user_id: identity.user_id.0,
            role: identity.role,
            expires_at: identity.expires_at,
        }
    }
}
