use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::CurrentUser;

/// Decoded claims of the presented token, with no database lookup.
pub async fn token_info(
    Extension(current): Extension<CurrentUser>,
) -> Result<ApiSuccess<TokenInfoData>, ApiError> {
    let claims = &current.claims;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        TokenInfoData {
            user_id: claims.sub.clone(),
            email: claims.email.clone(),
            role: claims.role.clone(),
            issued_at: claims.issued_at(),
            expires_at: claims.expires_at(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenInfoData {
    pub user_id: String,
    pub email: Option<String>,
    pub role: String,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}
