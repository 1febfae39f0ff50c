use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::user::models::EmailAddress;
use crate::user::models::IssuedToken;
use crate::user::models::SignUpCommand;

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignUpRequest>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    let email = EmailAddress::new(body.email)
        .map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;

    let command = SignUpCommand {
        email,
        password: body.password,
        name: body.name,
    };

    state
        .auth
        .sign_up(command)
        .await
        .map_err(ApiError::from)
        .map(|ref issued| ApiSuccess::new(StatusCode::OK, issued.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignUpRequest {
    email: String,
    password: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthResponseData {
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

impl From<&IssuedToken> for AuthResponseData {
    fn from(issued: &IssuedToken) -> Self {
        Self {
            token: issued.token.clone(),
            user_id: issued.user_id.to_string(),
            expires_at: issued.expires_at,
        }
    }
}
