use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::signup::AuthResponseData;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::user::models::ClientMeta;
use crate::user::models::EmailAddress;
use crate::user::models::SignInCommand;

pub async fn signin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SignInRequest>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    // A syntactically invalid email cannot belong to any account; answer
    // exactly like a wrong password so nothing is learned about accounts.
    let email = EmailAddress::new(body.email)
        .map_err(|_| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let command = SignInCommand {
        email,
        password: body.password,
        client: client_meta(&headers),
    };

    state
        .auth
        .sign_in(command)
        .await
        .map_err(ApiError::from)
        .map(|ref issued| ApiSuccess::new(StatusCode::OK, issued.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignInRequest {
    email: String,
    password: String,
}

fn client_meta(headers: &HeaderMap) -> ClientMeta {
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string());

    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    ClientMeta {
        ip_address,
        user_agent,
    }
}
