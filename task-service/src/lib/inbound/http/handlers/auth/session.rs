use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::session::models::Session;

/// Current session and user information.
///
/// Returns the newest recorded session when one exists; with stateless
/// JWT use there may be none, in which case a synthetic entry is built
/// from the verified claims.
pub async fn get_session(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    let session = state.sessions.current(&current.user.id).await?;

    let session = match session {
        Some(session) => (&session).into(),
        None => SessionData {
            session_id: "jwt-session".to_string(),
            user_id: current.user.id.to_string(),
            expires_at: current.claims.expires_at().unwrap_or_else(Utc::now),
            ip_address: None,
            user_agent: None,
        },
    };

    Ok(ApiSuccess::new(
        StatusCode::OK,
        SessionResponseData {
            session,
            user: (&current.user).into(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionData {
    pub session_id: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl From<&Session> for SessionData {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id.to_string(),
            user_id: session.user_id.to_string(),
            expires_at: session.expires_at,
            ip_address: session.ip_address.clone(),
            user_agent: session.user_agent.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResponseData {
    pub session: SessionData,
    pub user: UserData,
}
