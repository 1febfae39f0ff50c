use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::inbound::http::middleware::AuthError;
use crate::session::errors::SessionError;
use crate::task::errors::TaskError;
use crate::user::errors::UserError;
use crate::user::models::User;

pub mod auth;
pub mod tasks;
pub mod users;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    Validation { field: String, message: String },
    BadRequest(String),
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, field) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg, None),
            ApiError::Validation { field, message } => {
                (StatusCode::UNPROCESSABLE_ENTITY, message, Some(field))
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
        };

        (
            status,
            Json(ApiResponseBody::new_error(status, message, field)),
        )
            .into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::DuplicateAccount => ApiError::BadRequest(err.to_string()),
            UserError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            UserError::Banned { ref reason } => {
                let message = match reason {
                    Some(reason) => format!("Account is banned: {}", reason),
                    None => err.to_string(),
                };
                ApiError::Forbidden(message)
            }
            UserError::CannotBanSelf => ApiError::Forbidden(err.to_string()),
            UserError::WeakPassword(ref policy) => ApiError::Validation {
                field: "password".to_string(),
                message: policy.to_string(),
            },
            UserError::InvalidEmail(_) | UserError::InvalidUserId(_) | UserError::InvalidRole(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            UserError::Password(_)
            | UserError::Token(_)
            | UserError::DatabaseError(_)
            | UserError::Unknown(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound(_) => ApiError::NotFound(err.to_string()),
            TaskError::InvalidTaskId(_)
            | TaskError::InvalidTitle(_)
            | TaskError::InvalidPriority(_) => ApiError::UnprocessableEntity(err.to_string()),
            TaskError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(_) => ApiError::NotFound(err.to_string()),
            SessionError::InvalidSessionId(_) => ApiError::UnprocessableEntity(err.to_string()),
            SessionError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err.status_code() {
            StatusCode::FORBIDDEN => ApiError::Forbidden(err.to_string()),
            StatusCode::NOT_FOUND => ApiError::NotFound(err.to_string()),
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(err.to_string()),
            _ => ApiError::InternalServerError(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String, field: Option<String>) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message, field },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// User profile as rendered by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub role: String,
    pub email_verified: bool,
    pub banned: bool,
    pub ban_reason: Option<String>,
    pub ban_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            name: user.name.clone(),
            image: user.image.clone(),
            role: user.role.to_string(),
            email_verified: user.email_verified,
            banned: user.banned,
            ban_reason: user.ban_reason.clone(),
            ban_expires: user.ban_expires,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
