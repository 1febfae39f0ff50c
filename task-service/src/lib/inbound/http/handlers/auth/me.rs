use axum::http::StatusCode;
use axum::Extension;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::middleware::CurrentUser;

pub async fn me(
    Extension(current): Extension<CurrentUser>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    Ok(ApiSuccess::new(StatusCode::OK, (&current.user).into()))
}
