use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::router::AppState;
use crate::user::models::Role;
use crate::user::models::UserListFilter;

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<ApiSuccess<PaginatedUsersData>, ApiError> {
    let filter = UserListFilter {
        role: query.role,
        banned: query.banned,
        page: query.page,
        per_page: query.per_page,
    };

    let (users, total) = state.users.list_users(filter).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        PaginatedUsersData {
            items: users.iter().map(Into::into).collect(),
            pagination: Pagination::create(query.page.max(1), query.per_page.clamp(1, 100), total),
        },
    ))
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_per_page")]
    per_page: u32,
    #[serde(default)]
    role: Option<Role>,
    #[serde(default)]
    banned: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn create(page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = total.div_ceil(per_page as u64);
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginatedUsersData {
    pub items: Vec<UserData>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_rounds_up() {
        let pagination = Pagination::create(1, 20, 41);
        assert_eq!(pagination.total_pages, 3);
    }

    #[test]
    fn test_pagination_empty() {
        let pagination = Pagination::create(1, 20, 0);
        assert_eq!(pagination.total_pages, 0);
    }
}
