use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::{PageQuery, Pagination};
use crate::database::models::user::{User, ROLE_ADMIN, ROLE_USER};
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

/// GET /api/v1/admin/users - paginated account list, newest first
pub async fn list_users(
    State(state): State<AppState>,
    Query(page_query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, limit, offset) = page_query.resolve(DEFAULT_LIMIT, MAX_LIMIT);

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&state.pool)
        .await?;

    let users = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password, phone, role, is_active, created_at, updated_at
         FROM users
         ORDER BY created_at DESC
         LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(json!({
        "users": users,
        "pagination": Pagination::new(page, limit, total),
    })))
}

/// PUT /api/v1/admin/users/:id - admin update of name/phone/role/active.
/// Role changes take effect on the target's very next request because the
/// auth middleware re-loads the record every time.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(role) = req.role.as_deref() {
        if role != ROLE_USER && role != ROLE_ADMIN {
            return Err(ApiError::bad_request("role must be 'user' or 'admin'"));
        }
    }

    let name = req.name.filter(|s| !s.trim().is_empty());
    let phone = req.phone.filter(|s| !s.trim().is_empty());

    let user = sqlx::query_as::<_, User>(
        "UPDATE users
         SET name = COALESCE($1, name),
             phone = COALESCE($2, phone),
             role = COALESCE($3, role),
             is_active = COALESCE($4, is_active),
             updated_at = NOW()
         WHERE id = $5
         RETURNING id, name, email, password, phone, role, is_active, created_at, updated_at",
    )
    .bind(name)
    .bind(phone)
    .bind(req.role)
    .bind(req.is_active)
    .bind(id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| ApiError::not_found("user not found"))?;

    Ok(Json(json!({
        "message": "user updated",
        "user": user,
    })))
}

/// DELETE /api/v1/admin/users/:id - an admin may never delete the account
/// they are acting as
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(CurrentUser(current)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    if current.id == id {
        return Err(ApiError::bad_request("cannot delete your own account"));
    }

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("user not found"));
    }

    Ok(Json(json!({ "message": "user deleted" })))
}
