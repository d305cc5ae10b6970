use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::Pagination;
use crate::database::models::contact::ContactForm;
use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ContactListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub unread: Option<bool>,
}

/// GET /api/v1/admin/contacts - intake inbox, newest first, optionally
/// unread only
pub async fn list_contacts(
    State(state): State<AppState>,
    Query(query): Query<ContactListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page_query = crate::api::PageQuery { page: query.page, limit: query.limit };
    let (page, limit, offset) = page_query.resolve(DEFAULT_LIMIT, MAX_LIMIT);
    let only_unread = query.unread == Some(true);

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM contact_forms WHERE ($1 = FALSE OR is_read = FALSE)",
    )
    .bind(only_unread)
    .fetch_one(&state.pool)
    .await?;

    let contacts = sqlx::query_as::<_, ContactForm>(
        "SELECT * FROM contact_forms
         WHERE ($1 = FALSE OR is_read = FALSE)
         ORDER BY created_at DESC
         LIMIT $2 OFFSET $3",
    )
    .bind(only_unread)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(json!({
        "contacts": contacts,
        "pagination": Pagination::new(page, limit, total),
    })))
}

/// GET /api/v1/admin/contacts/:id
pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let contact = sqlx::query_as::<_, ContactForm>("SELECT * FROM contact_forms WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("contact not found"))?;

    Ok(Json(json!({ "contact": contact })))
}

/// PUT /api/v1/admin/contacts/:id/read - single-row atomic update at the
/// store, no in-process read-modify-write
pub async fn mark_contact_read(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let result = sqlx::query("UPDATE contact_forms SET is_read = TRUE WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("contact not found"));
    }

    Ok(Json(json!({ "message": "contact marked as read" })))
}

/// DELETE /api/v1/admin/contacts/:id
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let result = sqlx::query("DELETE FROM contact_forms WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("contact not found"));
    }

    Ok(Json(json!({ "message": "contact deleted" })))
}
