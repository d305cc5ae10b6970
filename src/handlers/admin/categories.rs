use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::validate::require_non_empty;
use crate::database::models::catalog::Category;
use crate::database::service;
use crate::error::ApiError;
use crate::state::AppState;

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// POST /api/v1/admin/categories
pub async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_non_empty(&req.name, "name")?;

    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name, description, image, is_active)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(&req.name)
    .bind(&req.description)
    .bind(&req.image)
    .bind(req.is_active)
    .fetch_one(&state.pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "category created",
            "category": category,
        })),
    ))
}

/// PUT /api/v1/admin/categories/:id
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<CategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_non_empty(&req.name, "name")?;

    let category = sqlx::query_as::<_, Category>(
        "UPDATE categories
         SET name = $1, description = $2, image = $3, is_active = $4, updated_at = NOW()
         WHERE id = $5
         RETURNING *",
    )
    .bind(&req.name)
    .bind(&req.description)
    .bind(&req.image)
    .bind(req.is_active)
    .bind(id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| ApiError::not_found("category not found"))?;

    Ok(Json(json!({
        "message": "category updated",
        "category": category,
    })))
}

/// DELETE /api/v1/admin/categories/:id - refused while products still
/// reference the category
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    if service::find_category_by_id(&state.pool, id).await?.is_none() {
        return Err(ApiError::not_found("category not found"));
    }

    let product_count = service::count_products_in_category(&state.pool, id).await?;
    if product_count > 0 {
        return Err(ApiError::bad_request(
            "cannot delete a category that still contains products",
        ));
    }

    sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    Ok(Json(json!({ "message": "category deleted" })))
}
