use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::validate::require_non_empty;
use crate::database::models::catalog::{Product, ProductWithCategory};
use crate::database::service;
use crate::error::ApiError;
use crate::state::AppState;

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub old_price: f64,
    #[serde(default)]
    pub image: String,
    pub category_id: i64,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub stock: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
}

/// POST /api/v1/admin/products
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<ProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_product(&req)?;
    require_category(&state, req.category_id).await?;

    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products
            (name, description, price, old_price, image, category_id, brand, model, stock, is_active, is_featured)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
         RETURNING *",
    )
    .bind(&req.name)
    .bind(&req.description)
    .bind(req.price)
    .bind(req.old_price)
    .bind(&req.image)
    .bind(req.category_id)
    .bind(&req.brand)
    .bind(&req.model)
    .bind(req.stock)
    .bind(req.is_active)
    .bind(req.is_featured)
    .fetch_one(&state.pool)
    .await?;

    let category = service::find_category_by_id(&state.pool, product.category_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "product created",
            "product": ProductWithCategory { product, category },
        })),
    ))
}

/// PUT /api/v1/admin/products/:id - full replace of the editable fields
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_product(&req)?;
    require_category(&state, req.category_id).await?;

    let product = sqlx::query_as::<_, Product>(
        "UPDATE products
         SET name = $1, description = $2, price = $3, old_price = $4, image = $5,
             category_id = $6, brand = $7, model = $8, stock = $9,
             is_active = $10, is_featured = $11, updated_at = NOW()
         WHERE id = $12
         RETURNING *",
    )
    .bind(&req.name)
    .bind(&req.description)
    .bind(req.price)
    .bind(req.old_price)
    .bind(&req.image)
    .bind(req.category_id)
    .bind(&req.brand)
    .bind(&req.model)
    .bind(req.stock)
    .bind(req.is_active)
    .bind(req.is_featured)
    .bind(id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| ApiError::not_found("product not found"))?;

    let category = service::find_category_by_id(&state.pool, product.category_id).await?;

    Ok(Json(json!({
        "message": "product updated",
        "product": ProductWithCategory { product, category },
    })))
}

/// DELETE /api/v1/admin/products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("product not found"));
    }

    Ok(Json(json!({ "message": "product deleted" })))
}

async fn require_category(state: &AppState, category_id: i64) -> Result<(), ApiError> {
    service::find_category_by_id(&state.pool, category_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApiError::bad_request("category not found"))
}

fn validate_product(req: &ProductRequest) -> Result<(), ApiError> {
    require_non_empty(&req.name, "name")?;
    if req.price <= 0.0 {
        return Err(ApiError::bad_request("price must be greater than zero"));
    }
    Ok(())
}
