use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::api::Pagination;
use crate::database::models::catalog::{Category, Product, ProductWithCategory};
use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 12;
const MAX_LIMIT: i64 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<i64>,
    pub search: Option<String>,
    pub featured: Option<bool>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

/// Whitelisted sort columns; anything else falls back to created_at.
/// The column name is interpolated into SQL, so it must come from here.
fn sort_column(requested: Option<&str>) -> &'static str {
    match requested {
        Some("name") => "name",
        Some("price") => "price",
        Some("stock") => "stock",
        _ => "created_at",
    }
}

fn sort_direction(requested: Option<&str>) -> &'static str {
    match requested {
        Some("asc") => "ASC",
        _ => "DESC",
    }
}

/// Shared WHERE clause for the list and count queries
fn push_filters(builder: &mut QueryBuilder<Postgres>, query: &ProductQuery) {
    builder.push(" WHERE is_active = TRUE");

    if let Some(category_id) = query.category {
        builder.push(" AND category_id = ").push_bind(category_id);
    }
    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        builder
            .push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if query.featured == Some(true) {
        builder.push(" AND is_featured = TRUE");
    }
}

/// GET /api/v1/products - filtered, sorted, paginated product list
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page_query = crate::api::PageQuery { page: query.page, limit: query.limit };
    let (page, limit, offset) = page_query.resolve(DEFAULT_LIMIT, MAX_LIMIT);

    let mut count_builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
    push_filters(&mut count_builder, &query);
    let total: i64 = count_builder
        .build_query_scalar()
        .fetch_one(&state.pool)
        .await?;

    let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM products");
    push_filters(&mut builder, &query);
    builder.push(format!(
        " ORDER BY {} {}",
        sort_column(query.sort.as_deref()),
        sort_direction(query.order.as_deref())
    ));
    builder.push(" LIMIT ").push_bind(limit);
    builder.push(" OFFSET ").push_bind(offset);

    let products: Vec<Product> = builder
        .build_query_as()
        .fetch_all(&state.pool)
        .await?;

    let products = attach_categories(&state.pool, products).await?;

    Ok(Json(json!({
        "products": products,
        "pagination": Pagination::new(page, limit, total),
    })))
}

/// GET /api/v1/products/:id - single active product with its category
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE id = $1 AND is_active = TRUE",
    )
    .bind(id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| ApiError::not_found("product not found"))?;

    let category =
        crate::database::service::find_category_by_id(&state.pool, product.category_id).await?;

    Ok(Json(json!({
        "product": ProductWithCategory { product, category },
    })))
}

/// GET /api/v1/categories - active categories, name ascending
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT * FROM categories WHERE is_active = TRUE ORDER BY name ASC",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(json!({ "categories": categories })))
}

/// Load the categories referenced by a page of products in one query
pub(crate) async fn attach_categories(
    pool: &PgPool,
    products: Vec<Product>,
) -> Result<Vec<ProductWithCategory>, ApiError> {
    let mut ids: Vec<i64> = products.iter().map(|p| p.category_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let categories = sqlx::query_as::<_, Category>(
        "SELECT * FROM categories WHERE id = ANY($1)",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let by_id: HashMap<i64, Category> = categories.into_iter().map(|c| (c.id, c)).collect();

    Ok(products
        .into_iter()
        .map(|product| {
            let category = by_id.get(&product.category_id).cloned();
            ProductWithCategory { product, category }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_column_is_whitelisted() {
        assert_eq!(sort_column(Some("price")), "price");
        assert_eq!(sort_column(Some("name")), "name");
        assert_eq!(sort_column(None), "created_at");
        // Injection attempts fall back to the default
        assert_eq!(sort_column(Some("price; DROP TABLE products")), "created_at");
    }

    #[test]
    fn sort_direction_defaults_to_desc() {
        assert_eq!(sort_direction(Some("asc")), "ASC");
        assert_eq!(sort_direction(Some("desc")), "DESC");
        assert_eq!(sort_direction(Some("sideways")), "DESC");
        assert_eq!(sort_direction(None), "DESC");
    }

    #[test]
    fn filters_compose_into_sql() {
        let query = ProductQuery {
            category: Some(3),
            search: Some("phone".to_string()),
            featured: Some(true),
            ..Default::default()
        };
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
        push_filters(&mut builder, &query);
        let sql = builder.sql();
        assert!(sql.contains("is_active = TRUE"));
        assert!(sql.contains("category_id = "));
        assert!(sql.contains("ILIKE"));
        assert!(sql.contains("is_featured = TRUE"));
    }

    #[test]
    fn empty_search_is_ignored() {
        let query = ProductQuery { search: Some(String::new()), ..Default::default() };
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
        push_filters(&mut builder, &query);
        assert!(!builder.sql().contains("ILIKE"));
    }
}
