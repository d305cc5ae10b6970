use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::catalog::Category;
use crate::database::models::user::User;

/// Look up a user by id (used by the auth middleware's per-request re-load)
pub async fn find_user_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password, phone, role, is_active, created_at, updated_at
         FROM users
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Look up a user by email (case-sensitive equality, per the unique key)
pub async fn find_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password, phone, role, is_active, created_at, updated_at
         FROM users
         WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn count_users(pool: &PgPool) -> Result<i64, DatabaseError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn find_category_by_id(
    pool: &PgPool,
    id: i64,
) -> Result<Option<Category>, DatabaseError> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, name, description, image, is_active, created_at, updated_at
         FROM categories
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}

/// Number of products still referencing a category (blocks category delete)
pub async fn count_products_in_category(pool: &PgPool, id: i64) -> Result<i64, DatabaseError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category_id = $1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
