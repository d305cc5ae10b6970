use sqlx::PgPool;
use tracing::info;

use crate::config;
use crate::database::manager::DatabaseError;
use crate::database::models::user::ROLE_ADMIN;
use crate::database::service;

/// One-time bootstrap: runs only when the store holds zero users, and
/// creates the initial admin identity plus a small sample catalog.
pub async fn run(pool: &PgPool) -> Result<(), DatabaseError> {
    if service::count_users(pool).await? > 0 {
        return Ok(());
    }

    info!("empty store detected, creating seed data");

    let seed = &config::config().seed;
    let hash = bcrypt::hash(&seed.admin_password, config::config().security.bcrypt_cost)
        .map_err(|e| DatabaseError::Migration(format!("failed to hash seed password: {}", e)))?;

    sqlx::query(
        "INSERT INTO users (name, email, password, phone, role, is_active)
         VALUES ($1, $2, $3, $4, $5, TRUE)",
    )
    .bind("Administrator")
    .bind(&seed.admin_email)
    .bind(&hash)
    .bind("+10000000000")
    .bind(ROLE_ADMIN)
    .execute(pool)
    .await?;

    let categories: &[(&str, &str)] = &[
        ("Smartphones", "Mobile phones and smartphones"),
        ("Laptops", "Portable computers"),
        ("Televisions", "LCD and OLED televisions"),
        ("Home Appliances", "Appliances for the home"),
        ("Accessories", "Assorted accessories"),
    ];

    let mut category_ids = Vec::with_capacity(categories.len());
    for (name, description) in categories {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO categories (name, description, is_active)
             VALUES ($1, $2, TRUE)
             RETURNING id",
        )
        .bind(name)
        .bind(description)
        .fetch_one(pool)
        .await?;
        category_ids.push(id);
    }

    // (name, description, price, old_price, category index, brand, model, stock, featured)
    let products: &[(&str, &str, f64, f64, usize, &str, &str, i32, bool)] = &[
        (
            "iPhone 15 Pro",
            "Apple's flagship smartphone",
            1200.0,
            1300.0,
            0,
            "Apple",
            "iPhone 15 Pro",
            50,
            true,
        ),
        (
            "Samsung Galaxy S24",
            "Flagship Android smartphone",
            1000.0,
            0.0,
            0,
            "Samsung",
            "Galaxy S24",
            30,
            true,
        ),
        (
            "MacBook Pro 16\"",
            "Professional laptop for demanding work",
            2500.0,
            0.0,
            1,
            "Apple",
            "MacBook Pro 16",
            20,
            true,
        ),
        (
            "LG OLED TV 55\"",
            "Large high-quality OLED television",
            1800.0,
            2000.0,
            2,
            "LG",
            "OLED55C3",
            15,
            false,
        ),
    ];

    for (name, description, price, old_price, cat_idx, brand, model, stock, featured) in products {
        sqlx::query(
            "INSERT INTO products
                (name, description, price, old_price, category_id, brand, model, stock, is_active, is_featured)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE, $9)",
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(old_price)
        .bind(category_ids[*cat_idx])
        .bind(brand)
        .bind(model)
        .bind(stock)
        .bind(featured)
        .execute(pool)
        .await?;
    }

    info!("seed data created: 1 admin, {} categories, {} products", categories.len(), products.len());
    Ok(())
}
