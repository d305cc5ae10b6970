use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config;

/// Errors from pool setup and schema migration
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Connect the process-wide pool from DATABASE_URL.
pub async fn connect() -> Result<PgPool, DatabaseError> {
    let url = std::env::var("DATABASE_URL")
        .map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;
    let cfg = &config::config().database;

    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(Duration::from_secs(cfg.connection_timeout_secs))
        .connect(&url)
        .await?;

    info!("connected database pool (max_connections={})", cfg.max_connections);
    Ok(pool)
}

/// Pings the pool to ensure connectivity
pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Idempotent DDL executed at startup, in dependency order. A backend that
/// cannot be migrated cannot serve any route, so the caller treats failures
/// here as fatal.
const SCHEMA_DDL: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        phone TEXT,
        role TEXT NOT NULL DEFAULT 'user',
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE TABLE IF NOT EXISTS categories (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        image TEXT NOT NULL DEFAULT '',
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE TABLE IF NOT EXISTS products (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        price DOUBLE PRECISION NOT NULL,
        old_price DOUBLE PRECISION NOT NULL DEFAULT 0,
        image TEXT NOT NULL DEFAULT '',
        category_id BIGINT NOT NULL REFERENCES categories(id),
        brand TEXT NOT NULL DEFAULT '',
        model TEXT NOT NULL DEFAULT '',
        stock INTEGER NOT NULL DEFAULT 0,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        is_featured BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE INDEX IF NOT EXISTS idx_products_category_id ON products (category_id)",
    "CREATE TABLE IF NOT EXISTS contact_forms (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT,
        phone TEXT NOT NULL,
        subject TEXT NOT NULL,
        message TEXT NOT NULL,
        is_read BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE TABLE IF NOT EXISTS phone_contacts (
        id BIGSERIAL PRIMARY KEY,
        phone TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE TABLE IF NOT EXISTS visitor_stats (
        id BIGSERIAL PRIMARY KEY,
        ip_address TEXT NOT NULL,
        user_agent TEXT NOT NULL DEFAULT '',
        date TEXT NOT NULL,
        month TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        UNIQUE (ip_address, date)
    )",
    "CREATE TABLE IF NOT EXISTS phone_click_stats (
        id BIGSERIAL PRIMARY KEY,
        ip_address TEXT NOT NULL,
        user_agent TEXT NOT NULL DEFAULT '',
        date TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
];

/// Create the schema if it does not exist yet.
pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
    for stmt in SCHEMA_DDL {
        sqlx::query(stmt)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;
    }
    info!("database schema is up to date");
    Ok(())
}
