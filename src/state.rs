use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::AuthKeys;

/// Shared application state threaded into every handler via axum `State`.
///
/// The signing keys are constructed once at startup and are read-only from
/// then on; the pool is the only other cross-request resource.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth: Arc<AuthKeys>,
}

impl AppState {
    pub fn new(pool: PgPool, auth: AuthKeys) -> Self {
        Self { pool, auth: Arc::new(auth) }
    }
}
