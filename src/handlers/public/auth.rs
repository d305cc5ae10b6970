use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::api::validate::{require_email, require_min_len};
use crate::config;
use crate::database::models::user::{User, ROLE_USER};
use crate::database::service;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/v1/register - create an account and issue a token
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_register(&req)?;

    // Courtesy pre-check; the unique constraint on email is the actual
    // guarantee and surfaces as 409 if two registrations race.
    if service::find_user_by_email(&state.pool, &req.email).await?.is_some() {
        return Err(ApiError::bad_request("a user with this email already exists"));
    }

    let hash = bcrypt::hash(&req.password, config::config().security.bcrypt_cost)?;

    // Role is forced to `user` on self-registration
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email, password, phone, role, is_active)
         VALUES ($1, $2, $3, $4, $5, TRUE)
         RETURNING id, name, email, password, phone, role, is_active, created_at, updated_at",
    )
    .bind(&req.name)
    .bind(&req.email)
    .bind(&hash)
    .bind(&req.phone)
    .bind(ROLE_USER)
    .fetch_one(&state.pool)
    .await?;

    let token = issue_token(&state, &user)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "registration successful",
            "user": user.summary(),
            "token": token,
        })),
    ))
}

/// POST /api/v1/login - verify credentials and issue a token
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_email(&req.email)?;
    require_min_len(&req.password, 6, "password")?;

    let user = service::find_user_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("invalid credentials"))?;

    if !user.is_active {
        return Err(ApiError::unauthorized("account is disabled"));
    }

    let matches = bcrypt::verify(&req.password, &user.password)?;
    if !matches {
        return Err(ApiError::unauthorized("invalid credentials"));
    }

    let token = issue_token(&state, &user)?;

    Ok(Json(json!({
        "message": "login successful",
        "user": user.summary(),
        "token": token,
    })))
}

fn issue_token(state: &AppState, user: &User) -> Result<String, ApiError> {
    state.auth.issue(user).map_err(|e| {
        tracing::error!("token issuance failed: {}", e);
        ApiError::internal_server_error("failed to issue token")
    })
}

fn validate_register(req: &RegisterRequest) -> Result<(), ApiError> {
    require_min_len(&req.name, 2, "name")?;
    require_email(&req.email)?;
    require_min_len(&req.password, 6, "password")?;
    Ok(())
}
