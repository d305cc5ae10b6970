use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

use crate::api::validate::{require_email, require_min_len, require_non_empty};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct QuickContactRequest {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct PhoneContactRequest {
    pub phone: String,
}

/// POST /api/v1/contact - full contact form intake
pub async fn create_contact(
    State(state): State<AppState>,
    Json(req): Json<ContactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_contact(&req)?;

    let id = insert_contact(
        &state.pool,
        &req.name,
        req.email.as_deref(),
        &req.phone,
        &req.subject,
        &req.message,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "your message has been received, we will get back to you shortly",
            "id": id,
        })),
    ))
}

/// POST /api/v1/quick-contact - name + phone callback request
pub async fn create_quick_contact(
    State(state): State<AppState>,
    Json(req): Json<QuickContactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_min_len(&req.name, 2, "name")?;
    require_non_empty(&req.phone, "phone")?;

    let id = insert_contact(
        &state.pool,
        &req.name,
        None,
        &req.phone,
        "Quick callback request",
        "Customer requested a callback",
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "request received, we will call you back shortly",
            "id": id,
        })),
    ))
}

/// POST /api/v1/phone-contact - phone number only; also recorded as a
/// separate lead row for the admin lead list
pub async fn create_phone_contact(
    State(state): State<AppState>,
    Json(req): Json<PhoneContactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_non_empty(&req.phone, "phone")?;

    let id = insert_contact(
        &state.pool,
        "Not provided",
        None,
        &req.phone,
        "Phone number left",
        "Customer left a phone number only",
    )
    .await?;

    sqlx::query("INSERT INTO phone_contacts (phone) VALUES ($1)")
        .bind(&req.phone)
        .execute(&state.pool)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "phone number saved, we will be in touch",
            "id": id,
        })),
    ))
}

async fn insert_contact(
    pool: &PgPool,
    name: &str,
    email: Option<&str>,
    phone: &str,
    subject: &str,
    message: &str,
) -> Result<i64, ApiError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO contact_forms (name, email, phone, subject, message, is_read)
         VALUES ($1, $2, $3, $4, $5, FALSE)
         RETURNING id",
    )
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(subject)
    .bind(message)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

fn validate_contact(req: &ContactRequest) -> Result<(), ApiError> {
    require_min_len(&req.name, 2, "name")?;
    if let Some(email) = req.email.as_deref().filter(|e| !e.is_empty()) {
        require_email(email)?;
    }
    require_non_empty(&req.phone, "phone")?;
    require_non_empty(&req.subject, "subject")?;
    require_min_len(&req.message, 10, "message")?;
    Ok(())
}
