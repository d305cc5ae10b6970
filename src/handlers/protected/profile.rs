use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde::Deserialize;
use serde_json::json;

use crate::database::models::user::User;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// GET /api/v1/profile - the caller's own identity, as loaded live by the
/// auth middleware
pub async fn get_profile(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> impl IntoResponse {
    Json(json!({ "user": user.profile() }))
}

/// PUT /api/v1/profile - self-service update of name/phone only.
/// Blank or absent fields are left untouched; role and active flag are
/// never updatable here.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.name.filter(|s| !s.trim().is_empty());
    let phone = req.phone.filter(|s| !s.trim().is_empty());

    let updated = sqlx::query_as::<_, User>(
        "UPDATE users
         SET name = COALESCE($1, name),
             phone = COALESCE($2, phone),
             updated_at = NOW()
         WHERE id = $3
         RETURNING id, name, email, password, phone, role, is_active, created_at, updated_at",
    )
    .bind(name)
    .bind(phone)
    .bind(user.id)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(json!({
        "message": "profile updated",
        "user": updated.summary(),
    })))
}
