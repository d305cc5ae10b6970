use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::api::{PageQuery, Pagination};
use crate::database::models::analytics::{DailyStat, MonthlyStat};
use crate::database::models::contact::PhoneContact;
use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_WINDOW_DAYS: i64 = 30;
const MONTHLY_WINDOW_MONTHS: i64 = 12;
const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub days: Option<i64>,
}

impl WindowQuery {
    fn resolve(&self) -> i64 {
        match self.days {
            Some(d) if d > 0 => d,
            _ => DEFAULT_WINDOW_DAYS,
        }
    }
}

/// GET /api/v1/admin/analytics/visitors - daily uniques for the window,
/// monthly rollup for the last year, and the all-time unique count
pub async fn visitor_stats(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let days = query.resolve();
    let start_date = (Utc::now() - Duration::days(days)).format("%Y-%m-%d").to_string();
    let start_month = (Utc::now() - Duration::days(MONTHLY_WINDOW_MONTHS * 30))
        .format("%Y-%m")
        .to_string();

    let daily_stats = sqlx::query_as::<_, DailyStat>(
        "SELECT date,
                COUNT(DISTINCT ip_address) AS unique_views,
                COUNT(*) AS total_views
         FROM visitor_stats
         WHERE date >= $1
         GROUP BY date
         ORDER BY date DESC",
    )
    .bind(&start_date)
    .fetch_all(&state.pool)
    .await?;

    let monthly_stats = sqlx::query_as::<_, MonthlyStat>(
        "SELECT month,
                COUNT(DISTINCT ip_address) AS unique_views,
                COUNT(*) AS total_views
         FROM visitor_stats
         WHERE month >= $1
         GROUP BY month
         ORDER BY month DESC",
    )
    .bind(&start_month)
    .fetch_all(&state.pool)
    .await?;

    let total_unique: i64 =
        sqlx::query_scalar("SELECT COUNT(DISTINCT ip_address) FROM visitor_stats")
            .fetch_one(&state.pool)
            .await?;

    Ok(Json(json!({
        "daily_stats": daily_stats,
        "monthly_stats": monthly_stats,
        "total_unique": total_unique,
    })))
}

/// GET /api/v1/admin/analytics/phone-clicks - click totals and per-day
/// breakdown for the window
pub async fn phone_click_stats(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let days = query.resolve();
    let start_date = (Utc::now() - Duration::days(days)).format("%Y-%m-%d").to_string();

    let total_clicks: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM phone_click_stats WHERE date >= $1")
            .bind(&start_date)
            .fetch_one(&state.pool)
            .await?;

    let unique_clicks: i64 = sqlx::query_scalar(
        "SELECT COUNT(DISTINCT ip_address) FROM phone_click_stats WHERE date >= $1",
    )
    .bind(&start_date)
    .fetch_one(&state.pool)
    .await?;

    let daily_clicks = sqlx::query_as::<_, DailyStat>(
        "SELECT date,
                COUNT(DISTINCT ip_address) AS unique_views,
                COUNT(*) AS total_views
         FROM phone_click_stats
         WHERE date >= $1
         GROUP BY date
         ORDER BY date DESC",
    )
    .bind(&start_date)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(json!({
        "total_clicks": total_clicks,
        "unique_clicks": unique_clicks,
        "daily_clicks": daily_clicks,
    })))
}

/// GET /api/v1/admin/phone-contacts - paginated phone leads, newest first
pub async fn list_phone_contacts(
    State(state): State<AppState>,
    Query(page_query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, limit, offset) = page_query.resolve(DEFAULT_LIMIT, MAX_LIMIT);

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM phone_contacts")
        .fetch_one(&state.pool)
        .await?;

    let contacts = sqlx::query_as::<_, PhoneContact>(
        "SELECT * FROM phone_contacts
         ORDER BY created_at DESC
         LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(json!({
        "contacts": contacts,
        "pagination": Pagination::new(page, limit, total),
    })))
}

/// DELETE /api/v1/admin/phone-contacts/:id
pub async fn delete_phone_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let result = sqlx::query("DELETE FROM phone_contacts WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("phone contact not found"));
    }

    Ok(Json(json!({ "message": "phone contact deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_defaults_to_thirty_days() {
        assert_eq!(WindowQuery::default().resolve(), 30);
        assert_eq!(WindowQuery { days: Some(0) }.resolve(), 30);
        assert_eq!(WindowQuery { days: Some(-5) }.resolve(), 30);
        assert_eq!(WindowQuery { days: Some(7) }.resolve(), 7);
    }
}
