use serde::Serialize;
use sqlx::FromRow;

/// Aggregate row for per-day visitor/click reports. Raw rows are written
/// with plain inserts and only ever read back aggregated.
#[derive(Debug, Serialize, FromRow)]
pub struct DailyStat {
    pub date: String,
    pub unique_views: i64,
    pub total_views: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct MonthlyStat {
    pub month: String,
    pub unique_views: i64,
    pub total_views: i64,
}
