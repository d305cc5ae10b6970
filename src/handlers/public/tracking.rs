use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::json;

use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/v1/track-visitor - record at most one visit per (ip, day).
/// Dedupe rides on the store's unique constraint, so concurrent hits from
/// the same address cannot create duplicates.
pub async fn track_visitor(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let ip = client_ip(&headers, &addr);
    let user_agent = user_agent(&headers);
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO visitor_stats (ip_address, user_agent, date, month)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (ip_address, date) DO NOTHING",
    )
    .bind(&ip)
    .bind(user_agent)
    .bind(now.format("%Y-%m-%d").to_string())
    .bind(now.format("%Y-%m").to_string())
    .execute(&state.pool)
    .await?;

    Ok(Json(json!({ "message": "visit recorded" })))
}

/// POST /api/v1/track-phone-click - every click is recorded
pub async fn track_phone_click(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let ip = client_ip(&headers, &addr);
    let user_agent = user_agent(&headers);

    sqlx::query(
        "INSERT INTO phone_click_stats (ip_address, user_agent, date)
         VALUES ($1, $2, $3)",
    )
    .bind(&ip)
    .bind(user_agent)
    .bind(Utc::now().format("%Y-%m-%d").to_string())
    .execute(&state.pool)
    .await?;

    Ok(Json(json!({ "message": "phone click recorded" })))
}

/// Resolve the client address: X-Forwarded-For (first hop), then
/// X-Real-IP, then the socket peer.
fn client_ip(headers: &HeaderMap, addr: &SocketAddr) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next().map(str::trim).filter(|s| !s.is_empty()) {
            return first.to_string();
        }
    }
    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        if !real_ip.trim().is_empty() {
            return real_ip.trim().to_string();
        }
    }
    addr.ip().to_string()
}

fn user_agent(headers: &HeaderMap) -> String {
    headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> SocketAddr {
        "10.0.0.1:55555".parse().unwrap()
    }

    #[test]
    fn forwarded_for_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.2"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.1"));
        assert_eq!(client_ip(&headers, &peer()), "203.0.113.7");
    }

    #[test]
    fn real_ip_is_second_choice() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.1"));
        assert_eq!(client_ip(&headers, &peer()), "198.51.100.1");
    }

    #[test]
    fn falls_back_to_socket_peer() {
        assert_eq!(client_ip(&HeaderMap::new(), &peer()), "10.0.0.1");
    }
}
