mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn register_login_and_profile_round_trip() -> Result<()> {
    if !common::database_available() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (email, token) = common::register_user(&server.base_url).await?;

    // The token issued at registration grants access to the profile
    let res = client
        .get(format!("{}/api/v1/profile", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["user"]["email"], email.as_str());
    assert_eq!(body["user"]["role"], "user");
    assert!(
        body["user"].get("password").is_none(),
        "password hash must never be serialized: {}",
        body
    );

    // Logging in with the same credentials issues a fresh token
    let res = client
        .post(format!("{}/api/v1/login", server.base_url))
        .json(&json!({ "email": email, "password": "test-password" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body["token"].is_string(), "missing token: {}", body);
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected() -> Result<()> {
    if !common::database_available() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (email, _) = common::register_user(&server.base_url).await?;

    let res = client
        .post(format!("{}/api/v1/register", server.base_url))
        .json(&json!({
            "name": "Imposter",
            "email": email,
            "password": "another-password",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_unauthorized() -> Result<()> {
    if !common::database_available() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (email, _) = common::register_user(&server.base_url).await?;

    let res = client
        .post(format!("{}/api/v1/login", server.base_url))
        .json(&json!({ "email": email, "password": "not-the-password" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<serde_json::Value>().await?;
    assert!(body.get("error").is_some(), "missing error field: {}", body);
    Ok(())
}

#[tokio::test]
async fn profile_requires_a_token() -> Result<()> {
    if !common::database_available() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/v1/profile", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Garbage tokens fail verification, not parsing
    let res = client
        .get(format!("{}/api/v1/profile", server.base_url))
        .bearer_auth("not-a-jwt")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn admin_routes_reject_regular_users() -> Result<()> {
    if !common::database_available() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (_, token) = common::register_user(&server.base_url).await?;

    let res = client
        .get(format!("{}/api/v1/admin/users", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Without any token the auth gate fires first
    let res = client
        .get(format!("{}/api/v1/admin/users", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn profile_update_changes_name_and_phone() -> Result<()> {
    if !common::database_available() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (_, token) = common::register_user(&server.base_url).await?;

    let res = client
        .put(format!("{}/api/v1/profile", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Renamed User", "phone": "+1 555 0199" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["user"]["name"], "Renamed User");
    assert_eq!(body["user"]["phone"], "+1 555 0199");
    Ok(())
}
