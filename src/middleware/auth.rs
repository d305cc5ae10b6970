use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::database::service;
use crate::error::ApiError;
use crate::state::AppState;

/// The live identity of the caller, re-loaded from the store on every
/// authenticated request. This extension is the only channel handlers use
/// to learn who is calling.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub crate::database::models::user::User);

/// Bearer-token verification plus identity re-load.
///
/// The re-load per request is deliberate: it guarantees authorization
/// decisions reflect current role/active state rather than a token
/// snapshot that may be up to 7 days stale. Do not replace it with the
/// role embedded in the claims.
pub async fn require_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&headers)?;

    let claims = state
        .auth
        .verify(token)
        .map_err(|_| ApiError::unauthorized("invalid or expired token"))?;

    // Covers deletion after issuance
    let user = service::find_user_by_id(&state.pool, claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("user no longer exists"))?;

    // Covers deactivation after issuance
    if !user.is_active {
        return Err(ApiError::unauthorized("account is disabled"));
    }

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

/// Role gate: must run after `require_auth` on the same route stack.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    match request.extensions().get::<CurrentUser>() {
        // Unreachable with correct route composition
        None => Err(ApiError::unauthorized("user is not authenticated")),
        Some(CurrentUser(user)) if !user.is_admin() => {
            Err(ApiError::forbidden("admin access required"))
        }
        Some(_) => Ok(next.run(request).await),
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| ApiError::unauthorized("authentication token required"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("invalid authorization header"))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("authorization header must use Bearer format"))?;

    if token.trim().is_empty() {
        return Err(ApiError::unauthorized("empty bearer token"));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_rejected() {
        let err = bearer_token(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "authentication token required");
    }

    #[test]
    fn non_bearer_header_is_rejected() {
        let err = bearer_token(&headers_with("Basic dXNlcjpwYXNz")).unwrap_err();
        assert_eq!(err.message(), "authorization header must use Bearer format");
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = bearer_token(&headers_with("Bearer  ")).unwrap_err();
        assert_eq!(err.message(), "empty bearer token");
    }

    #[test]
    fn bearer_token_is_extracted() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }
}
