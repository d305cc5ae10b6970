use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::database::models::user::User;

/// Claims embedded in the bearer token. The role here is a snapshot taken
/// at issuance time and is advisory only: authorization decisions re-load
/// the live user record on every request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user: &User, expiry_days: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user.id,
            email: user.email.clone(),
            role: user.role.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::days(expiry_days)).timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingSecret,
    TokenGeneration(String),
    InvalidToken,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingSecret => write!(f, "signing secret is not configured"),
            AuthError::TokenGeneration(msg) => write!(f, "token generation error: {}", msg),
            AuthError::InvalidToken => write!(f, "invalid or expired token"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Process-wide signing keys, built once at startup from configuration and
/// passed by reference into the issuer and verifier. Never read from the
/// environment ad hoc.
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_days: i64,
}

impl AuthKeys {
    pub fn from_secret(secret: &str, expiry_days: i64) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::MissingSecret);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_days,
        })
    }

    /// Issue a signed assertion for a verified user. Pure computation;
    /// nothing is persisted.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let claims = Claims::new(user, self.expiry_days);
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}
