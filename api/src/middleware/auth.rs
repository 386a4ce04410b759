//! Admin session tokens
//!
//! Admin pages and endpoints take an HS256 JWT in `Authorization: Bearer`.
//! Only the `admin` role may edit site content.

use crate::error::ApiError;
use crate::ApiState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // email
    #[serde(default)]
    pub name: Option<String>,
    pub role: String,
    pub exp: usize,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

pub fn create_token(
    secret: &str,
    email: &str,
    name: Option<&str>,
    role: &str,
    ttl_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = (chrono::Utc::now() + chrono::Duration::hours(ttl_hours)).timestamp().max(0) as usize;

    let claims = Claims {
        sub: email.to_lowercase(),
        name: name.map(String::from),
        role: role.to_string(),
        exp: expiration,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
}

pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Missing or invalid token is 401; a valid non-admin token is 403.
pub fn authorize_admin(secret: &str, headers: &HeaderMap) -> Result<Claims, ApiError> {
    let token = bearer_token(headers).ok_or(ApiError::Unauthorized)?;
    let claims = verify_token(secret, token).map_err(|e| {
        tracing::debug!(error = %e, "rejected admin token");
        ApiError::Unauthorized
    })?;
    if !claims.is_admin() {
        return Err(ApiError::Forbidden);
    }
    Ok(claims)
}

/// Extractor for handlers that require an admin caller.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Claims);

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<ApiState>) -> Result<Self, Self::Rejection> {
        authorize_admin(&state.config.jwt_secret, &parts.headers).map(AdminSession)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret";

    fn headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}")).unwrap());
        headers
    }

    #[test]
    fn test_token_round_trip() {
        let token = create_token(SECRET, "Alex@Example.com", Some("Alex"), ADMIN_ROLE, 8).unwrap();
        let claims = verify_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, "alex@example.com");
        assert!(claims.is_admin());
        assert!(verify_token("other-secret", &token).is_err());
    }

    #[test]
    fn test_authorize_admin() {
        assert!(matches!(authorize_admin(SECRET, &HeaderMap::new()), Err(ApiError::Unauthorized)));
        assert!(matches!(authorize_admin(SECRET, &headers("garbage")), Err(ApiError::Unauthorized)));

        let user = create_token(SECRET, "u@example.com", None, "user", 1).unwrap();
        assert!(matches!(authorize_admin(SECRET, &headers(&user)), Err(ApiError::Forbidden)));

        let admin = create_token(SECRET, "a@example.com", None, ADMIN_ROLE, 1).unwrap();
        assert!(authorize_admin(SECRET, &headers(&admin)).is_ok());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = create_token(SECRET, "a@example.com", None, ADMIN_ROLE, -2).unwrap();
        assert!(matches!(authorize_admin(SECRET, &headers(&token)), Err(ApiError::Unauthorized)));
    }
}
