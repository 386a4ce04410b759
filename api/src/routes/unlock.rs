//! Coming-soon unlock endpoint

use axum::{Json, extract::{State, rejection::JsonRejection}};
use axum::http::{header::SET_COOKIE, HeaderValue};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use crate::{ApiState, config::ServerConfig, error::ApiError, models::*};

const UNLOCK_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 7;

pub fn unlock_cookie(config: &ServerConfig) -> String {
    let secure = if config.unlock_cookie_secure { "; Secure" } else { "" };
    format!(
        "{}=1; HttpOnly; SameSite=Lax; Path=/; Max-Age={UNLOCK_MAX_AGE_SECS}{secure}",
        config.unlock_cookie
    )
}

/// The configured cookie name must be a valid header value.
fn unlock_header(config: &ServerConfig) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(&unlock_cookie(config)).map_err(|_| {
        ApiError::Misconfigured(format!("unlock cookie name {:?} is not a valid header value", config.unlock_cookie))
    })
}

/// Unlock the site for this browser
#[utoipa::path(
    post,
    path = "/api/site-unlock",
    request_body = UnlockRequest,
    responses(
        (status = 200, description = "Unlocked; sets the unlock cookie while the lock is on"),
        (status = 401, description = "Incorrect password", body = ErrorResponse),
        (status = 500, description = "Unlock cookie misconfigured", body = ErrorResponse)
    ),
    tag = "settings"
)]
pub async fn site_unlock(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<UnlockRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let ok = Json(ApiResponse::success(serde_json::json!({ "unlocked": true })));
    if !state.settings.site_lock_enabled().await {
        return Ok(ok.into_response());
    }

    let input = body.map(|Json(input)| input).unwrap_or_default();
    let accepted = match (input.password.as_deref(), state.config.site_lock_password.as_deref()) {
        (Some(given), Some(expected)) => !given.is_empty() && given == expected,
        _ => false,
    };
    if !accepted {
        tracing::info!("site unlock rejected");
        return Err(ApiError::IncorrectPassword);
    }

    let cookie = unlock_header(&state.config)?;
    Ok(([(SET_COOKIE, cookie)], ok).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_attributes() {
        let mut config = ServerConfig::default();
        assert_eq!(
            unlock_cookie(&config),
            "site_unlocked=1; HttpOnly; SameSite=Lax; Path=/; Max-Age=604800"
        );
        config.unlock_cookie_secure = true;
        assert!(unlock_cookie(&config).ends_with("; Secure"));
    }

    #[test]
    fn test_bad_cookie_name_is_a_server_error() {
        let mut config = ServerConfig::default();
        assert!(unlock_header(&config).is_ok());

        config.unlock_cookie = "site\nunlocked".into();
        let err = unlock_header(&config).unwrap_err();
        assert!(matches!(err, ApiError::Misconfigured(_)));
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "misconfigured");
    }
}
