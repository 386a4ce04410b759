//! Request gate
//!
//! Runs before routing:
//! 1. `/admin` and `/api/admin` require an admin session.
//! 2. While the site lock is on, everything outside the allowlist is sent to
//!    the coming-soon page unless the visitor holds the unlock cookie or an
//!    admin session.

use super::auth::authorize_admin;
use crate::error::ApiError;
use crate::ApiState;
use axum::extract::{Request, State};
use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;

pub const COMING_SOON_PATH: &str = "/coming-soon";
pub const SIGN_IN_PATH: &str = "/auth/signin";

fn under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

pub fn is_admin_path(path: &str) -> bool {
    under(path, "/admin") || under(path, "/api/admin")
}

/// Paths reachable while the site is locked. Writing the lock row still
/// needs an admin session in the handler.
pub fn is_allowlisted(path: &str) -> bool {
    matches!(
        path,
        COMING_SOON_PATH | "/favicon.ico" | "/robots.txt" | "/sitemap.xml" | "/health" | "/api/settings/site-lock"
    )
        || under(path, "/api/site-unlock")
        || under(path, "/assets")
        || under(path, "/docs")
        || path.starts_with("/api-docs")
}

pub fn has_unlock_cookie(headers: &HeaderMap, cookie_name: &str) -> bool {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(name, value)| name == cookie_name && value == "1")
}

pub async fn gate(State(state): State<Arc<ApiState>>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());

    if is_admin_path(&path) {
        return match authorize_admin(&state.config.jwt_secret, request.headers()) {
            Ok(_) => next.run(request).await,
            Err(ApiError::Unauthorized) if !path.starts_with("/api/") => {
                let location = format!("{SIGN_IN_PATH}?callbackUrl={}", urlencoding::encode(&target));
                Redirect::temporary(&location).into_response()
            }
            Err(e) => e.into_response(),
        };
    }

    if !state.settings.site_lock_enabled().await
        || is_allowlisted(&path)
        || has_unlock_cookie(request.headers(), &state.config.unlock_cookie)
        || authorize_admin(&state.config.jwt_secret, request.headers()).is_ok()
    {
        return next.run(request).await;
    }

    tracing::debug!(path = %path, "site locked, redirecting");
    let location = format!("{COMING_SOON_PATH}?next={}", urlencoding::encode(&target));
    Redirect::temporary(&location).into_response()
}
