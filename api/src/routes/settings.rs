//! Site settings endpoints

use axum::{Router, Json, extract::{State, rejection::JsonRejection}};
use axum::routing::get;
use essentia_forms::FaqConfig;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use crate::{ApiState, error::ApiError, middleware::auth::AdminSession, models::*};

pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/site-lock", get(get_site_lock).put(put_site_lock))
        .route("/faq", get(get_faq).put(put_faq))
}

/// Site lock state
#[utoipa::path(
    get,
    path = "/api/settings/site-lock",
    responses(
        (status = 200, description = "Current lock state; unlocked when unreadable", body = SiteLockState)
    ),
    tag = "settings"
)]
pub async fn get_site_lock(State(state): State<Arc<ApiState>>) -> Json<ApiResponse<SiteLockState>> {
    let enabled = state.settings.site_lock_enabled().await;
    Json(ApiResponse::success(SiteLockState { enabled }))
}

/// Turn the site lock on or off
#[utoipa::path(
    put,
    path = "/api/settings/site-lock",
    request_body = SiteLockState,
    responses(
        (status = 200, description = "Lock state saved", body = SiteLockState),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    ),
    tag = "settings"
)]
pub async fn put_site_lock(
    State(state): State<Arc<ApiState>>,
    AdminSession(admin): AdminSession,
    body: Result<Json<SiteLockState>, JsonRejection>,
) -> Result<Json<ApiResponse<SiteLockState>>, ApiError> {
    let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    state.settings.set_site_lock(input.enabled).await?;
    info!(enabled = input.enabled, by = %admin.sub, "site lock updated");
    Ok(Json(ApiResponse::success(input)))
}

/// FAQ page content
#[utoipa::path(
    get,
    path = "/api/settings/faq",
    responses((status = 200, description = "FAQ configuration")),
    tag = "settings"
)]
pub async fn get_faq(State(state): State<Arc<ApiState>>) -> Json<ApiResponse<FaqConfig>> {
    Json(ApiResponse::success(state.settings.faq().await))
}

/// Replace the FAQ page content
#[utoipa::path(
    put,
    path = "/api/settings/faq",
    responses(
        (status = 200, description = "Sanitized FAQ configuration as stored"),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    ),
    tag = "settings"
)]
pub async fn put_faq(
    State(state): State<Arc<ApiState>>,
    AdminSession(admin): AdminSession,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ApiResponse<FaqConfig>>, ApiError> {
    let Json(raw) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let stored = state.settings.put_faq(&raw).await?;
    info!(items = stored.items.len(), by = %admin.sub, "faq updated");
    Ok(Json(ApiResponse::success(stored)))
}
