//! Admin account endpoints

use axum::{Router, Json};
use axum::routing::get;
use std::sync::Arc;
use crate::{ApiState, middleware::auth::AdminSession, models::*};

pub fn router() -> Router<Arc<ApiState>> {
    Router::new().route("/me", get(me))
}

/// Current admin
#[utoipa::path(
    get,
    path = "/api/admin/me",
    responses(
        (status = 200, description = "Caller identity", body = AdminProfile),
        (status = 401, description = "No admin session", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn me(AdminSession(claims): AdminSession) -> Json<ApiResponse<AdminProfile>> {
    Json(ApiResponse::success(AdminProfile {
        name: claims.name.clone().unwrap_or_else(|| "Admin".into()),
        email: claims.sub,
        role: claims.role,
    }))
}
