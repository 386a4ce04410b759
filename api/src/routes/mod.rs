//! API Routes

pub mod admin;
pub mod forms;
pub mod health;
pub mod home;
pub mod settings;
pub mod unlock;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use crate::models::ApiResponse;

/// Anything no route claims.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ApiResponse::<()>::error("not_found", "Not found")))
}
