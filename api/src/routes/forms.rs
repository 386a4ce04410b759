//! Form configuration and submission endpoints

use axum::{Router, Json, extract::{Path, State, rejection::JsonRejection}};
use axum::routing::{get, post};
use essentia_forms::{
    missing_required, filter_visible, FormConfiguration, FormKey, Submission,
    SubmissionValues,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use crate::{ApiState, error::ApiError, mailer, middleware::auth::AdminSession, models::*};

pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/:key", get(get_form).put(put_form))
        .route("/:key/submit", post(submit_form))
}

fn form_key(raw: &str) -> Result<FormKey, ApiError> {
    raw.parse::<FormKey>().map_err(ApiError::from)
}

/// Get a form configuration
#[utoipa::path(
    get,
    path = "/api/forms/{key}",
    params(("key" = String, Path, description = "enquire, join or contact")),
    responses(
        (status = 200, description = "Saved configuration, or the built-in one"),
        (status = 404, description = "Unknown form", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn get_form(
    State(state): State<Arc<ApiState>>,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<FormConfiguration>>, ApiError> {
    let key = form_key(&key)?;
    Ok(Json(ApiResponse::success(state.forms.get(key).await)))
}

/// Replace a form configuration
#[utoipa::path(
    put,
    path = "/api/forms/{key}",
    params(("key" = String, Path, description = "enquire, join or contact")),
    responses(
        (status = 200, description = "Configuration saved"),
        (status = 401, description = "No admin session", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 422, description = "Field list breaks authoring rules", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn put_form(
    State(state): State<Arc<ApiState>>,
    AdminSession(admin): AdminSession,
    Path(key): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ApiResponse<FormConfiguration>>, ApiError> {
    let key = form_key(&key)?;
    let Json(raw) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let (config, warnings) = FormConfiguration::from_authoring(key, &raw)?;
    state.forms.put(key, &config).await?;

    info!(form = %key, by = %admin.sub, fields = config.fields.len(), warnings = warnings.len(), "form configuration saved");
    Ok(Json(ApiResponse::success(config)))
}

/// Submit a lead form
#[utoipa::path(
    post,
    path = "/api/forms/{key}/submit",
    params(("key" = String, Path, description = "enquire, join or contact")),
    responses(
        (status = 200, description = "Submission delivered", body = SubmitReceipt),
        (status = 400, description = "Required fields missing", body = ErrorResponse),
        (status = 500, description = "No recipient configured", body = ErrorResponse),
        (status = 502, description = "Delivery failed", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn submit_form(
    State(state): State<Arc<ApiState>>,
    Path(key): Path<String>,
    body: Result<Json<SubmissionValues>, JsonRejection>,
) -> Result<Json<ApiResponse<SubmitReceipt>>, ApiError> {
    let key = form_key(&key)?;
    let config = state.forms.get(key).await;
    let recipient = recipient(&state, &config).ok_or(ApiError::MailerNotConfigured)?;
    let Json(values) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let payload = filter_visible(&config.fields, &values);
    let missing = missing_required(&config.fields, &payload);
    if !missing.is_empty() {
        return Err(ApiError::MissingRequired(missing));
    }

    let submission = Submission::new(key, &config.fields, &payload);
    state.mailer.send(&mailer::notification(&submission, &recipient)).await?;

    if let Some(reply) = mailer::auto_reply(&submission, &recipient) {
        if let Err(e) = state.mailer.send(&reply).await {
            warn!(form = %key, error = %e, "auto-reply failed");
        }
    }

    let receipt = SubmitReceipt {
        id: Uuid::new_v4(),
        form: key.to_string(),
        fields: submission.values.len(),
        message: config.copy.success_message.clone(),
    };
    info!(form = %key, id = %receipt.id, fields = receipt.fields, "submission delivered");
    Ok(Json(ApiResponse::success(receipt)))
}

/// Per-form recipient, then the site inbox, then the contact address on the
/// contact form.
fn recipient(state: &ApiState, config: &FormConfiguration) -> Option<String> {
    let non_empty = |s: &Option<String>| s.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(String::from);
    non_empty(&config.recipient_email)
        .or_else(|| non_empty(&state.config.internal_email))
        .or_else(|| non_empty(&config.copy.contact_email))
}
