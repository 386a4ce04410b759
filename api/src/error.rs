//! API error type

use crate::mailer::MailError;
use crate::models::ApiResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use essentia_forms::{FormsError, StoreError, ValidationReport};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unknown form: {0}")]
    UnknownForm(String),

    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(#[from] ValidationReport),

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingRequired(Vec<String>),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("Email transport not configured")]
    MailerNotConfigured,

    #[error("Delivery failed: {0}")]
    Delivery(#[from] MailError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Server misconfigured: {0}")]
    Misconfigured(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UnknownForm(_) | ApiError::UnknownSection(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::MissingRequired(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized | ApiError::IncorrectPassword => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::MailerNotConfigured | ApiError::Storage(_) | ApiError::Misconfigured(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Delivery(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::UnknownForm(_) => "unknown_form",
            ApiError::UnknownSection(_) => "unknown_section",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Validation(_) => "validation_failed",
            ApiError::MissingRequired(_) => "missing_required",
            ApiError::Unauthorized => "unauthorized",
            ApiError::Forbidden => "forbidden",
            ApiError::IncorrectPassword => "incorrect_password",
            ApiError::MailerNotConfigured => "mailer_not_configured",
            ApiError::Delivery(_) => "delivery_failed",
            ApiError::Storage(_) => "storage_error",
            ApiError::Misconfigured(_) => "misconfigured",
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            ApiError::Validation(report) => Some(json!(report.violations)),
            ApiError::MissingRequired(names) => Some(json!(names)),
            _ => None,
        }
    }
}

impl From<FormsError> for ApiError {
    fn from(e: FormsError) -> Self {
        match e {
            FormsError::UnknownForm(key) => ApiError::UnknownForm(key),
            FormsError::Validation(report) => ApiError::Validation(report),
            FormsError::MissingRequired(names) => ApiError::MissingRequired(names),
            FormsError::Storage(e) => ApiError::Storage(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "request failed");
        }

        let message = self.to_string();
        let body = match self.details() {
            Some(details) => ApiResponse::error_with(self.code(), &message, details),
            None => ApiResponse::<Value>::error(self.code(), &message),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use essentia_forms::{validate_fields, FieldSchema, FieldType};

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::MissingRequired(vec!["email".into()]).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MailerNotConfigured.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::Delivery(MailError::Rejected("x".into())).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ApiError::from(FormsError::UnknownForm("faq".into())).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_validation_details_list_every_violation() {
        let fields = vec![
            FieldSchema::new("a", "role", "", FieldType::Radio),
            FieldSchema::new("b", "role", "Role", FieldType::Text),
        ];
        let report = validate_fields(&fields).unwrap_err();
        let expected = report.violations.len();
        let err = ApiError::from(report);
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.details().unwrap().as_array().unwrap().len(), expected);
    }
}
