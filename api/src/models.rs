//! API Models

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Standard API response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn error(code: &str, message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorResponse {
                code: code.to_string(),
                message: message.to_string(),
            }),
        }
    }

    /// Error carrying structured details, e.g. every failing field.
    pub fn error_with(code: &str, message: &str, details: T) -> Self {
        Self { data: Some(details), ..Self::error(code, message) }
    }
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

/// Site lock state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct SiteLockState {
    pub enabled: bool,
}

/// Unlock request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UnlockRequest {
    #[serde(default)]
    pub password: Option<String>,
}

/// Accepted lead submission
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitReceipt {
    pub id: Uuid,
    pub form: String,
    /// Number of values delivered after hidden fields were dropped
    pub fields: usize,
    pub message: String,
}

/// Caller identity from the admin session token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminProfile {
    pub email: String,
    pub name: String,
    pub role: String,
}
