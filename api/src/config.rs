//! Service configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_UNLOCK_COOKIE: &str = "site_unlocked";

/// Runtime configuration for the site service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind: String,
    /// Directory holding the JSON settings rows
    pub data_dir: PathBuf,
    /// HS256 secret for admin session tokens
    pub jwt_secret: String,
    /// Password accepted by `/api/site-unlock`; unset disables unlocking
    pub site_lock_password: Option<String>,
    pub unlock_cookie: String,
    /// Mark the unlock cookie `Secure`
    pub unlock_cookie_secure: bool,
    /// Where lead submissions are delivered; unset disables submissions
    pub internal_email: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".into(),
            data_dir: PathBuf::from("data"),
            jwt_secret: "essentia-dev-secret-change-in-production".into(),
            site_lock_password: None,
            unlock_cookie: DEFAULT_UNLOCK_COOKIE.into(),
            unlock_cookie_secure: false,
            internal_email: None,
        }
    }
}

impl ServerConfig {
    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ServerConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Defaults overridden by `ESSENTIA_*` / `SITE_*` variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup; empty values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = var("ESSENTIA_BIND") {
            self.bind = v;
        }
        if let Some(v) = var("ESSENTIA_DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = var("ESSENTIA_JWT_SECRET") {
            self.jwt_secret = v;
        }
        if let Some(v) = var("SITE_LOCK_PASSWORD") {
            self.site_lock_password = Some(v);
        }
        if let Some(v) = var("SITE_UNLOCK_COOKIE") {
            self.unlock_cookie = v;
        }
        if let Some(v) = var("SITE_UNLOCK_SECURE") {
            self.unlock_cookie_secure = matches!(v.as_str(), "1" | "true" | "yes");
        }
        if let Some(v) = var("ESSENTIA_INTERNAL_EMAIL") {
            self.internal_email = Some(v);
        }
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
