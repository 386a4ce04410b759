//! Home page section endpoints

use axum::{Router, Json, extract::{Path, State, rejection::JsonRejection}};
use axum::routing::get;
use essentia_forms::{AboutSection, ClientsSection, HeroSection, ServicesSection, SettingsRow, SiteSettings};
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;
use crate::{ApiState, error::ApiError, middleware::auth::AdminSession, models::*};

pub fn router() -> Router<Arc<ApiState>> {
    Router::new().route("/:section", get(get_section).put(put_section))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HomeSection {
    Hero,
    About,
    Services,
    Clients,
}

impl FromStr for HomeSection {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hero" => Ok(Self::Hero),
            "about" => Ok(Self::About),
            "services" => Ok(Self::Services),
            "clients" => Ok(Self::Clients),
            other => Err(ApiError::UnknownSection(other.to_string())),
        }
    }
}

fn to_json<T: SettingsRow>(row: T) -> Value {
    serde_json::to_value(row).unwrap_or(Value::Null)
}

impl HomeSection {
    async fn load(self, settings: &SiteSettings) -> Value {
        match self {
            Self::Hero => to_json(settings.row::<HeroSection>().await),
            Self::About => to_json(settings.row::<AboutSection>().await),
            Self::Services => to_json(settings.row::<ServicesSection>().await),
            Self::Clients => to_json(settings.row::<ClientsSection>().await),
        }
    }

    async fn store(self, settings: &SiteSettings, raw: &Value) -> Result<Value, ApiError> {
        Ok(match self {
            Self::Hero => to_json(settings.put_row::<HeroSection>(raw).await?),
            Self::About => to_json(settings.put_row::<AboutSection>(raw).await?),
            Self::Services => to_json(settings.put_row::<ServicesSection>(raw).await?),
            Self::Clients => to_json(settings.put_row::<ClientsSection>(raw).await?),
        })
    }
}

/// Home page section content
#[utoipa::path(
    get,
    path = "/api/home/{section}",
    params(("section" = String, Path, description = "hero, about, services or clients")),
    responses(
        (status = 200, description = "Section content; defaults when unset or unreadable"),
        (status = 404, description = "Unknown section", body = ErrorResponse)
    ),
    tag = "home"
)]
pub async fn get_section(
    State(state): State<Arc<ApiState>>,
    Path(section): Path<String>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let section = HomeSection::from_str(&section)?;
    Ok(Json(ApiResponse::success(section.load(&state.settings).await)))
}

/// Replace a home page section
#[utoipa::path(
    put,
    path = "/api/home/{section}",
    params(("section" = String, Path, description = "hero, about, services or clients")),
    responses(
        (status = 200, description = "Sanitized section as stored"),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Unknown section", body = ErrorResponse)
    ),
    tag = "home"
)]
pub async fn put_section(
    State(state): State<Arc<ApiState>>,
    AdminSession(admin): AdminSession,
    Path(section): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let section = HomeSection::from_str(&section)?;
    let Json(raw) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let stored = section.store(&state.settings, &raw).await?;
    info!(section = ?section, by = %admin.sub, "home section updated");
    Ok(Json(ApiResponse::success(stored)))
}
