//! Essentia site service
//!
//! HTTP surface over the form engine: public form configuration and lead
//! submission, admin edits, the coming-soon site lock, the FAQ page and the
//! home page sections.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  gate: admin session for /admin + /api/admin, then site lock │
//! └──────────────────────────────────────────────────────────────┘
//!            │
//!  ┌─────────┴─────────┬──────────────────┬──────────────────┐
//!  │ /api/forms/:key   │ /api/settings/*  │ /api/site-unlock │
//!  └─────────┬─────────┴────────┬─────────┴──────────────────┘
//!            │                  │
//!   FormConfigStore       SiteSettings        Mailer
//!            └──── SettingsBackend ────┘
//! ```

pub mod config;
pub mod error;
pub mod mailer;
pub mod middleware;
pub mod models;
pub mod routes;

use axum::{Router, routing::{get, post}};
use essentia_forms::{FormConfigStore, JsonFileBackend, SettingsBackend, SiteSettings};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::ServerConfig;
pub use error::ApiError;
pub use mailer::{Mailer, OutboxMailer, TracingMailer};
pub use models::*;

/// API state
#[derive(Clone)]
pub struct ApiState {
    pub config: ServerConfig,
    pub forms: FormConfigStore,
    pub settings: SiteSettings,
    pub mailer: Arc<dyn Mailer>,
}

impl ApiState {
    /// Forms and settings share one backend.
    pub fn new(config: ServerConfig, backend: Arc<dyn SettingsBackend>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            config,
            forms: FormConfigStore::new(Arc::clone(&backend)),
            settings: SiteSettings::new(backend),
            mailer,
        }
    }

    /// JSON rows under `data_dir`, messages to the log.
    pub fn from_config(config: ServerConfig) -> Self {
        let backend = Arc::new(JsonFileBackend::new(config.data_dir.clone()));
        Self::new(config, backend, Arc::new(TracingMailer))
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Essentia Site API",
        version = "0.1.0",
        description = "Form configuration, lead submissions and site lock for the Essentia booking site",
        license(name = "Apache-2.0")
    ),
    paths(
        routes::health::health_check,
        routes::forms::get_form,
        routes::forms::put_form,
        routes::forms::submit_form,
        routes::settings::get_site_lock,
        routes::settings::put_site_lock,
        routes::settings::get_faq,
        routes::settings::put_faq,
        routes::home::get_section,
        routes::home::put_section,
        routes::unlock::site_unlock,
        routes::admin::me,
    ),
    components(
        schemas(
            ErrorResponse, SiteLockState, UnlockRequest, SubmitReceipt, AdminProfile,
            routes::health::HealthResponse
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "forms", description = "Lead form configuration and submission"),
        (name = "settings", description = "Site lock and FAQ"),
        (name = "home", description = "Home page sections"),
        (name = "admin", description = "Admin session")
    )
)]
pub struct ApiDoc;

/// Build the API router
pub fn build_router(state: ApiState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes())
        .fallback(routes::not_found)
        .layer(axum::middleware::from_fn_with_state(
            Arc::clone(&state),
            middleware::site_lock::gate,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<Arc<ApiState>> {
    Router::new()
        .nest("/forms", routes::forms::router())
        .nest("/settings", routes::settings::router())
        .nest("/home", routes::home::router())
        .nest("/admin", routes::admin::router())
        .route("/site-unlock", post(routes::unlock::site_unlock))
}
