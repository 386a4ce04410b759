//! Essentia site service binary

use essentia_api::{build_router, ApiState, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::var("ESSENTIA_CONFIG") {
        Ok(path) => match ServerConfig::load(&path) {
            Ok(config) => config.with_overrides(|key| std::env::var(key).ok()),
            Err(e) => {
                tracing::error!(path = %path, error = %e, "failed to load config");
                std::process::exit(1);
            }
        },
        Err(_) => ServerConfig::from_env(),
    };

    if config.internal_email.is_none() {
        tracing::warn!("ESSENTIA_INTERNAL_EMAIL not set; forms without a recipient will reject submissions");
    }

    let bind = config.bind.clone();
    tracing::info!(data_dir = %config.data_dir.display(), "starting Essentia site service");
    let app = build_router(ApiState::from_config(config));

    let listener = match tokio::net::TcpListener::bind(&bind).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(bind = %bind, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!("listening on {}", bind);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
    }
}
