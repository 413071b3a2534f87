use rust_citizen_api::config::{Config, ConfigStore, ServerConfig};
use rust_citizen_api::handlers::{self, AppState};
use rust_citizen_api::service::CitizenService;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the mock citizen backend.
///
/// Serves the citizen service over HTTP so front-end components can be
/// pointed at it during development. Without `CITIZEN_API_BASE_URL` every
/// route answers from mock data; with it, requests are forwarded to the
/// configured backend.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Ok if the server runs successfully, or an error if initialization fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_citizen_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let server_config = ServerConfig::from_env()?;
    let config = Config::from_env()?;

    let service =
        CitizenService::new(ConfigStore::new(config))?.with_mock_delay(server_config.mock_delay);
    tracing::info!("Citizen service initialized");

    let app_state = Arc::new(AppState { service });

    let app = handlers::router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", server_config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
