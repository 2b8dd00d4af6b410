//! Despacho reconciliation gateway server

use std::sync::Arc;

use despacho_backend::{create_app, external::RestBackofficeClient, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "despacho_server=debug,despacho_backend=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Despacho Reconciliation Gateway");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Back-office API: {}", config.backoffice.base_url);

    let client = RestBackofficeClient::new(&config.backoffice)?;
    let addr = config.bind_address();

    // Create application state
    let state = AppState::new(Arc::new(client), config);

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
