//! Dispatch/settlement reconciliation gateway
//!
//! Sits between the browser and the back-office REST API, running the shared
//! dispatch and settlement engines server-side before anything is written.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};

use external::BackofficeApi;
use services::CloseGuard;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn BackofficeApi>,
    pub config: Arc<Config>,
    pub close_guard: CloseGuard,
}

impl AppState {
    pub fn new(api: Arc<dyn BackofficeApi>, config: Config) -> Self {
        Self {
            api,
            config: Arc::new(config),
            close_guard: CloseGuard::new(),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Despacho Reconciliation Gateway API v1"
}
