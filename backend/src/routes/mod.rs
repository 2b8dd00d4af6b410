//! Route definitions for the dispatch gateway

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes.
///
/// Every route except `/health` requires a bearer token; the [`Session`]
/// extractor rejects requests without one.
///
/// [`Session`]: crate::middleware::Session
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        .nest("/sellers", seller_routes())
        .route("/assets/available", get(handlers::list_available_assets))
        .route("/dispatches", post(handlers::create_dispatch))
        .nest("/daily-loads", daily_load_routes())
}

/// Seller ledger and pending order routes
fn seller_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sellers))
        .route("/:seller_id/balance", get(handlers::get_seller_balance))
        .route("/:seller_id/payments", post(handlers::record_payment))
        .route("/:seller_id/pending-orders", get(handlers::list_pending_orders))
}

/// Settlement routes
fn daily_load_routes() -> Router<AppState> {
    Router::new()
        .route("/open", get(handlers::list_open_loads))
        .route(
            "/:load_id/settlement/preview",
            post(handlers::preview_settlement),
        )
        .route("/:load_id/close", post(handlers::close_load))
}
