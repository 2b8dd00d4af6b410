//! Dispatch HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::{AssetScope, DispatchInput};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::Session;
use crate::services::DispatchService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AssetQuery {
    pub scope: Option<String>,
}

/// List all sellers
pub async fn list_sellers(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let service = DispatchService::new(state.api.clone());

    match service.list_sellers(&session).await {
        Ok(sellers) => (StatusCode::OK, Json(serde_json::json!({ "sellers": sellers }))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Orders of a seller with pending balances
pub async fn list_pending_orders(
    State(state): State<AppState>,
    session: Session,
    Path(seller_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = DispatchService::new(state.api.clone());

    match service.list_pending_orders(&session, seller_id).await {
        Ok(orders) => (StatusCode::OK, Json(serde_json::json!({ "orders": orders }))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Assets that can be checked out, optionally filtered by scope
pub async fn list_available_assets(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<AssetQuery>,
) -> impl IntoResponse {
    let scope = match query.scope.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => match raw.parse::<AssetScope>() {
            Ok(scope) => Some(scope),
            Err(message) => {
                return AppError::Validation {
                    field: "scope".to_string(),
                    message,
                    message_es: "Ámbito de activo inválido".to_string(),
                }
                .into_response()
            }
        },
        None => state.config.dispatch.default_asset_scope,
    };

    let service = DispatchService::new(state.api.clone());

    match service.list_available_assets(&session, scope).await {
        Ok(assets) => (StatusCode::OK, Json(serde_json::json!({ "assets": assets }))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a daily load (despacho)
pub async fn create_dispatch(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<DispatchInput>,
) -> impl IntoResponse {
    let service = DispatchService::new(state.api.clone());

    match service.create_dispatch(&session, input).await {
        Ok(outcome) => (StatusCode::CREATED, Json(outcome)).into_response(),
        Err(e) => e.into_response(),
    }
}
