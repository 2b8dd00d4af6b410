//! Settlement HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::SettlementInput;
use uuid::Uuid;

use crate::middleware::Session;
use crate::services::SettlementService;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenLoadsQuery {
    pub seller_id: Option<Uuid>,
}

/// Open daily loads awaiting settlement
pub async fn list_open_loads(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<OpenLoadsQuery>,
) -> impl IntoResponse {
    let service = SettlementService::new(state.api.clone(), state.close_guard.clone());

    match service.list_open_loads(&session, query.seller_id).await {
        Ok(loads) => (StatusCode::OK, Json(serde_json::json!({ "loads": loads }))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Preview a settlement without closing the load
pub async fn preview_settlement(
    State(state): State<AppState>,
    session: Session,
    Path(load_id): Path<Uuid>,
    Json(input): Json<SettlementInput>,
) -> impl IntoResponse {
    let service = SettlementService::new(state.api.clone(), state.close_guard.clone());

    match service.preview(&session, load_id, input).await {
        Ok(preview) => (StatusCode::OK, Json(preview)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Close a daily load (liquidación)
pub async fn close_load(
    State(state): State<AppState>,
    session: Session,
    Path(load_id): Path<Uuid>,
    Json(input): Json<SettlementInput>,
) -> impl IntoResponse {
    let service = SettlementService::new(state.api.clone(), state.close_guard.clone());

    match service.close(&session, load_id, input).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => e.into_response(),
    }
}
