//! Seller ledger HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::DebtPayment;
use uuid::Uuid;

use crate::middleware::Session;
use crate::services::LedgerService;
use crate::AppState;

/// Seller debt, credit limit and available credit
pub async fn get_seller_balance(
    State(state): State<AppState>,
    session: Session,
    Path(seller_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = LedgerService::new(state.api.clone());

    match service.seller_balance(&session, seller_id).await {
        Ok(balance) => (StatusCode::OK, Json(balance)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Record a debt payment (amortización)
pub async fn record_payment(
    State(state): State<AppState>,
    session: Session,
    Path(seller_id): Path<Uuid>,
    Json(payment): Json<DebtPayment>,
) -> impl IntoResponse {
    let service = LedgerService::new(state.api.clone());

    match service.record_payment(&session, seller_id, payment).await {
        Ok(balance) => (StatusCode::CREATED, Json(balance)).into_response(),
        Err(e) => e.into_response(),
    }
}
