//! Dispatch (despacho) service
//!
//! Builds a daily load from fresh back-office data and submits it as a single
//! create request.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use shared::{
    filter_available_assets, filter_pending_orders, Asset, AssetScope, CreditCheck, DailyLoad,
    DispatchBuilder, DispatchInput, Order, ReconciliationError, Seller,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::external::BackofficeApi;
use crate::middleware::Session;

/// Dispatch service for creating daily loads
#[derive(Clone)]
pub struct DispatchService {
    api: Arc<dyn BackofficeApi>,
}

/// Result of a successful dispatch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    pub load: DailyLoad,
    pub credit_check: Option<CreditCheck>,
    /// Asset availability after the checkout
    pub available_assets: Vec<Asset>,
}

impl DispatchService {
    pub fn new(api: Arc<dyn BackofficeApi>) -> Self {
        Self { api }
    }

    pub async fn list_sellers(&self, session: &Session) -> AppResult<Vec<Seller>> {
        self.api.list_sellers(session).await
    }

    /// Orders of the seller that still have something to dispatch
    pub async fn list_pending_orders(
        &self,
        session: &Session,
        seller_id: Uuid,
    ) -> AppResult<Vec<Order>> {
        let orders = self.api.list_orders_for_seller(session, seller_id).await?;
        Ok(filter_pending_orders(orders, seller_id))
    }

    pub async fn list_available_assets(
        &self,
        session: &Session,
        scope: Option<AssetScope>,
    ) -> AppResult<Vec<Asset>> {
        let assets = self.api.list_assets(session, scope).await?;
        Ok(filter_available_assets(assets, scope))
    }

    /// Create a daily load.
    ///
    /// Seller, order and assets are re-read from the back-office so a stale
    /// browser list never decides what is dispatchable.
    pub async fn create_dispatch(
        &self,
        session: &Session,
        input: DispatchInput,
    ) -> AppResult<DispatchOutcome> {
        input.validate()?;

        let seller = self.api.get_seller(session, input.seller_id).await?;
        let order = self.api.get_order(session, input.order_id).await?;

        let mut builder = DispatchBuilder::new();
        builder.select_seller(seller);
        builder.select_order(order)?;
        builder.apply_lines(&input.items)?;

        if !input.asset_ids.is_empty() {
            let assets = self.api.list_assets(session, None).await?;
            for asset_id in &input.asset_ids {
                let asset = assets
                    .iter()
                    .find(|a| a.id == *asset_id)
                    .cloned()
                    .ok_or(ReconciliationError::UnknownAsset(*asset_id))?;
                builder.add_asset(asset)?;
            }
        }

        let date = input.date.unwrap_or_else(today);
        let mut load = builder.build(date)?;
        load.notes = input.notes.clone();

        let credit_check = builder.credit_check();
        if let Some(check) = credit_check.as_ref().filter(|c| c.exceeds) {
            tracing::warn!(
                seller_id = %input.seller_id,
                load_value = %check.load_value,
                available = %check.available,
                "Dispatch exceeds the seller's available credit"
            );
        }

        let created = self.api.create_daily_load(session, &load).await?;
        builder.reset();

        tracing::info!(
            load_id = ?created.id,
            seller_id = %created.seller_id,
            order_id = %created.order.id,
            items = created.items.len(),
            assets = created.asset_movements.len(),
            total = %created.total_load_value,
            operator = session.operator_label(),
            "Daily load created"
        );

        let available_assets = self.list_available_assets(session, None).await?;

        Ok(DispatchOutcome {
            load: created,
            credit_check,
            available_assets,
        })
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
