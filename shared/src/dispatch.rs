//! Dispatch builder
//!
//! Assembles a daily load from a seller, one of their pending orders, the
//! chosen out-quantities and the assets being checked out.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::balance::BalanceTracker;
use crate::error::{ReconciliationError, ReconciliationResult};
use crate::models::{
    filter_pending_orders, Asset, AssetMovement, CreditCheck, DailyLoad, DailyLoadStatus,
    LoadItem, Order, OrderRef, Seller,
};

/// Local draft of a dispatch, edited field by field before submission
#[derive(Debug, Clone, Default)]
pub struct DispatchBuilder {
    seller: Option<Seller>,
    order: Option<Order>,
    balances: BalanceTracker,
    assets: Vec<Asset>,
}

impl DispatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose the seller; anything picked for a previous seller is dropped
    pub fn select_seller(&mut self, seller: Seller) {
        self.reset();
        self.seller = Some(seller);
    }

    pub fn seller(&self) -> Option<&Seller> {
        self.seller.as_ref()
    }

    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    pub fn balances(&self) -> &BalanceTracker {
        &self.balances
    }

    /// Orders of the selected seller that can still be dispatched
    pub fn dispatchable_orders(&self, orders: Vec<Order>) -> ReconciliationResult<Vec<Order>> {
        let seller = self
            .seller
            .as_ref()
            .ok_or(ReconciliationError::SellerNotSelected)?;
        Ok(filter_pending_orders(orders, seller.id))
    }

    /// Choose the order to dispatch against and reset quantities to 0
    pub fn select_order(&mut self, order: Order) -> ReconciliationResult<()> {
        let seller = self
            .seller
            .as_ref()
            .ok_or(ReconciliationError::SellerNotSelected)?;

        if !order.belongs_to(seller.id) {
            return Err(ReconciliationError::OrderNotOwned {
                order_number: order.order_number,
            });
        }
        if !order.status.is_dispatchable() {
            return Err(ReconciliationError::OrderNotDispatchable {
                order_number: order.order_number,
                status: order.status,
            });
        }

        self.balances = BalanceTracker::from_order(&order);
        self.order = Some(order);
        Ok(())
    }

    pub fn set_quantity(&mut self, product_id: Uuid, value: u32) -> ReconciliationResult<u32> {
        self.require_order()?;
        self.balances.set_quantity(product_id, value)
    }

    pub fn set_quantity_input(&mut self, product_id: Uuid, input: &str) -> ReconciliationResult<u32> {
        self.require_order()?;
        self.balances.set_quantity_input(product_id, input)
    }

    /// Add an asset to the checkout list.
    ///
    /// Returns `Ok(false)` when the asset is already on the list.
    pub fn add_asset(&mut self, asset: Asset) -> ReconciliationResult<bool> {
        if !asset.is_available() {
            return Err(ReconciliationError::AssetUnavailable {
                code: asset.code,
                status: asset.status,
            });
        }
        if self.assets.iter().any(|a| a.id == asset.id) {
            return Ok(false);
        }
        self.assets.push(asset);
        Ok(true)
    }

    pub fn remove_asset(&mut self, asset_id: Uuid) -> bool {
        let before = self.assets.len();
        self.assets.retain(|a| a.id != asset_id);
        self.assets.len() != before
    }

    pub fn selected_assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn load_value(&self) -> Decimal {
        self.balances.total_value()
    }

    /// Advisory credit check of the current draft
    pub fn credit_check(&self) -> Option<CreditCheck> {
        self.seller
            .as_ref()
            .map(|s| s.credit_check(self.load_value()))
    }

    /// Produce the daily-load creation request
    pub fn build(&self, date: NaiveDate) -> ReconciliationResult<DailyLoad> {
        let seller = self
            .seller
            .as_ref()
            .ok_or(ReconciliationError::SellerNotSelected)?;
        let order = self.require_order()?;

        if !self.balances.has_selection() {
            return Err(ReconciliationError::NoItemsSelected);
        }

        let items: Vec<LoadItem> = self
            .balances
            .selected()
            .map(|line| LoadItem {
                product_id: line.item.product_id,
                product_name: line.item.product_name.clone(),
                quantity_out: line.quantity_out,
                quantity_in: 0,
                quantity_bad: 0,
                unit_price: line.item.price,
            })
            .collect();

        let asset_movements = self
            .assets
            .iter()
            .map(|a| AssetMovement {
                id: None,
                asset_id: a.id,
                asset_code: a.code.clone(),
                status_in: None,
            })
            .collect();

        let mut load = DailyLoad {
            id: None,
            seller_id: seller.id,
            date,
            status: DailyLoadStatus::Open,
            order: OrderRef {
                id: order.id,
                order_number: Some(order.order_number.clone()),
                status: Some(order.status),
            },
            items,
            asset_movements,
            total_load_value: Decimal::ZERO,
            payment_amount: Decimal::ZERO,
            notes: None,
        };
        load.total_load_value = load.compute_total_value();
        Ok(load)
    }

    /// Clear the draft after a successful submission
    pub fn reset(&mut self) {
        self.seller = None;
        self.order = None;
        self.balances = BalanceTracker::default();
        self.assets.clear();
    }

    fn require_order(&self) -> ReconciliationResult<&Order> {
        self.order.as_ref().ok_or(ReconciliationError::OrderNotSelected)
    }
}

/// Out-quantity for one product in a dispatch request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DispatchLineInput {
    pub product_id: Uuid,
    pub quantity_out: u32,
}

/// Dispatch request as submitted by the browser
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DispatchInput {
    pub seller_id: Uuid,
    pub order_id: Uuid,
    #[serde(default)]
    pub items: Vec<DispatchLineInput>,
    #[serde(default)]
    pub asset_ids: Vec<Uuid>,
    /// Defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

impl DispatchBuilder {
    /// Apply every requested out-quantity, stopping at the first rejection
    pub fn apply_lines(&mut self, lines: &[DispatchLineInput]) -> ReconciliationResult<()> {
        for line in lines {
            self.set_quantity(line.product_id, line.quantity_out)?;
        }
        Ok(())
    }
}
