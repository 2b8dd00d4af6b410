//! In-memory back-office used by the gateway integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use despacho_backend::error::{AppError, AppResult};
use despacho_backend::external::BackofficeApi;
use despacho_backend::middleware::Session;
use despacho_backend::{AppState, Config};
use rust_decimal::Decimal;
use shared::{
    Asset, AssetScope, AssetStatus, DailyLoad, DailyLoadStatus, DebtPayment, LoadItem, Order,
    OrderItem, OrderRef, OrderStatus, Seller,
};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryBackoffice {
    pub sellers: Mutex<HashMap<Uuid, Seller>>,
    pub orders: Mutex<HashMap<Uuid, Order>>,
    pub assets: Mutex<Vec<Asset>>,
    pub loads: Mutex<HashMap<Uuid, DailyLoad>>,
    pub created: Mutex<Vec<DailyLoad>>,
    pub close_calls: AtomicUsize,
    pub payment_calls: AtomicUsize,
    pub close_delay: Option<Duration>,
    pub fail_close: bool,
}

impl InMemoryBackoffice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = Some(delay);
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn add_seller(&self, seller: Seller) {
        self.sellers.lock().unwrap().insert(seller.id, seller);
    }

    pub fn add_order(&self, order: Order) {
        self.orders.lock().unwrap().insert(order.id, order);
    }

    pub fn add_asset(&self, asset: Asset) {
        self.assets.lock().unwrap().push(asset);
    }

    pub fn add_load(&self, load: DailyLoad) {
        let id = load.id.expect("stored loads carry an id");
        self.loads.lock().unwrap().insert(id, load);
    }

    pub fn close_count(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    pub fn created_loads(&self) -> Vec<DailyLoad> {
        self.created.lock().unwrap().clone()
    }

    pub fn seller(&self, id: Uuid) -> Seller {
        self.sellers.lock().unwrap()[&id].clone()
    }
}

#[async_trait]
impl BackofficeApi for InMemoryBackoffice {
    async fn list_sellers(&self, _session: &Session) -> AppResult<Vec<Seller>> {
        Ok(self.sellers.lock().unwrap().values().cloned().collect())
    }

    async fn get_seller(&self, _session: &Session, seller_id: Uuid) -> AppResult<Seller> {
        self.sellers
            .lock()
            .unwrap()
            .get(&seller_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Seller".into()))
    }

    async fn list_orders_for_seller(&self, _session: &Session, seller_id: Uuid) -> AppResult<Vec<Order>> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .values()
            .filter(|o| o.user_id == seller_id)
            .cloned()
            .collect())
    }

    async fn get_order(&self, _session: &Session, order_id: Uuid) -> AppResult<Order> {
        self.orders
            .lock()
            .unwrap()
            .get(&order_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Order".into()))
    }

    async fn list_assets(&self, _session: &Session, scope: Option<AssetScope>) -> AppResult<Vec<Asset>> {
        Ok(self
            .assets
            .lock()
            .unwrap()
            .iter()
            .filter(|a| scope.map_or(true, |s| a.scope == s))
            .cloned()
            .collect())
    }

    async fn create_daily_load(&self, _session: &Session, load: &DailyLoad) -> AppResult<DailyLoad> {
        let mut stored = load.clone();
        let id = Uuid::new_v4();
        stored.id = Some(id);

        {
            let mut orders = self.orders.lock().unwrap();
            if let Some(order) = orders.get_mut(&load.order.id) {
                for line in &load.items {
                    if let Some(item) = order.items.iter_mut().find(|i| i.product_id == line.product_id) {
                        item.quantity_delivered += line.quantity_out;
                    }
                }
                order.status = order.derived_status();
            }
        }
        {
            let mut assets = self.assets.lock().unwrap();
            for movement in &load.asset_movements {
                if let Some(asset) = assets.iter_mut().find(|a| a.id == movement.asset_id) {
                    asset.status = AssetStatus::EnUso;
                }
            }
        }

        self.created.lock().unwrap().push(load.clone());
        self.loads.lock().unwrap().insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_daily_loads(
        &self,
        _session: &Session,
        status: Option<DailyLoadStatus>,
        seller_id: Option<Uuid>,
    ) -> AppResult<Vec<DailyLoad>> {
        Ok(self
            .loads
            .lock()
            .unwrap()
            .values()
            .filter(|l| status.map_or(true, |s| l.status == s))
            .filter(|l| seller_id.map_or(true, |id| l.seller_id == id))
            .cloned()
            .collect())
    }

    async fn get_daily_load(&self, _session: &Session, load_id: Uuid) -> AppResult<DailyLoad> {
        self.loads
            .lock()
            .unwrap()
            .get(&load_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Daily load".into()))
    }

    async fn close_daily_load(&self, _session: &Session, load_id: Uuid, load: &DailyLoad) -> AppResult<DailyLoad> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.close_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_close {
            return Err(AppError::ExternalService("Back-office error: 503".into()));
        }

        let mut closed = load.clone();
        closed.status = DailyLoadStatus::Closed;

        if let Some(seller) = self.sellers.lock().unwrap().get_mut(&load.seller_id) {
            seller.current_debt -= load.payment_amount;
        }
        {
            let mut assets = self.assets.lock().unwrap();
            for movement in &load.asset_movements {
                if let (Some(asset), Some(condition)) = (
                    assets.iter_mut().find(|a| a.id == movement.asset_id),
                    movement.status_in,
                ) {
                    asset.status = condition.resulting_status();
                }
            }
        }

        self.loads.lock().unwrap().insert(load_id, closed.clone());
        Ok(closed)
    }

    async fn record_payment(&self, _session: &Session, seller_id: Uuid, payment: &DebtPayment) -> AppResult<Seller> {
        self.payment_calls.fetch_add(1, Ordering::SeqCst);
        let mut sellers = self.sellers.lock().unwrap();
        let seller = sellers
            .get_mut(&seller_id)
            .ok_or_else(|| AppError::NotFound("Seller".into()))?;
        seller.current_debt -= payment.amount;
        Ok(seller.clone())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn session() -> Session {
    Session::new("test-token")
}

pub fn state(api: Arc<InMemoryBackoffice>) -> AppState {
    AppState::new(api, Config::default())
}

pub fn seller(credit_limit: i64, debt: i64) -> Seller {
    Seller {
        id: Uuid::new_v4(),
        name: "María López".to_string(),
        phone: None,
        email: None,
        address: None,
        credit_limit: Decimal::from(credit_limit),
        current_debt: Decimal::from(debt),
    }
}

pub fn order_item(quantity: u32, delivered: u32, price: Decimal) -> OrderItem {
    OrderItem {
        product_id: Uuid::new_v4(),
        product_name: "Paleta de fresa".to_string(),
        quantity,
        quantity_delivered: delivered,
        price,
    }
}

pub fn order(seller_id: Uuid, status: OrderStatus, items: Vec<OrderItem>) -> Order {
    Order {
        id: Uuid::new_v4(),
        order_number: "PED-0042".to_string(),
        status,
        items,
        user_id: seller_id,
    }
}

pub fn asset(code: &str, scope: AssetScope, status: AssetStatus) -> Asset {
    Asset {
        id: Uuid::new_v4(),
        code: code.to_string(),
        name: format!("Triciclo {}", code),
        asset_type: "triciclo".to_string(),
        scope,
        status,
    }
}

pub fn open_load(seller_id: Uuid, order: &Order, items: Vec<LoadItem>) -> DailyLoad {
    let mut load = DailyLoad {
        id: Some(Uuid::new_v4()),
        seller_id,
        date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
        status: DailyLoadStatus::Open,
        order: OrderRef {
            id: order.id,
            order_number: Some(order.order_number.clone()),
            status: Some(order.status),
        },
        items,
        asset_movements: vec![],
        total_load_value: Decimal::ZERO,
        payment_amount: Decimal::ZERO,
        notes: None,
    };
    load.total_load_value = load.compute_total_value();
    load
}

pub fn load_item(product_id: Uuid, quantity_out: u32, unit_price: Decimal) -> LoadItem {
    LoadItem {
        product_id,
        product_name: "Paleta de fresa".to_string(),
        quantity_out,
        quantity_in: 0,
        quantity_bad: 0,
        unit_price,
    }
}
