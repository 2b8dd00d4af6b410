//! Order and order item models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order lifecycle as reported by the back-office
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pendiente,
    EntregadoParcial,
    Entregado,
    Cancelado,
    /// Any status this client does not know about
    #[serde(other)]
    Desconocido,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pendiente => "pendiente",
            OrderStatus::EntregadoParcial => "entregado_parcial",
            OrderStatus::Entregado => "entregado",
            OrderStatus::Cancelado => "cancelado",
            OrderStatus::Desconocido => "desconocido",
        }
    }

    /// Goods may still be dispatched against the order
    pub fn is_dispatchable(&self) -> bool {
        matches!(self, OrderStatus::Pendiente | OrderStatus::EntregadoParcial)
    }

    /// Every item has been delivered; settling against it is final
    pub fn is_fully_delivered(&self) -> bool {
        matches!(self, OrderStatus::Entregado)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line of an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: Uuid,
    pub product_name: String,
    /// Ordered total
    pub quantity: u32,
    /// Cumulative quantity dispatched and confirmed so far
    #[serde(default)]
    pub quantity_delivered: u32,
    pub price: Decimal,
}

impl OrderItem {
    /// Remaining quantity that may still be dispatched
    pub fn pending(&self) -> u32 {
        self.quantity.saturating_sub(self.quantity_delivered)
    }

    pub fn is_complete(&self) -> bool {
        self.pending() == 0
    }
}

/// A customer order placed by (or for) a seller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Owning user; for dispatch orders this is the seller
    pub user_id: Uuid,
}

impl Order {
    pub fn belongs_to(&self, seller_id: Uuid) -> bool {
        self.user_id == seller_id
    }

    pub fn total_pending(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.pending())).sum()
    }

    /// Status implied by item balances alone.
    ///
    /// Cancelled orders stay cancelled whatever their balances say.
    pub fn derived_status(&self) -> OrderStatus {
        if self.status == OrderStatus::Cancelado {
            return OrderStatus::Cancelado;
        }
        if !self.items.is_empty() && self.items.iter().all(OrderItem::is_complete) {
            OrderStatus::Entregado
        } else if self.items.iter().any(|i| i.quantity_delivered > 0) {
            OrderStatus::EntregadoParcial
        } else {
            OrderStatus::Pendiente
        }
    }
}

/// Keep only the orders a seller can still dispatch against
pub fn filter_pending_orders(orders: Vec<Order>, seller_id: Uuid) -> Vec<Order> {
    orders
        .into_iter()
        .filter(|o| o.belongs_to(seller_id) && o.status.is_dispatchable())
        .collect()
}
