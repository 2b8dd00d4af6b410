//! Daily load (despacho) models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AssetCondition, OrderStatus};

/// Daily load lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DailyLoadStatus {
    Open,
    Closed,
}

impl DailyLoadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DailyLoadStatus::Open => "open",
            DailyLoadStatus::Closed => "closed",
        }
    }
}

/// Reference to the order a load is dispatched against
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderRef {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
}

/// A product line carried on a daily load
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadItem {
    pub product_id: Uuid,
    #[serde(default)]
    pub product_name: String,
    /// Dispatched with this load
    pub quantity_out: u32,
    /// Returned in sellable condition at settlement
    #[serde(default)]
    pub quantity_in: u32,
    /// Returned damaged at settlement
    #[serde(default)]
    pub quantity_bad: u32,
    pub unit_price: Decimal,
}

impl LoadItem {
    pub fn line_value(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity_out)
    }

    pub fn quantity_returned(&self) -> u32 {
        self.quantity_in.saturating_add(self.quantity_bad)
    }

    /// Units neither returned good nor returned damaged
    pub fn quantity_sold(&self) -> u32 {
        self.quantity_out.saturating_sub(self.quantity_returned())
    }

    /// More units came back than went out
    pub fn is_over_returned(&self) -> bool {
        self.quantity_returned() > self.quantity_out
    }
}

/// Checkout of one asset with a daily load
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetMovement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub asset_id: Uuid,
    #[serde(default)]
    pub asset_code: String,
    /// Condition recorded when the load is settled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_in: Option<AssetCondition>,
}

/// One day's outbound goods and assets for a single seller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyLoad {
    /// Assigned by the back-office on creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub seller_id: Uuid,
    pub date: NaiveDate,
    pub status: DailyLoadStatus,
    pub order: OrderRef,
    #[serde(default)]
    pub items: Vec<LoadItem>,
    #[serde(default)]
    pub asset_movements: Vec<AssetMovement>,
    #[serde(default)]
    pub total_load_value: Decimal,
    #[serde(default)]
    pub payment_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DailyLoad {
    pub fn is_open(&self) -> bool {
        self.status == DailyLoadStatus::Open
    }

    /// Sum of line values at dispatch prices
    pub fn compute_total_value(&self) -> Decimal {
        self.items.iter().map(LoadItem::line_value).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn load_item(out: u32, good: u32, bad: u32, price: &str) -> LoadItem {
        LoadItem {
            product_id: Uuid::new_v4(),
            product_name: "Helado de vainilla".to_string(),
            quantity_out: out,
            quantity_in: good,
            quantity_bad: bad,
            unit_price: Decimal::from_str(price).unwrap(),
        }
    }

    #[test]
    fn test_load_item_quantities() {
        let item = load_item(20, 5, 2, "1.50");
        assert_eq!(item.quantity_returned(), 7);
        assert_eq!(item.quantity_sold(), 13);
        assert_eq!(item.line_value(), Decimal::from_str("30.00").unwrap());
        assert!(!item.is_over_returned());

        let over = load_item(5, 4, 3, "1.00");
        assert!(over.is_over_returned());
        assert_eq!(over.quantity_sold(), 0);
    }

    #[test]
    fn test_daily_load_wire_format() {
        let json = r#"{
            "id": "7d3c1c2e-52a4-4a3e-9b8b-0b8f3f7b1d11",
            "sellerId": "0c7f0d7e-0f5d-4b7e-9a55-6b2f3c4d5e6f",
            "date": "2026-10-16",
            "status": "open",
            "order": {"id": "3a1e2f4b-1c2d-4e5f-8a9b-0c1d2e3f4a5b", "status": "entregado"},
            "items": [{
                "productId": "9b8a7c6d-5e4f-4a3b-8c2d-1e0f9a8b7c6d",
                "productName": "Paleta",
                "quantityOut": 10,
                "unitPrice": 1.25
            }],
            "totalLoadValue": "12.50"
        }"#;

        let load: DailyLoad = serde_json::from_str(json).unwrap();
        assert!(load.is_open());
        assert_eq!(load.order.status, Some(OrderStatus::Entregado));
        assert_eq!(load.items[0].quantity_in, 0);
        assert!(load.asset_movements.is_empty());
        assert_eq!(load.compute_total_value(), Decimal::from_str("12.50").unwrap());
        assert_eq!(load.payment_amount, Decimal::ZERO);
    }
}
