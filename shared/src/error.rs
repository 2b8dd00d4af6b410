//! Validation failures raised by the dispatch and settlement engines
//!
//! These never reach the back-office: the action is blocked locally and the
//! message is shown to the operator.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AssetStatus, OrderStatus};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationError {
    #[error("Requested {requested} of {product_name} but only {pending} are pending")]
    ExceedsAvailable {
        product_id: Uuid,
        product_name: String,
        requested: u32,
        pending: u32,
    },

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Product {0} is not part of this order or load")]
    UnknownItem(Uuid),

    #[error("Asset {0} is not part of this load")]
    UnknownAsset(Uuid),

    #[error("A seller must be selected first")]
    SellerNotSelected,

    #[error("An order must be selected first")]
    OrderNotSelected,

    #[error("Order {order_number} does not belong to the selected seller")]
    OrderNotOwned { order_number: String },

    #[error("Order {order_number} cannot be dispatched while {status}")]
    OrderNotDispatchable {
        order_number: String,
        status: OrderStatus,
    },

    #[error("At least one item must have a quantity greater than zero")]
    NoItemsSelected,

    #[error("Asset {code} is not available ({status})")]
    AssetUnavailable { code: String, status: AssetStatus },

    #[error("Payment of {payment} exceeds the current debt of {debt}")]
    Overpayment { payment: Decimal, debt: Decimal },

    #[error("Order is fully delivered: payment of {payment} must settle the full debt of {debt}")]
    UnderpaymentOnFinalDelivery { payment: Decimal, debt: Decimal },

    #[error("Daily load is already closed")]
    LoadClosed,

    #[error("A close request for this load is already in progress")]
    CloseInProgress,
}

impl ReconciliationError {
    /// Stable code for clients
    pub fn code(&self) -> &'static str {
        match self {
            ReconciliationError::ExceedsAvailable { .. } => "EXCEEDS_AVAILABLE",
            ReconciliationError::InvalidQuantity(_) => "INVALID_QUANTITY",
            ReconciliationError::InvalidAmount(_) => "INVALID_AMOUNT",
            ReconciliationError::UnknownItem(_) => "UNKNOWN_ITEM",
            ReconciliationError::UnknownAsset(_) => "UNKNOWN_ASSET",
            ReconciliationError::SellerNotSelected => "SELLER_NOT_SELECTED",
            ReconciliationError::OrderNotSelected => "ORDER_NOT_SELECTED",
            ReconciliationError::OrderNotOwned { .. } => "ORDER_NOT_OWNED",
            ReconciliationError::OrderNotDispatchable { .. } => "ORDER_NOT_DISPATCHABLE",
            ReconciliationError::NoItemsSelected => "NO_ITEMS_SELECTED",
            ReconciliationError::AssetUnavailable { .. } => "ASSET_UNAVAILABLE",
            ReconciliationError::Overpayment { .. } => "OVERPAYMENT",
            ReconciliationError::UnderpaymentOnFinalDelivery { .. } => {
                "UNDERPAYMENT_ON_FINAL_DELIVERY"
            }
            ReconciliationError::LoadClosed => "LOAD_CLOSED",
            ReconciliationError::CloseInProgress => "CLOSE_IN_PROGRESS",
        }
    }

    /// Message shown to operators in Spanish
    pub fn message_es(&self) -> String {
        match self {
            ReconciliationError::ExceedsAvailable {
                product_name,
                requested,
                pending,
                ..
            } => format!(
                "La cantidad de {} ({}) supera el saldo pendiente ({})",
                product_name, requested, pending
            ),
            ReconciliationError::InvalidQuantity(msg) => format!("Cantidad inválida: {}", msg),
            ReconciliationError::InvalidAmount(msg) => format!("Monto inválido: {}", msg),
            ReconciliationError::UnknownItem(_) => {
                "El producto no pertenece a este pedido o despacho".to_string()
            }
            ReconciliationError::UnknownAsset(_) => {
                "El activo no pertenece a este despacho".to_string()
            }
            ReconciliationError::SellerNotSelected => "Seleccione primero un heladero".to_string(),
            ReconciliationError::OrderNotSelected => "Seleccione primero un pedido".to_string(),
            ReconciliationError::OrderNotOwned { order_number } => format!(
                "El pedido {} no pertenece al heladero seleccionado",
                order_number
            ),
            ReconciliationError::OrderNotDispatchable {
                order_number,
                status,
            } => format!(
                "El pedido {} no se puede despachar en estado {}",
                order_number, status
            ),
            ReconciliationError::NoItemsSelected => {
                "Debe despachar al menos un producto con cantidad mayor a cero".to_string()
            }
            ReconciliationError::AssetUnavailable { code, status } => {
                format!("El activo {} no está disponible ({})", code, status)
            }
            ReconciliationError::Overpayment { payment, debt } => format!(
                "El pago de {} supera la deuda actual de {}",
                payment, debt
            ),
            ReconciliationError::UnderpaymentOnFinalDelivery { payment, debt } => format!(
                "Pedido entregado por completo: el pago de {} debe cancelar la deuda total de {}",
                payment, debt
            ),
            ReconciliationError::LoadClosed => "El despacho ya está liquidado".to_string(),
            ReconciliationError::CloseInProgress => {
                "La liquidación de este despacho ya se está procesando".to_string()
            }
        }
    }

    /// Rejections the operator should see as a warning rather than a failure
    pub fn is_warning(&self) -> bool {
        matches!(self, ReconciliationError::ExceedsAvailable { .. })
    }
}

pub type ReconciliationResult<T> = Result<T, ReconciliationError>;
