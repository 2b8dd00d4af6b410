//! Validation utilities for operator input
//!
//! Quantity and amount fields arrive as raw text from form inputs. An empty
//! field means "cleared", which is an explicit zero rather than an error.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{ReconciliationError, ReconciliationResult};
use crate::models::OrderStatus;
use crate::types::{has_money_scale, round_money};

// ============================================================================
// Input Parsing
// ============================================================================

/// Parse a quantity field. Blank input is 0.
pub fn parse_quantity_input(input: &str) -> ReconciliationResult<u32> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    if trimmed.starts_with('-') {
        return Err(ReconciliationError::InvalidQuantity(
            "quantity cannot be negative".to_string(),
        ));
    }
    trimmed.parse::<u32>().map_err(|_| {
        ReconciliationError::InvalidQuantity(format!("'{}' is not a whole number", trimmed))
    })
}

/// Parse a money field. Blank input is 0.
pub fn parse_amount_input(input: &str) -> ReconciliationResult<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let amount = Decimal::from_str(trimmed).map_err(|_| {
        ReconciliationError::InvalidAmount(format!("'{}' is not a number", trimmed))
    })?;
    validate_amount(amount)?;
    Ok(amount)
}

/// Amounts are non-negative and carry at most cent precision
pub fn validate_amount(amount: Decimal) -> ReconciliationResult<()> {
    if amount < Decimal::ZERO {
        return Err(ReconciliationError::InvalidAmount(
            "amount cannot be negative".to_string(),
        ));
    }
    if !has_money_scale(amount) {
        return Err(ReconciliationError::InvalidAmount(
            "amount cannot have more than two decimal places".to_string(),
        ));
    }
    Ok(())
}

// ============================================================================
// Payment Rules
// ============================================================================

/// Payment larger than what the seller owes
pub fn is_overpaying(payment: Decimal, current_debt: Decimal) -> bool {
    payment > round_money(current_debt)
}

/// Final settlement of a fully delivered order that leaves debt behind.
///
/// Amounts are compared exactly at cent scale.
pub fn is_underpaying_final(payment: Decimal, current_debt: Decimal, order_status: OrderStatus) -> bool {
    order_status.is_fully_delivered() && round_money(current_debt) - payment > Decimal::ZERO
}

/// Check a settlement payment against the seller's debt and the order state
pub fn validate_settlement_payment(
    payment: Decimal,
    current_debt: Decimal,
    order_status: OrderStatus,
) -> ReconciliationResult<()> {
    validate_amount(payment)?;
    let debt = round_money(current_debt);
    if is_overpaying(payment, debt) {
        return Err(ReconciliationError::Overpayment { payment, debt });
    }
    if is_underpaying_final(payment, debt, order_status) {
        return Err(ReconciliationError::UnderpaymentOnFinalDelivery { payment, debt });
    }
    Ok(())
}

/// Check a debt payment made outside of settlement
pub fn validate_debt_payment(amount: Decimal, current_debt: Decimal) -> ReconciliationResult<()> {
    validate_amount(amount)?;
    if amount == Decimal::ZERO {
        return Err(ReconciliationError::InvalidAmount(
            "payment must be greater than zero".to_string(),
        ));
    }
    let debt = round_money(current_debt);
    if is_overpaying(amount, debt) {
        return Err(ReconciliationError::Overpayment { payment: amount, debt });
    }
    Ok(())
}
