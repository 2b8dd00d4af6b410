//! Order item balance tracking
//!
//! Holds the out-quantity an operator has typed for each order item and
//! keeps it within `quantity - quantity_delivered`. Nothing here talks to
//! the back-office.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{ReconciliationError, ReconciliationResult};
use crate::models::{Order, OrderItem};
use crate::validation::parse_quantity_input;

/// An order item together with the quantity chosen for this dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceLine {
    pub item: OrderItem,
    pub quantity_out: u32,
}

impl BalanceLine {
    pub fn pending(&self) -> u32 {
        self.item.pending()
    }

    pub fn value(&self) -> Decimal {
        self.item.price * Decimal::from(self.quantity_out)
    }
}

/// Per-item out-quantities bounded by pending balances
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceTracker {
    lines: Vec<BalanceLine>,
}

impl BalanceTracker {
    /// Seed every item of the order at quantity 0
    pub fn from_order(order: &Order) -> Self {
        Self::from_items(order.items.iter().cloned())
    }

    pub fn from_items(items: impl IntoIterator<Item = OrderItem>) -> Self {
        Self {
            lines: items
                .into_iter()
                .map(|item| BalanceLine {
                    item,
                    quantity_out: 0,
                })
                .collect(),
        }
    }

    pub fn lines(&self) -> &[BalanceLine] {
        &self.lines
    }

    pub fn quantity_out(&self, product_id: Uuid) -> Option<u32> {
        self.line(product_id).map(|l| l.quantity_out)
    }

    /// Store `value` unless it exceeds the pending balance.
    ///
    /// On rejection the previously stored quantity is kept.
    pub fn set_quantity(&mut self, product_id: Uuid, value: u32) -> ReconciliationResult<u32> {
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.item.product_id == product_id)
            .ok_or(ReconciliationError::UnknownItem(product_id))?;

        let pending = line.pending();
        if value > pending {
            return Err(ReconciliationError::ExceedsAvailable {
                product_id,
                product_name: line.item.product_name.clone(),
                requested: value,
                pending,
            });
        }

        line.quantity_out = value;
        Ok(value)
    }

    /// Same as [`set_quantity`](Self::set_quantity) from raw form text
    pub fn set_quantity_input(&mut self, product_id: Uuid, input: &str) -> ReconciliationResult<u32> {
        if self.line(product_id).is_none() {
            return Err(ReconciliationError::UnknownItem(product_id));
        }
        let value = parse_quantity_input(input)?;
        self.set_quantity(product_id, value)
    }

    /// Lines with something to dispatch
    pub fn selected(&self) -> impl Iterator<Item = &BalanceLine> {
        self.lines.iter().filter(|l| l.quantity_out > 0)
    }

    pub fn has_selection(&self) -> bool {
        self.selected().next().is_some()
    }

    pub fn total_units(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity_out)).sum()
    }

    pub fn total_value(&self) -> Decimal {
        self.lines.iter().map(BalanceLine::value).sum()
    }

    /// Reset every quantity to 0
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.quantity_out = 0;
        }
    }

    fn line(&self, product_id: Uuid) -> Option<&BalanceLine> {
        self.lines.iter().find(|l| l.item.product_id == product_id)
    }
}
