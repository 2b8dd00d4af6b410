//! Settlement (liquidación) engine
//!
//! Closes an open daily load by reconciling returned quantities, the
//! condition of checked-out assets and the cash payment against the seller's
//! debt. All checks run locally; a failing check never reaches the network.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{ReconciliationError, ReconciliationResult};
use crate::models::{AssetCondition, DailyLoad, OrderStatus};
use crate::types::round_money;
use crate::validation::{
    is_overpaying, is_underpaying_final, parse_amount_input, parse_quantity_input,
    validate_amount, validate_settlement_payment,
};

/// Where a settlement draft is in its close lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementPhase {
    Editing,
    Submitting,
    Closed,
}

/// Returned quantities for one load item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct ReturnPair {
    good: u32,
    bad: u32,
}

/// An item whose returns exceed what went out.
///
/// Reported, not blocked: staff counts are trusted as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverReturn {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity_out: u32,
    pub quantity_returned: u32,
}

/// Money and unit totals of a settlement draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementSummary {
    pub units_out: u64,
    pub units_returned: u64,
    pub units_bad: u64,
    pub units_sold: u64,
    pub load_value: Decimal,
    pub returned_value: Decimal,
    pub bad_value: Decimal,
    pub sold_value: Decimal,
    pub payment_amount: Decimal,
    pub debt_before: Decimal,
    pub debt_after: Decimal,
    pub final_settlement: bool,
}

/// Editable reconciliation of one open daily load.
///
/// Holds the seller's debt and the linked order status it was opened with;
/// callers re-open a fresh draft to pick up newer server state.
#[derive(Debug, Clone)]
pub struct SettlementDraft {
    load: DailyLoad,
    current_debt: Decimal,
    order_status: OrderStatus,
    returns: Vec<ReturnPair>,
    conditions: Vec<AssetCondition>,
    payment: Decimal,
    phase: SettlementPhase,
}

impl SettlementDraft {
    /// Start settling `load`. Returns and conditions start at their defaults.
    pub fn open(
        load: DailyLoad,
        current_debt: Decimal,
        order_status: OrderStatus,
    ) -> ReconciliationResult<Self> {
        if !load.is_open() {
            return Err(ReconciliationError::LoadClosed);
        }
        let returns = vec![ReturnPair::default(); load.items.len()];
        let conditions = vec![AssetCondition::default(); load.asset_movements.len()];
        Ok(Self {
            load,
            current_debt: round_money(current_debt),
            order_status,
            returns,
            conditions,
            payment: Decimal::ZERO,
            phase: SettlementPhase::Editing,
        })
    }

    pub fn load(&self) -> &DailyLoad {
        &self.load
    }

    pub fn phase(&self) -> SettlementPhase {
        self.phase
    }

    pub fn current_debt(&self) -> Decimal {
        self.current_debt
    }

    pub fn payment(&self) -> Decimal {
        self.payment
    }

    pub fn order_status(&self) -> OrderStatus {
        self.order_status
    }

    /// Record returned quantities for one product
    pub fn set_returns(&mut self, product_id: Uuid, good: u32, bad: u32) -> ReconciliationResult<()> {
        self.ensure_editable()?;
        let idx = self.item_index(product_id)?;
        self.returns[idx] = ReturnPair { good, bad };
        Ok(())
    }

    /// Same as [`set_returns`](Self::set_returns) from raw form text; blank fields are 0
    pub fn set_returns_input(&mut self, product_id: Uuid, good: &str, bad: &str) -> ReconciliationResult<()> {
        self.ensure_editable()?;
        let idx = self.item_index(product_id)?;
        let good = parse_quantity_input(good)?;
        let bad = parse_quantity_input(bad)?;
        self.returns[idx] = ReturnPair { good, bad };
        Ok(())
    }

    pub fn set_asset_condition(&mut self, asset_id: Uuid, condition: AssetCondition) -> ReconciliationResult<()> {
        self.ensure_editable()?;
        let idx = self
            .load
            .asset_movements
            .iter()
            .position(|m| m.asset_id == asset_id)
            .ok_or(ReconciliationError::UnknownAsset(asset_id))?;
        self.conditions[idx] = condition;
        Ok(())
    }

    /// Store the payment. Comparison with the debt happens in `validate`.
    pub fn set_payment(&mut self, amount: Decimal) -> ReconciliationResult<()> {
        self.ensure_editable()?;
        validate_amount(amount)?;
        self.payment = amount;
        Ok(())
    }

    pub fn set_payment_input(&mut self, input: &str) -> ReconciliationResult<()> {
        self.ensure_editable()?;
        self.payment = parse_amount_input(input)?;
        Ok(())
    }

    /// Apply a full set of reconciliation values
    pub fn apply(&mut self, input: &SettlementInput) -> ReconciliationResult<()> {
        for r in &input.returns {
            self.set_returns(r.product_id, r.quantity_in, r.quantity_bad)?;
        }
        for a in &input.asset_returns {
            self.set_asset_condition(a.asset_id, a.condition)?;
        }
        self.set_payment(input.payment_amount)?;
        if input.notes.is_some() {
            self.load.notes = input.notes.clone();
        }
        Ok(())
    }

    pub fn is_overpaying(&self) -> bool {
        is_overpaying(self.payment, self.current_debt)
    }

    pub fn is_underpaying_final(&self) -> bool {
        is_underpaying_final(self.payment, self.current_debt, self.order_status)
    }

    /// The linked order is fully delivered, so this settlement clears the debt
    pub fn is_final_settlement(&self) -> bool {
        self.order_status.is_fully_delivered()
    }

    pub fn over_returned_items(&self) -> Vec<OverReturn> {
        self.load
            .items
            .iter()
            .zip(&self.returns)
            .filter(|(item, r)| r.good.saturating_add(r.bad) > item.quantity_out)
            .map(|(item, r)| OverReturn {
                product_id: item.product_id,
                product_name: item.product_name.clone(),
                quantity_out: item.quantity_out,
                quantity_returned: r.good.saturating_add(r.bad),
            })
            .collect()
    }

    /// Every check that must pass before the load may be closed
    pub fn validate(&self) -> ReconciliationResult<()> {
        match self.phase {
            SettlementPhase::Closed => return Err(ReconciliationError::LoadClosed),
            SettlementPhase::Submitting => return Err(ReconciliationError::CloseInProgress),
            SettlementPhase::Editing => {}
        }
        validate_settlement_payment(self.payment, self.current_debt, self.order_status)
    }

    pub fn can_close(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn summary(&self) -> SettlementSummary {
        let mut summary = SettlementSummary {
            units_out: 0,
            units_returned: 0,
            units_bad: 0,
            units_sold: 0,
            load_value: Decimal::ZERO,
            returned_value: Decimal::ZERO,
            bad_value: Decimal::ZERO,
            sold_value: Decimal::ZERO,
            payment_amount: self.payment,
            debt_before: self.current_debt,
            debt_after: self.current_debt - self.payment,
            final_settlement: self.is_final_settlement(),
        };

        for (item, r) in self.load.items.iter().zip(&self.returns) {
            let sold = item
                .quantity_out
                .saturating_sub(r.good.saturating_add(r.bad));
            summary.units_out += u64::from(item.quantity_out);
            summary.units_returned += u64::from(r.good);
            summary.units_bad += u64::from(r.bad);
            summary.units_sold += u64::from(sold);
            summary.load_value += item.line_value();
            summary.returned_value += item.unit_price * Decimal::from(r.good);
            summary.bad_value += item.unit_price * Decimal::from(r.bad);
            summary.sold_value += item.unit_price * Decimal::from(sold);
        }

        summary
    }

    /// The close payload: the load with returns, conditions and payment filled in
    pub fn close_request(&self) -> ReconciliationResult<DailyLoad> {
        self.validate()?;

        let mut load = self.load.clone();
        for (item, r) in load.items.iter_mut().zip(&self.returns) {
            item.quantity_in = r.good;
            item.quantity_bad = r.bad;
        }
        for (movement, condition) in load.asset_movements.iter_mut().zip(&self.conditions) {
            movement.status_in = Some(*condition);
        }
        load.payment_amount = self.payment;
        Ok(load)
    }

    /// Validate and lock the draft for submission.
    ///
    /// A second call while the first is in flight is refused, so a double
    /// submit never produces two close requests.
    pub fn begin_close(&mut self) -> ReconciliationResult<DailyLoad> {
        let request = self.close_request()?;
        self.phase = SettlementPhase::Submitting;
        Ok(request)
    }

    /// The back-office accepted the close; adopt its version of the load
    pub fn complete_close(&mut self, closed: DailyLoad) {
        self.load = closed;
        self.phase = SettlementPhase::Closed;
    }

    /// The close failed; local values are untouched and editable again
    pub fn abort_close(&mut self) {
        if self.phase == SettlementPhase::Submitting {
            self.phase = SettlementPhase::Editing;
        }
    }

    fn ensure_editable(&self) -> ReconciliationResult<()> {
        match self.phase {
            SettlementPhase::Editing => Ok(()),
            SettlementPhase::Submitting => Err(ReconciliationError::CloseInProgress),
            SettlementPhase::Closed => Err(ReconciliationError::LoadClosed),
        }
    }

    fn item_index(&self, product_id: Uuid) -> ReconciliationResult<usize> {
        self.load
            .items
            .iter()
            .position(|i| i.product_id == product_id)
            .ok_or(ReconciliationError::UnknownItem(product_id))
    }
}

/// Returned quantities for one product in a settlement request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemReturnInput {
    pub product_id: Uuid,
    #[serde(default)]
    pub quantity_in: u32,
    #[serde(default)]
    pub quantity_bad: u32,
}

/// Returned condition for one asset in a settlement request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetReturnInput {
    pub asset_id: Uuid,
    #[serde(default)]
    pub condition: AssetCondition,
}

/// Settlement values as submitted by the browser.
///
/// Anything omitted keeps its default: zero returns, `bueno`, no payment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SettlementInput {
    #[serde(default)]
    pub returns: Vec<ItemReturnInput>,
    #[serde(default)]
    pub asset_returns: Vec<AssetReturnInput>,
    #[serde(default)]
    pub payment_amount: Decimal,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// What the operator sees before confirming a close
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementPreview {
    pub summary: SettlementSummary,
    pub is_overpaying: bool,
    pub is_underpaying_final: bool,
    pub over_returned: Vec<OverReturn>,
    pub can_close: bool,
}

impl From<&SettlementDraft> for SettlementPreview {
    fn from(draft: &SettlementDraft) -> Self {
        Self {
            summary: draft.summary(),
            is_overpaying: draft.is_overpaying(),
            is_underpaying_final: draft.is_underpaying_final(),
            over_returned: draft.over_returned_items(),
            can_close: draft.can_close(),
        }
    }
}
