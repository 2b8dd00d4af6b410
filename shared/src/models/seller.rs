//! Seller (heladero) ledger models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::types::round_money;

/// A field seller with a running debt against a credit limit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub credit_limit: Decimal,
    /// Outstanding debt; older records call it `debt`
    #[serde(default, alias = "debt")]
    pub current_debt: Decimal,
}

impl Seller {
    /// Debt rounded to cents, the scale every payment comparison uses
    pub fn debt(&self) -> Decimal {
        round_money(self.current_debt)
    }

    /// Credit still available: `credit_limit - current_debt`
    pub fn available_credit(&self) -> Decimal {
        round_money(self.credit_limit) - self.debt()
    }

    /// Compare a prospective load value against the available credit.
    ///
    /// The result is advisory only; nothing downstream blocks on it.
    pub fn credit_check(&self, load_value: Decimal) -> CreditCheck {
        let available = self.available_credit();
        let load_value = round_money(load_value);
        let shortfall = (load_value - available).max(Decimal::ZERO);
        CreditCheck {
            available,
            load_value,
            exceeds: shortfall > Decimal::ZERO,
            shortfall,
        }
    }
}

/// Outcome of comparing a load value with a seller's available credit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreditCheck {
    pub available: Decimal,
    pub load_value: Decimal,
    pub exceeds: bool,
    pub shortfall: Decimal,
}

/// A debt payment (amortización) made outside of a settlement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DebtPayment {
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 120))]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}
