//! WebAssembly module for the dispatch back-office
//!
//! Provides client-side validation so the page can reject a bad quantity or
//! payment before any network call:
//! - Pending balances and quantity input checks
//! - Daily-load construction from a dispatch draft
//! - Settlement previews and payment rules
//!
//! Every export takes and returns JSON strings. Errors are JSON objects with
//! `code`, `message`, `messageEs` and `warning`.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::{
    BalanceTracker, DispatchBuilder, DispatchLineInput, ReconciliationError, SettlementDraft,
    SettlementInput, SettlementPreview,
};

/// Error payload handed back to JavaScript
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BindingError {
    pub code: String,
    pub message: String,
    pub message_es: String,
    pub warning: bool,
}

impl From<ReconciliationError> for BindingError {
    fn from(err: ReconciliationError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            message_es: err.message_es(),
            warning: err.is_warning(),
        }
    }
}

impl BindingError {
    fn invalid_json(what: &str, err: serde_json::Error) -> Self {
        Self {
            code: "INVALID_JSON".to_string(),
            message: format!("Invalid {} JSON: {}", what, err),
            message_es: format!("JSON de {} inválido", what),
            warning: false,
        }
    }

    fn to_js(&self) -> JsValue {
        JsValue::from_str(&serde_json::to_string(self).unwrap_or_else(|_| self.message.clone()))
    }
}

type BindingResult<T> = Result<T, BindingError>;

/// Everything the page holds when the operator presses "Despachar"
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchDraft {
    pub seller: Seller,
    pub order: Order,
    #[serde(default)]
    pub items: Vec<DispatchLineInput>,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// An open load with the context the settlement rules need
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRequest {
    pub load: DailyLoad,
    pub current_debt: Decimal,
    pub order_status: OrderStatus,
    #[serde(default)]
    pub input: SettlementInput,
}

// ============================================================================
// Pure helpers
// ============================================================================

fn parse<T: for<'de> Deserialize<'de>>(json: &str, what: &str) -> BindingResult<T> {
    serde_json::from_str(json).map_err(|e| BindingError::invalid_json(what, e))
}

fn to_json<T: Serialize>(value: &T) -> BindingResult<String> {
    serde_json::to_string(value).map_err(|e| BindingError::invalid_json("response", e))
}

fn parse_payment(input: &str) -> BindingResult<Decimal> {
    Ok(parse_amount_input(input)?)
}

/// Debts come from the back-office as-is: negative means credit in favour of
/// the seller, and extra decimals are rounded to cents like the gateway does.
fn parse_debt(input: &str) -> BindingResult<Decimal> {
    let trimmed = input.trim();
    let debt = Decimal::from_str(trimmed).map_err(|_| {
        ReconciliationError::InvalidAmount(format!("'{}' is not a number", trimmed))
    })?;
    Ok(round_money(debt))
}

pub fn pending_for_item(item_json: &str) -> BindingResult<u32> {
    let item: OrderItem = parse(item_json, "order item")?;
    Ok(item.pending())
}

/// Check a typed out-quantity against the item's pending balance
pub fn check_quantity_input(item_json: &str, input: &str) -> BindingResult<u32> {
    let item: OrderItem = parse(item_json, "order item")?;
    let product_id = item.product_id;
    let mut tracker = BalanceTracker::from_items(vec![item]);
    Ok(tracker.set_quantity_input(product_id, input)?)
}

pub fn build_load(draft_json: &str, today: NaiveDate) -> BindingResult<String> {
    let draft: DispatchDraft = parse(draft_json, "dispatch draft")?;

    let mut builder = DispatchBuilder::new();
    builder.select_seller(draft.seller);
    builder.select_order(draft.order)?;
    builder.apply_lines(&draft.items)?;
    for asset in draft.assets {
        builder.add_asset(asset)?;
    }

    let mut load = builder.build(draft.date.unwrap_or(today))?;
    load.notes = draft.notes;
    to_json(&load)
}

pub fn preview_settlement(request_json: &str) -> BindingResult<String> {
    let request: SettlementRequest = parse(request_json, "settlement")?;
    let mut draft = SettlementDraft::open(request.load, request.current_debt, request.order_status)?;
    draft.apply(&request.input)?;
    to_json(&SettlementPreview::from(&draft))
}

fn parse_status(status: &str) -> BindingResult<OrderStatus> {
    parse(&format!("\"{}\"", status.trim()), "order status")
}

/// Date from JavaScript `Date` parts; `month` is zero-based
fn calendar_date(year: i32, month: u32, day: u32) -> BindingResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month.saturating_add(1), day).ok_or_else(|| BindingError {
        code: "INVALID_DATE".to_string(),
        message: format!("Invalid clock date {}-{}-{}", year, month.saturating_add(1), day),
        message_es: "La fecha del navegador no es válida".to_string(),
        warning: false,
    })
}

// ============================================================================
// JavaScript exports
// ============================================================================

fn today() -> BindingResult<NaiveDate> {
    let now = js_sys::Date::new_0();
    calendar_date(now.get_full_year() as i32, now.get_month(), now.get_date())
}

/// Pending balance of an order item: `quantity - quantityDelivered`
#[wasm_bindgen]
pub fn pending_quantity(item_json: &str) -> Result<u32, JsValue> {
    pending_for_item(item_json).map_err(|e| e.to_js())
}

/// Validate a quantity field. Blank input is 0.
///
/// Quantities above the pending balance are also logged as a console warning.
#[wasm_bindgen]
pub fn validate_quantity_input(item_json: &str, input: &str) -> Result<u32, JsValue> {
    check_quantity_input(item_json, input).map_err(|e| {
        if e.warning {
            web_sys::console::warn_1(&JsValue::from_str(&e.message_es));
        }
        e.to_js()
    })
}

/// Build the daily-load creation request from a dispatch draft
#[wasm_bindgen]
pub fn build_daily_load(draft_json: &str) -> Result<String, JsValue> {
    today()
        .and_then(|date| build_load(draft_json, date))
        .map_err(|e| e.to_js())
}

/// Summary, payment flags and over-return warnings for a settlement
#[wasm_bindgen]
pub fn settlement_preview(request_json: &str) -> Result<String, JsValue> {
    preview_settlement(request_json).map_err(|e| e.to_js())
}

#[wasm_bindgen]
pub fn payment_is_overpaying(payment: &str, current_debt: &str) -> Result<bool, JsValue> {
    let check = || -> BindingResult<bool> {
        Ok(is_overpaying(parse_payment(payment)?, parse_debt(current_debt)?))
    };
    check().map_err(|e| e.to_js())
}

#[wasm_bindgen]
pub fn payment_is_underpaying_final(
    payment: &str,
    current_debt: &str,
    order_status: &str,
) -> Result<bool, JsValue> {
    let check = || -> BindingResult<bool> {
        Ok(is_underpaying_final(
            parse_payment(payment)?,
            parse_debt(current_debt)?,
            parse_status(order_status)?,
        ))
    };
    check().map_err(|e| e.to_js())
}
