//! Common types used across the platform

use rust_decimal::{Decimal, RoundingStrategy};

/// Money is kept in the base currency with cent precision
pub const MONEY_SCALE: u32 = 2;

/// Round an amount to cents, half away from zero
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// True when the amount carries no more precision than cents
pub fn has_money_scale(amount: Decimal) -> bool {
    amount.normalize().scale() <= MONEY_SCALE
}
