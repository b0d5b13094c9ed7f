//! Fixed-point money helpers shared by the split resolver and the netting engine.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Amounts at rest carry two fractional digits.
pub const MONEY_SCALE: u32 = 2;

/// Allowed drift between caller-supplied shares (or percentages) and their target.
pub const SPLIT_TOLERANCE: Decimal = dec!(0.02);

/// Positions within this distance of zero count as settled.
pub const NETTING_EPSILON: Decimal = dec!(0.005);

pub const MAX_EXPENSE_AMOUNT: Decimal = dec!(1000000);

pub const FULL_PERCENTAGE: Decimal = dec!(100);

/// Rounds to two decimal places, midpoint away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// `true` when `a` and `b` differ by no more than `tolerance`.
pub fn within(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    (a - b).abs() <= tolerance
}

/// `true` when the amount needs more than two fractional digits.
pub fn exceeds_scale(amount: Decimal) -> bool {
    amount.normalize().scale() > MONEY_SCALE
}
