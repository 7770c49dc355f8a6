//! Discount and price derivation.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::catalog::Account;

/// Applies a percentage discount to `base_price`.
///
/// `current_price = round2(base_price * (1 - discount_pct / 100))`. The discount is
/// clamped to `0..=100`, so the result never exceeds the base price nor drops below zero.
/// Without a discount the base price is returned untouched.
#[must_use]
pub fn discounted_price(base_price: Decimal, discount_pct: Decimal) -> Decimal {
    let pct = discount_pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    if pct.is_zero() {
        return base_price;
    }

    (base_price * (Decimal::ONE_HUNDRED - pct) / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Prices every account with the same firm-wide discount, preserving order.
#[must_use]
pub fn price_accounts(accounts: &[Account], discount_pct: Decimal) -> Vec<Decimal> {
    accounts
        .iter()
        .map(|a| discounted_price(a.base_price, discount_pct))
        .collect()
}

/// Picks the account whose price represents the firm.
///
/// With a size filter it is the account of that size; otherwise the first account.
/// `None` when the firm has no (matching) account, meaning no pricing is available.
#[must_use]
pub fn primary_account_index(accounts: &[Account], account_size: Option<i32>) -> Option<usize> {
    match account_size {
        Some(size) => accounts.iter().position(|a| a.size_usd == size),
        None if accounts.is_empty() => None,
        None => Some(0),
    }
}
