//! Promotion window evaluation.
//!
//! A promotion is current when its administrative switch is on, its start (if any) has
//! passed, and its end has not: `active && starts_at <= now && now <= ends_at`.
//! Expiry is computed on every read; rows are never mutated when a window closes.

use chrono::{DateTime, Utc};

use crate::catalog::Promotion;

/// Returns true if `promotion` counts at `now`. Both window bounds are inclusive.
#[must_use]
pub fn is_currently_active(promotion: &Promotion, now: DateTime<Utc>) -> bool {
    promotion.active
        && promotion.starts_at.is_none_or(|starts_at| starts_at <= now)
        && promotion.ends_at >= now
}

/// Returns the promotions that count at `now`, best first.
///
/// Ranking: highest `discount_pct`, then the one ending soonest, then input order.
#[must_use]
pub fn active_promotions(promotions: &[Promotion], now: DateTime<Utc>) -> Vec<&Promotion> {
    let mut active: Vec<&Promotion> = promotions
        .iter()
        .filter(|p| is_currently_active(p, now))
        .collect();

    active.sort_by(|a, b| {
        b.discount_pct
            .cmp(&a.discount_pct)
            .then_with(|| a.ends_at.cmp(&b.ends_at))
    });

    active
}

/// Returns the single promotion that prices the firm at `now`.
#[must_use]
pub fn select_best(promotions: &[Promotion], now: DateTime<Utc>) -> Option<&Promotion> {
    active_promotions(promotions, now).into_iter().next()
}
