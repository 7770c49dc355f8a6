//! Conjunctive firm filtering.
//!
//! A [`FirmFilter`] is an explicit, ordered list of predicates. A firm passes when every
//! predicate matches; an unsupplied query parameter contributes no predicate.

use rust_decimal::Decimal;

use super::types::{ListingQuery, PricedFirm};

/// One condition a listed firm must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirmPredicate {
    /// The firm is not soft-deleted. Always applied first.
    Active,
    /// At least one account has exactly this size.
    AccountSize(i32),
    /// The platform list contains this exact, case-sensitive name.
    Platform(String),
    /// The first payout comes within this many days. Firms without a value fail.
    MaxPayoutDays(i32),
    /// The current discount is at least this percentage.
    MinDiscount(Decimal),
}

impl FirmPredicate {
    /// Returns true if `firm` satisfies this predicate.
    #[must_use]
    pub fn matches(&self, firm: &PricedFirm) -> bool {
        let record = &firm.record;
        match self {
            Self::Active => record.firm.active,
            Self::AccountSize(size) => record.accounts.iter().any(|a| a.size_usd == *size),
            Self::Platform(platform) => record.firm.platforms.iter().any(|p| p == platform),
            Self::MaxPayoutDays(max) => record
                .firm
                .earliest_payout_days
                .is_some_and(|days| days <= *max),
            Self::MinDiscount(min) => firm.current_discount >= *min,
        }
    }
}

/// An ordered conjunction of [`FirmPredicate`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmFilter {
    predicates: Vec<FirmPredicate>,
}

impl Default for FirmFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl FirmFilter {
    /// Creates a filter that only drops inactive firms.
    #[must_use]
    pub fn new() -> Self {
        Self {
            predicates: vec![FirmPredicate::Active],
        }
    }

    /// Appends a predicate.
    #[must_use]
    pub fn with(mut self, predicate: FirmPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Builds the filter for a listing request.
    #[must_use]
    pub fn from_query(query: &ListingQuery) -> Self {
        let mut filter = Self::new();
        if let Some(size) = query.account_size {
            filter = filter.with(FirmPredicate::AccountSize(size));
        }
        if let Some(platform) = &query.platform {
            filter = filter.with(FirmPredicate::Platform(platform.clone()));
        }
        if let Some(days) = query.max_payout_days {
            filter = filter.with(FirmPredicate::MaxPayoutDays(days));
        }
        if let Some(min) = query.min_discount {
            filter = filter.with(FirmPredicate::MinDiscount(min));
        }
        filter
    }

    /// The predicates in evaluation order.
    #[must_use]
    pub fn predicates(&self) -> &[FirmPredicate] {
        &self.predicates
    }

    /// Returns true if `firm` satisfies every predicate.
    #[must_use]
    pub fn matches(&self, firm: &PricedFirm) -> bool {
        self.predicates.iter().all(|p| p.matches(firm))
    }

    /// Keeps the firms that satisfy every predicate, preserving order.
    #[must_use]
    pub fn apply(&self, firms: Vec<PricedFirm>) -> Vec<PricedFirm> {
        firms.into_iter().filter(|f| self.matches(f)).collect()
    }
}
