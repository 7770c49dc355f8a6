//! Listing sort keys and comparators.

use std::cmp::Ordering;

use super::types::PricedFirm;

/// Ordering requested by the `sort` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Highest current discount first.
    #[default]
    DiscountDesc,
    /// Cheapest primary account first.
    PriceAsc,
    /// Most expensive primary account first.
    PriceDesc,
    /// Fastest first payout first; unknown payout delays last.
    PayoutAsc,
    /// Best rated first; unrated last.
    RatingDesc,
    /// Alphabetical.
    Name,
}

impl SortKey {
    /// Resolves the `sort` parameter: absent means [`SortKey::DiscountDesc`], anything
    /// unrecognised means [`SortKey::Name`].
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            None => Self::default(),
            Some(value) => value.parse().unwrap_or(Self::Name),
        }
    }

    /// Returns the query parameter spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DiscountDesc => "discount_desc",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::PayoutAsc => "payout_asc",
            Self::RatingDesc => "rating_desc",
            Self::Name => "name",
        }
    }

    /// Total order on priced firms: the primary comparator, then name, then slug.
    #[must_use]
    pub fn compare(self, a: &PricedFirm, b: &PricedFirm) -> Ordering {
        let primary = match self {
            Self::DiscountDesc => b.current_discount.cmp(&a.current_discount),
            Self::PriceAsc => nulls_last(a.primary_base_price(), b.primary_base_price(), Ord::cmp),
            Self::PriceDesc => nulls_last(a.primary_base_price(), b.primary_base_price(), |x, y| {
                y.cmp(x)
            }),
            Self::PayoutAsc => nulls_last(
                a.record.firm.earliest_payout_days,
                b.record.firm.earliest_payout_days,
                Ord::cmp,
            ),
            Self::RatingDesc => nulls_last(a.record.firm.rating, b.record.firm.rating, |x, y| {
                y.cmp(x)
            }),
            Self::Name => Ordering::Equal,
        };

        primary
            .then_with(|| a.record.firm.name.cmp(&b.record.firm.name))
            .then_with(|| a.record.firm.slug.cmp(&b.record.firm.slug))
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discount_desc" => Ok(Self::DiscountDesc),
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "payout_asc" => Ok(Self::PayoutAsc),
            "rating_desc" => Ok(Self::RatingDesc),
            "name" => Ok(Self::Name),
            _ => Err(format!("Unknown sort key: {s}")),
        }
    }
}

fn nulls_last<T>(a: Option<T>, b: Option<T>, order: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => order(&x, &y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Returns `firms` ordered by `key`. The input is consumed, never reordered in place
/// behind the caller's back.
#[must_use]
pub fn sort_firms(mut firms: Vec<PricedFirm>, key: SortKey) -> Vec<PricedFirm> {
    firms.sort_by(|a, b| key.compare(a, b));
    firms
}
