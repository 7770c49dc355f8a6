//! The firm listing pipeline.
//!
//! Turns stored firm, account, and promotion rows into the listing, detail, and
//! promotions-feed views. Every function here is pure: the caller supplies the rows and
//! the reference time.

pub mod filter;
pub mod pricing;
pub mod promotion;
pub mod service;
pub mod sort;
pub mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use filter::{FirmFilter, FirmPredicate};
pub use pricing::{discounted_price, price_accounts, primary_account_index};
pub use promotion::{active_promotions, is_currently_active, select_best};
pub use service::ListingService;
pub use sort::{SortKey, sort_firms};
pub use types::{
    ActivePromotion, FirmDetail, FirmListItem, FirmRef, FirmView, ListingQuery, PricedAccount,
    PricedFirm, PromotionView,
};
