//! Core business logic for PropFirmMentor.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! The listing pipeline turns stored firm, account, and promotion rows into the
//! priced, filtered, sorted view models served by the public API.
//!
//! # Modules
//!
//! - `catalog` - Firm, account, and promotion records plus validated write inputs
//! - `listing` - Promotion windows, pricing, filtering, sorting, and assembly
//! - `locale` - Supported locales and English fallback
//! - `seo` - Page metadata derived from listing and detail results
//! - `sync` - Bulk sync signatures and per-item reports

pub mod catalog;
pub mod listing;
pub mod locale;
pub mod seo;
pub mod sync;
