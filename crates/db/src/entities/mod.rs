//! `SeaORM` entities for the firm catalog.

pub mod accounts;
pub mod firms;
pub mod promotions;
