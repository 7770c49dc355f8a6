//! Shared types, errors, and configuration for PropFirmMentor.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for firms, accounts, and promotions
//! - Limit/offset pagination for list endpoints
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AdminConfig, AppConfig, CacheConfig, SyncConfig};
pub use error::{AppError, AppResult};
