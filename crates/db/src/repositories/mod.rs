//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod firm;
pub mod promotion;
pub mod sync;

pub use account::{AccountError, AccountRepository};
pub use firm::{FirmError, FirmRepository};
pub use promotion::{PromotionError, PromotionRepository};
pub use sync::{SyncItemError, SyncRepository};
