//! Firm, account, and promotion records and their validated write inputs.

pub mod input;
pub mod types;
pub mod validation;

pub use input::{
    AccountInput, AccountPatch, FirmInput, FirmPatch, PromotionInput, PromotionPatch,
    matching_account,
};
pub use types::{Account, Firm, FirmRecord, Promotion};
pub use validation::{FieldError, ValidationFailure, validate_input};
