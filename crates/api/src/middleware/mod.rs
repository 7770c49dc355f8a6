//! Request guards for the admin and sync routes.

pub mod admin;
pub mod signature;

pub use admin::admin_middleware;
pub use signature::signature_middleware;
