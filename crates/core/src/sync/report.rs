//! Outcome of one bulk sync request.

use std::fmt::Display;

use serde::Serialize;

/// `{ success, errors }` summary returned by the sync endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Number of items written.
    pub success: usize,
    /// One message per rejected item, in input order.
    pub errors: Vec<String>,
}

impl SyncReport {
    /// Counts one written item.
    pub fn record_success(&mut self) {
        self.success += 1;
    }

    /// Records a rejected firm item.
    pub fn record_firm_failure(&mut self, slug: &str, reason: impl Display) {
        self.errors.push(format!("Failed to sync firm {slug}: {reason}"));
    }

    /// Records a rejected promotion item.
    pub fn record_promotion_failure(&mut self, title: &str, reason: impl Display) {
        self.errors
            .push(format!("Failed to sync promotion {title}: {reason}"));
    }
}
