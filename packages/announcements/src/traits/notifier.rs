//! Notification trait.

use std::path::Path;

use async_trait::async_trait;

use crate::error::NotifyError;
use crate::types::DeliveryStats;

/// Delivers the rendered report to the configured recipients, one copy
/// each. Returns per-recipient counts; a connect-level failure is an
/// error, reported but not retried.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, report_path: &Path) -> Result<DeliveryStats, NotifyError>;
}
