//! Report-rendering trait.

use std::path::Path;

use async_trait::async_trait;

use crate::error::RenderError;
use crate::types::ResultRecord;

/// Renders a record sequence into a paginated document at `path`.
///
/// Failure is reported in the run report but never aborts the run; the
/// ledger is already durable by the time rendering starts.
#[async_trait]
pub trait ReportRenderer: Send + Sync {
    async fn render(&self, records: &[ResultRecord], path: &Path) -> Result<(), RenderError>;
}
