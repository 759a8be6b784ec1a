//! Listing-source trait.

use async_trait::async_trait;

use crate::error::SourceError;

/// Fetches the announcement listing markup.
///
/// Failure here is fatal to a run: no candidate units can be derived.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch_listing(&self) -> Result<String, SourceError>;
}
