//! Document-acquisition trait.

use async_trait::async_trait;

use crate::error::DocumentError;

/// Fetches a document's bytes and derives plain text from them.
///
/// Both failure modes are non-fatal per unit: the pipeline records them in
/// the unit's outcome and moves on.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, DocumentError>;
}
