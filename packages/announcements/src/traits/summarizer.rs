//! Summarization trait.

use async_trait::async_trait;

use crate::error::SummarizeError;

/// Requests a natural-language summary of document text.
///
/// Implementations must surface rate limiting as
/// [`SummarizeError::RateLimited`] — it is the only failure kind the
/// pipeline retries (once, after a cooldown).
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str, company_name: &str) -> Result<String, SummarizeError>;

    /// Model identifier recorded with each result.
    fn model_id(&self) -> &str;
}
