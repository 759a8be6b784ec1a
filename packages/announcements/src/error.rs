//! Typed errors for the announcement pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match
//! on failure kinds instead of string contents.

use thiserror::Error;

/// Errors fetching the announcement listing page.
///
/// Always fatal to a run: without the listing there are no candidate units.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network-level failure (connect, timeout, TLS)
    #[error("listing request failed: {0}")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Non-2xx response from the listing endpoint
    #[error("listing returned HTTP {status}")]
    Status { status: u16 },
}

/// Errors acquiring a document's text.
///
/// Never fatal: captured into the unit's outcome and the run continues.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Fetching the document bytes failed
    #[error("{0}")]
    Request(String),

    /// Bytes fetched but text extraction failed
    #[error("{0}")]
    Extraction(String),
}

/// Errors from the summarization collaborator.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// The provider signalled a rate limit; eligible for one retry
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Any other provider failure; recorded, never retried
    #[error("{0}")]
    Api(String),
}

/// Errors persisting the ledger.
///
/// Fatal to the run's durability guarantee and surfaced distinctly, even
/// when every per-unit step succeeded.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to serialize ledger: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write ledger to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors rendering the report artifact. Reported, not fatal to the run.
#[derive(Debug, Error)]
#[error("report rendering failed: {0}")]
pub struct RenderError(pub String);

/// Errors delivering the notification. Reported, not fatal to the run.
#[derive(Debug, Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Top-level run failures. Everything recoverable is absorbed into
/// per-unit outcomes before it can reach this enum.
#[derive(Debug, Error)]
pub enum RunError {
    /// Listing fetch failed; no work could be derived
    #[error("source fetch failed: {0}")]
    Source(#[from] SourceError),

    /// Ledger write failed after processing
    #[error("ledger persist failed: {0}")]
    Ledger(#[from] LedgerError),
}

/// Result alias for pipeline operations.
pub type Result<T, E = RunError> = std::result::Result<T, E>;
