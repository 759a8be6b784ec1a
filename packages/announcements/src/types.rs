//! Core data types for the announcement pipeline.

use serde::{Deserialize, Serialize};

/// A (company link, document link) pairing extracted from the listing page.
///
/// Transient: produced by extraction, consumed by the filter and the
/// execution pipeline, never persisted directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementUnit {
    /// Href containing the company path marker (`/company`)
    pub company_ref: String,

    /// Href matching the PDF suffix pattern
    pub document_ref: String,
}

impl AnnouncementUnit {
    pub fn new(company_ref: impl Into<String>, document_ref: impl Into<String>) -> Self {
        Self {
            company_ref: company_ref.into(),
            document_ref: document_ref.into(),
        }
    }
}

/// One processed document, as persisted in the ledger.
///
/// Created exactly once per unique `pdf_url` — a failed summarization is
/// still a record (the failure text becomes the summary), so the document
/// is never reattempted on later runs.
///
/// Field names match the on-disk ledger layout; do not rename without a
/// data migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Company name derived from the company href
    pub company: String,

    /// Absolute company page URL
    pub company_url: String,

    /// Absolute document URL (ledger identity; unique across records)
    pub pdf_url: String,

    /// Summary text, or a typed error description for failed units
    pub summary: String,

    /// Length of the extracted document text in characters
    pub text_length: usize,

    /// Model identifier the summary was requested from
    pub model_used: String,
}

/// How a unit's summarization failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Document fetch failed (network / HTTP status)
    Request,

    /// Document bytes could not be turned into text
    Extraction,

    /// Summarization provider failed for a non-rate-limit reason
    Api,

    /// Rate limit persisted through the single allowed retry
    RateLimited,
}

/// Tagged per-unit outcome. Presentation classifies by this tag, never by
/// re-parsing the summary string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    Success(String),
    Failure { kind: FailureKind, message: String },
}

impl SummaryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SummaryOutcome::Success(_))
    }

    /// Render the outcome into the string persisted as the record's
    /// summary. Failure prefixes mirror the historical ledger format so
    /// existing ledgers stay diffable against new ones.
    pub fn into_summary_text(self) -> String {
        match self {
            SummaryOutcome::Success(text) => text,
            SummaryOutcome::Failure { kind, message } => match kind {
                FailureKind::Request => {
                    format!("No extractable text from PDF. Error: Request Error: {message}")
                }
                FailureKind::Extraction => {
                    format!("No extractable text from PDF. Error: Processing Error: {message}")
                }
                FailureKind::Api => format!("OpenAI API Error: {message}"),
                FailureKind::RateLimited => {
                    format!("OpenAI API Error: rate limited after retry: {message}")
                }
            },
        }
    }
}

/// A unit after execution: the record to persist plus the tagged outcome
/// used for run-report classification.
#[derive(Debug, Clone)]
pub struct ProcessedUnit {
    pub record: ResultRecord,
    pub outcome: SummaryOutcome,
}

/// Per-recipient delivery counts from the notification collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeliveryStats {
    pub sent: usize,
    pub failed: usize,
}

/// Final status of a run.
///
/// Report rendering and notification succeed or fail independently of the
/// core pipeline, so each carries its own field.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Records in the merged ledger after this run
    pub total_records: usize,

    /// Records loaded from the ledger at run start
    pub previously_processed: usize,

    /// New records produced by this run
    pub new_processed: usize,

    /// Of the new records, how many carry a failure outcome
    pub new_failed: usize,

    /// `Some(true)` rendered, `Some(false)` failed, `None` skipped
    pub report_rendered: Option<bool>,

    /// Delivery stats when notification ran; `None` when skipped or failed
    pub notification: Option<DeliveryStats>,

    /// Connect-level notification failure, when one occurred
    pub notification_error: Option<String>,

    /// The records produced by this run, in processing order
    pub new_records: Vec<ResultRecord>,
}

impl RunReport {
    /// Successfully summarized new records.
    pub fn new_succeeded(&self) -> usize {
        self.new_processed - self.new_failed
    }
}
