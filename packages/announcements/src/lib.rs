//! Incremental announcement summarization pipeline.
//!
//! Ingests a disclosure listing page, pairs company links with document
//! links, summarizes each document that has not been seen before, and
//! keeps a durable ledger of processed documents so repeated runs are
//! incremental. Rendering and delivery of the resulting report happen
//! through narrow collaborator traits.
//!
//! # Design
//!
//! - The ledger's `pdf_url` uniqueness is enforced by never constructing a
//!   duplicate (incremental filter), not by deduplicating on read.
//! - Per-unit failures are captured as tagged outcomes, never raised: one
//!   bad document can't sink a batch.
//! - Execution is strictly sequential with fixed pacing; the collaborators
//!   are rate limited and the ordering doubles as the report order.
//!
//! # Modules
//!
//! - [`extract`] - company/document pairing from listing markup
//! - [`ledger`] - the durable processed-set ledger
//! - [`filter`] - incremental filtering against the ledger
//! - [`run`] - per-unit execution and report assembly
//! - [`traits`] - collaborator seams (source, document, summarizer,
//!   renderer, notifier)
//! - [`testing`] - mock collaborators for tests

pub mod config;
pub mod documents;
pub mod error;
pub mod extract;
pub mod filter;
pub mod ledger;
pub mod prompt;
pub mod run;
pub mod sample;
pub mod sources;
pub mod summarizer;
pub mod testing;
pub mod traits;
pub mod types;

pub use config::PipelineConfig;
pub use error::{
    DocumentError, LedgerError, NotifyError, RenderError, Result, RunError, SourceError,
    SummarizeError,
};
pub use extract::{collect_hrefs, company_name_from_url, extract_groups, ExtractedGroups};
pub use filter::filter_new;
pub use ledger::Ledger;
pub use traits::{DocumentFetcher, Notifier, ReportRenderer, SourceFetcher, Summarizer};
pub use run::{process_units, run_pipeline};
pub use sample::{sample_listing_html, SampleSource};
pub use types::{
    AnnouncementUnit, DeliveryStats, FailureKind, ProcessedUnit, ResultRecord, RunReport,
    SummaryOutcome,
};

// Real collaborator implementations
pub use documents::HttpDocumentFetcher;
pub use sources::HttpSource;
pub use summarizer::OpenAiSummarizer;
