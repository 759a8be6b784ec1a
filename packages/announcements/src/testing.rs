//! Testing utilities including mock implementations.
//!
//! Useful for exercising the pipeline without network access or a live
//! summarization provider.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;

use crate::error::{DocumentError, NotifyError, RenderError, SourceError, SummarizeError};
use crate::traits::{DocumentFetcher, Notifier, ReportRenderer, SourceFetcher, Summarizer};
use crate::types::{DeliveryStats, ResultRecord};

/// A source that serves a fixed listing string.
#[derive(Default)]
pub struct MockSource {
    listing: String,
    fail: bool,
}

impl MockSource {
    pub fn new(listing: impl Into<String>) -> Self {
        Self {
            listing: listing.into(),
            fail: false,
        }
    }

    /// Fail every fetch with a status error.
    pub fn failing() -> Self {
        Self {
            listing: String::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl SourceFetcher for MockSource {
    async fn fetch_listing(&self) -> Result<String, SourceError> {
        if self.fail {
            return Err(SourceError::Status { status: 503 });
        }
        Ok(self.listing.clone())
    }
}

/// Per-URL behavior for [`MockDocumentFetcher`].
#[derive(Debug, Clone)]
enum DocumentBehavior {
    Text(String),
    RequestError(String),
    ExtractionError(String),
}

/// A document fetcher with predefined per-URL responses.
///
/// Unknown URLs fail with a request error so tests notice unexpected
/// fetches.
#[derive(Default)]
pub struct MockDocumentFetcher {
    behaviors: RwLock<HashMap<String, DocumentBehavior>>,
    fetched: Mutex<Vec<String>>,
}

impl MockDocumentFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(self, url: impl Into<String>, text: impl Into<String>) -> Self {
        self.behaviors
            .write()
            .unwrap()
            .insert(url.into(), DocumentBehavior::Text(text.into()));
        self
    }

    pub fn with_request_error(self, url: impl Into<String>, message: impl Into<String>) -> Self {
        self.behaviors
            .write()
            .unwrap()
            .insert(url.into(), DocumentBehavior::RequestError(message.into()));
        self
    }

    pub fn with_extraction_error(self, url: impl Into<String>, message: impl Into<String>) -> Self {
        self.behaviors
            .write()
            .unwrap()
            .insert(url.into(), DocumentBehavior::ExtractionError(message.into()));
        self
    }

    /// URLs fetched so far, in order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentFetcher for MockDocumentFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, DocumentError> {
        self.fetched.lock().unwrap().push(url.to_string());

        let behavior = self.behaviors.read().unwrap().get(url).cloned();
        match behavior {
            Some(DocumentBehavior::Text(text)) => Ok(text),
            Some(DocumentBehavior::RequestError(m)) => Err(DocumentError::Request(m)),
            Some(DocumentBehavior::ExtractionError(m)) => Err(DocumentError::Extraction(m)),
            None => Err(DocumentError::Request(format!("no mock for {url}"))),
        }
    }
}

/// A summarizer returning deterministic summaries, optionally signalling
/// rate limits for the first N calls.
pub struct MockSummarizer {
    model: String,
    rate_limits_remaining: AtomicUsize,
    fail_all: bool,
    calls: Mutex<Vec<String>>,
}

impl Default for MockSummarizer {
    fn default() -> Self {
        Self {
            model: "mock-model".to_string(),
            rate_limits_remaining: AtomicUsize::new(0),
            fail_all: false,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first `n` calls fail with the rate-limit kind.
    pub fn with_rate_limits(self, n: usize) -> Self {
        self.rate_limits_remaining.store(n, Ordering::SeqCst);
        self
    }

    /// Every call fails with a non-retryable API error.
    pub fn failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Company names summarized so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, _text: &str, company_name: &str) -> Result<String, SummarizeError> {
        self.calls.lock().unwrap().push(company_name.to_string());

        if self.fail_all {
            return Err(SummarizeError::Api("mock API failure".to_string()));
        }

        let remaining = self.rate_limits_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.rate_limits_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(SummarizeError::RateLimited("mock rate limit".to_string()));
        }

        Ok(format!("Summary for {company_name}"))
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

/// A renderer that records what it was asked to render.
#[derive(Default)]
pub struct MockRenderer {
    fail: bool,
    rendered: Arc<Mutex<Vec<(Vec<ResultRecord>, PathBuf)>>>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn rendered(&self) -> Vec<(Vec<ResultRecord>, PathBuf)> {
        self.rendered.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportRenderer for MockRenderer {
    async fn render(&self, records: &[ResultRecord], path: &Path) -> Result<(), RenderError> {
        if self.fail {
            return Err(RenderError("mock render failure".to_string()));
        }
        self.rendered
            .lock()
            .unwrap()
            .push((records.to_vec(), path.to_path_buf()));
        Ok(())
    }
}

/// A notifier that records deliveries.
#[derive(Default)]
pub struct MockNotifier {
    fail: bool,
    stats: Option<DeliveryStats>,
    delivered: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn with_stats(mut self, stats: DeliveryStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn delivered(&self) -> Vec<PathBuf> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn deliver(&self, report_path: &Path) -> Result<DeliveryStats, NotifyError> {
        if self.fail {
            return Err(NotifyError("mock connect failure".to_string()));
        }
        self.delivered.lock().unwrap().push(report_path.to_path_buf());
        Ok(self.stats.unwrap_or(DeliveryStats { sent: 1, failed: 0 }))
    }
}
