//! Pipeline configuration.
//!
//! Constructed once by the entry point and passed by value into the
//! pipeline; the library never reads environment state itself.

use std::time::Duration;

/// Tunables for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Base URL company hrefs are absolutized against
    pub base_url: String,

    /// Ledger file path
    pub ledger_path: String,

    /// Where the new-results report artifact is written
    pub report_path: String,

    /// Character budget for text sent to the summarizer
    pub max_text_chars: usize,

    /// Pause between units (not after the last)
    pub inter_request_delay: Duration,

    /// Pause before the single rate-limit retry
    pub rate_limit_cooldown: Duration,

    /// Batch cap applied in test scope
    pub test_batch_limit: usize,

    /// Cap the filtered batch at `test_batch_limit`
    pub test_mode: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.screener.in".to_string(),
            ledger_path: "announcement_summaries.json".to_string(),
            report_path: "New_Announcements_Report.pdf".to_string(),
            max_text_chars: 12_000,
            inter_request_delay: Duration::from_secs(2),
            rate_limit_cooldown: Duration::from_secs(60),
            test_batch_limit: 3,
            test_mode: false,
        }
    }
}

impl PipelineConfig {
    pub fn new(base_url: impl Into<String>, ledger_path: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ledger_path: ledger_path.into(),
            ..Default::default()
        }
    }

    pub fn with_report_path(mut self, path: impl Into<String>) -> Self {
        self.report_path = path.into();
        self
    }

    pub fn with_max_text_chars(mut self, chars: usize) -> Self {
        self.max_text_chars = chars;
        self
    }

    pub fn with_inter_request_delay(mut self, delay: Duration) -> Self {
        self.inter_request_delay = delay;
        self
    }

    pub fn with_rate_limit_cooldown(mut self, cooldown: Duration) -> Self {
        self.rate_limit_cooldown = cooldown;
        self
    }

    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    pub fn with_test_batch_limit(mut self, limit: usize) -> Self {
        self.test_batch_limit = limit;
        self
    }
}
