//! The run pipeline: listing → pairs → filter → per-unit execution →
//! merge, persist, report.
//!
//! Execution is strictly sequential. The external collaborators are rate
//! limited, so sequencing plus a fixed inter-request delay is the
//! correctness mechanism here, not an optimization target.

use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::error::{DocumentError, Result, SummarizeError};
use crate::extract::{collect_hrefs, company_name_from_url, extract_groups};
use crate::filter::filter_new;
use crate::ledger::Ledger;
use crate::prompt::prepare_text;
use crate::traits::{DocumentFetcher, Notifier, ReportRenderer, SourceFetcher, Summarizer};
use crate::types::{
    AnnouncementUnit, FailureKind, ProcessedUnit, ResultRecord, RunReport, SummaryOutcome,
};

/// Absolutize a company href against the configured base URL.
fn absolutize(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}{}", base_url.trim_end_matches('/'), href)
    }
}

/// Request a summary with a bounded rate-limit retry: one cooldown pause,
/// one retry, never more.
async fn request_summary(
    summarizer: &dyn Summarizer,
    text: &str,
    company_name: &str,
    config: &PipelineConfig,
) -> SummaryOutcome {
    let mut attempts = 0;
    loop {
        match summarizer.summarize(text, company_name).await {
            Ok(summary) => return SummaryOutcome::Success(summary),
            Err(SummarizeError::RateLimited(_)) if attempts == 0 => {
                attempts += 1;
                warn!(
                    company = %company_name,
                    cooldown_secs = config.rate_limit_cooldown.as_secs(),
                    "Rate limited, pausing before single retry"
                );
                sleep(config.rate_limit_cooldown).await;
            }
            Err(SummarizeError::RateLimited(message)) => {
                return SummaryOutcome::Failure {
                    kind: FailureKind::RateLimited,
                    message,
                }
            }
            Err(SummarizeError::Api(message)) => {
                return SummaryOutcome::Failure {
                    kind: FailureKind::Api,
                    message,
                }
            }
        }
    }
}

/// Execute one unit. Never fails: every failure mode is captured in the
/// returned outcome.
async fn process_unit(
    unit: &AnnouncementUnit,
    config: &PipelineConfig,
    documents: &dyn DocumentFetcher,
    summarizer: &dyn Summarizer,
) -> ProcessedUnit {
    let company = company_name_from_url(&unit.company_ref);

    let (text_length, outcome) = match documents.fetch_text(&unit.document_ref).await {
        Ok(text) => {
            let prepared = prepare_text(&text, config.max_text_chars);
            let outcome = if prepared.is_empty() {
                SummaryOutcome::Failure {
                    kind: FailureKind::Extraction,
                    message: "document contained no extractable text".to_string(),
                }
            } else {
                request_summary(summarizer, &prepared, &company, config).await
            };
            (text.chars().count(), outcome)
        }
        Err(DocumentError::Request(message)) => (
            0,
            SummaryOutcome::Failure {
                kind: FailureKind::Request,
                message,
            },
        ),
        Err(DocumentError::Extraction(message)) => (
            0,
            SummaryOutcome::Failure {
                kind: FailureKind::Extraction,
                message,
            },
        ),
    };

    if let SummaryOutcome::Failure { kind, message } = &outcome {
        warn!(
            company = %company,
            document = %unit.document_ref,
            kind = ?kind,
            error = %message,
            "Unit failed, recording failure outcome"
        );
    }

    let record = ResultRecord {
        company,
        company_url: absolutize(&config.base_url, &unit.company_ref),
        pdf_url: unit.document_ref.clone(),
        summary: outcome.clone().into_summary_text(),
        text_length,
        model_used: summarizer.model_id().to_string(),
    };

    ProcessedUnit { record, outcome }
}

/// Execute units sequentially with failure isolation and inter-request
/// pacing. Always returns exactly one processed unit per input unit, in
/// input order.
pub async fn process_units(
    units: &[AnnouncementUnit],
    config: &PipelineConfig,
    documents: &dyn DocumentFetcher,
    summarizer: &dyn Summarizer,
) -> Vec<ProcessedUnit> {
    let mut processed = Vec::with_capacity(units.len());

    for (i, unit) in units.iter().enumerate() {
        info!(
            position = i + 1,
            total = units.len(),
            document = %unit.document_ref,
            "Processing announcement"
        );

        processed.push(process_unit(unit, config, documents, summarizer).await);

        if i + 1 < units.len() {
            sleep(config.inter_request_delay).await;
        }
    }

    processed
}

/// Run the whole pipeline once.
///
/// Fatal failures are only the listing fetch (nothing to do) and the
/// ledger persist (durability lost); everything per-unit is isolated.
/// Report rendering and notification happen after the ledger is durable
/// and report their outcomes through [`RunReport`] without failing the
/// run.
pub async fn run_pipeline(
    config: &PipelineConfig,
    source: &dyn SourceFetcher,
    documents: &dyn DocumentFetcher,
    summarizer: &dyn Summarizer,
    renderer: &dyn ReportRenderer,
    notifier: Option<&dyn Notifier>,
) -> Result<RunReport> {
    let listing = source.fetch_listing().await?;

    let hrefs = collect_hrefs(&listing);
    let groups = extract_groups(&hrefs);
    info!(
        direct = groups.direct.len(),
        pairs = groups.pairs.len(),
        "Extracted announcement groups"
    );

    let mut ledger = Ledger::load(&config.ledger_path);
    let previously_processed = ledger.len();

    let mut fresh = filter_new(groups.pairs, &ledger.identity_set());
    info!(new_units = fresh.len(), "Filtered against processed set");

    if config.test_mode && fresh.len() > config.test_batch_limit {
        info!(
            limit = config.test_batch_limit,
            "Test scope: capping batch"
        );
        fresh.truncate(config.test_batch_limit);
    }

    let processed = process_units(&fresh, config, documents, summarizer).await;

    let new_failed = processed.iter().filter(|p| !p.outcome.is_success()).count();
    let new_records: Vec<ResultRecord> = processed.into_iter().map(|p| p.record).collect();

    ledger.append(new_records.iter().cloned());
    ledger.persist()?;

    let mut report = RunReport {
        total_records: ledger.len(),
        previously_processed,
        new_processed: new_records.len(),
        new_failed,
        report_rendered: None,
        notification: None,
        notification_error: None,
        new_records,
    };

    if report.new_records.is_empty() {
        info!("No new announcements; skipping report and notification");
        return Ok(report);
    }

    let report_path = std::path::Path::new(&config.report_path);
    match renderer.render(&report.new_records, report_path).await {
        Ok(()) => {
            info!(path = %config.report_path, "Report rendered");
            report.report_rendered = Some(true);
        }
        Err(e) => {
            warn!(error = %e, "Report rendering failed");
            report.report_rendered = Some(false);
        }
    }

    if let Some(notifier) = notifier {
        if report.report_rendered == Some(true) {
            match notifier.deliver(report_path).await {
                Ok(stats) => {
                    info!(sent = stats.sent, failed = stats.failed, "Notification delivered");
                    report.notification = Some(stats);
                }
                Err(e) => {
                    warn!(error = %e, "Notification failed");
                    report.notification_error = Some(e.to_string());
                }
            }
        } else {
            warn!("Skipping notification: report artifact was not rendered");
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockDocumentFetcher, MockSummarizer};
    use std::time::Duration;

    fn unit(doc: &str) -> AnnouncementUnit {
        AnnouncementUnit::new("/company/ABC/", doc)
    }

    fn fast_config() -> PipelineConfig {
        PipelineConfig::default()
            .with_inter_request_delay(Duration::from_millis(10))
            .with_rate_limit_cooldown(Duration::from_secs(60))
    }

    #[tokio::test(start_paused = true)]
    async fn test_isolation_one_failure_does_not_abort_batch() {
        let documents = MockDocumentFetcher::new()
            .with_text("https://x/a.pdf", "text a")
            .with_request_error("https://x/b.pdf", "connection reset")
            .with_text("https://x/c.pdf", "text c");
        let summarizer = MockSummarizer::new();

        let units = vec![
            unit("https://x/a.pdf"),
            unit("https://x/b.pdf"),
            unit("https://x/c.pdf"),
        ];

        let processed =
            process_units(&units, &fast_config(), &documents, &summarizer).await;

        assert_eq!(processed.len(), 3);
        assert!(processed[0].outcome.is_success());
        assert!(matches!(
            processed[1].outcome,
            SummaryOutcome::Failure {
                kind: FailureKind::Request,
                ..
            }
        ));
        assert!(processed[2].outcome.is_success());
        assert_eq!(processed[1].record.pdf_url, "https://x/b.pdf");
        assert_eq!(processed[1].record.text_length, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_retried_exactly_once() {
        let documents = MockDocumentFetcher::new().with_text("https://x/a.pdf", "text");
        let summarizer = MockSummarizer::new().with_rate_limits(1);

        let processed = process_units(
            &[unit("https://x/a.pdf")],
            &fast_config(),
            &documents,
            &summarizer,
        )
        .await;

        assert!(processed[0].outcome.is_success());
        assert_eq!(summarizer.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_rate_limit_not_retried() {
        let documents = MockDocumentFetcher::new().with_text("https://x/a.pdf", "text");
        let summarizer = MockSummarizer::new().with_rate_limits(2);

        let processed = process_units(
            &[unit("https://x/a.pdf")],
            &fast_config(),
            &documents,
            &summarizer,
        )
        .await;

        assert!(matches!(
            processed[0].outcome,
            SummaryOutcome::Failure {
                kind: FailureKind::RateLimited,
                ..
            }
        ));
        assert_eq!(summarizer.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_extracted_text_skips_summarizer() {
        let documents = MockDocumentFetcher::new().with_text("https://x/a.pdf", "   \n\t ");
        let summarizer = MockSummarizer::new();

        let processed = process_units(
            &[unit("https://x/a.pdf")],
            &fast_config(),
            &documents,
            &summarizer,
        )
        .await;

        assert!(matches!(
            processed[0].outcome,
            SummaryOutcome::Failure {
                kind: FailureKind::Extraction,
                ..
            }
        ));
        assert_eq!(summarizer.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_preserved() {
        let documents = MockDocumentFetcher::new()
            .with_text("https://x/a.pdf", "a")
            .with_text("https://x/b.pdf", "b");
        let summarizer = MockSummarizer::new();

        let units = vec![unit("https://x/a.pdf"), unit("https://x/b.pdf")];
        let processed =
            process_units(&units, &fast_config(), &documents, &summarizer).await;

        let order: Vec<&str> = processed.iter().map(|p| p.record.pdf_url.as_str()).collect();
        assert_eq!(order, vec!["https://x/a.pdf", "https://x/b.pdf"]);
    }

    #[test]
    fn test_absolutize() {
        assert_eq!(
            absolutize("https://www.screener.in", "/company/TCS/"),
            "https://www.screener.in/company/TCS/"
        );
        assert_eq!(
            absolutize("https://www.screener.in/", "/company/TCS/"),
            "https://www.screener.in/company/TCS/"
        );
        assert_eq!(
            absolutize("https://www.screener.in", "https://other.example/x"),
            "https://other.example/x"
        );
    }
}
