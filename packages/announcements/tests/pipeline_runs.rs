//! End-to-end pipeline runs against mock collaborators.
//!
//! These exercise the full flow: listing → pairing → incremental filter →
//! per-unit execution → ledger persist → report/notification handoff.

use std::fs;
use std::time::Duration;

use announcements::testing::{MockDocumentFetcher, MockNotifier, MockRenderer, MockSource};
use announcements::{
    run_pipeline, sample_listing_html, Ledger, PipelineConfig, SampleSource,
};

fn fast_config(dir: &tempfile::TempDir) -> PipelineConfig {
    PipelineConfig::new(
        "https://www.screener.in",
        dir.path().join("ledger.json").display().to_string(),
    )
    .with_report_path(dir.path().join("report.pdf").display().to_string())
    .with_inter_request_delay(Duration::from_millis(1))
    .with_rate_limit_cooldown(Duration::from_millis(1))
}

fn sample_documents() -> MockDocumentFetcher {
    let mut docs = MockDocumentFetcher::new();
    for unit in announcements::extract_groups(&announcements::collect_hrefs(
        sample_listing_html(),
    ))
    .pairs
    {
        docs = docs.with_text(unit.document_ref, "Quarterly results announcement text");
    }
    docs
}

#[tokio::test]
async fn test_sample_run_produces_records_for_all_pairs() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(&dir);
    let documents = sample_documents();
    let summarizer = announcements::testing::MockSummarizer::new();
    let renderer = MockRenderer::new();

    let report = run_pipeline(&config, &SampleSource, &documents, &summarizer, &renderer, None)
        .await
        .unwrap();

    assert_eq!(report.new_processed, 3);
    assert_eq!(report.new_failed, 0);
    assert_eq!(report.previously_processed, 0);
    assert_eq!(report.total_records, 3);
    assert_eq!(report.report_rendered, Some(true));
    assert!(report.notification.is_none());

    let companies: Vec<&str> = report
        .new_records
        .iter()
        .map(|r| r.company.as_str())
        .collect();
    assert_eq!(companies, vec!["MAHSCOOTER", "TCS", "LT"]);

    // Renderer got exactly the new subset
    let rendered = renderer.rendered();
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].0.len(), 3);
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(&dir);
    let documents = sample_documents();
    let summarizer = announcements::testing::MockSummarizer::new();

    let first = run_pipeline(
        &config,
        &SampleSource,
        &documents,
        &summarizer,
        &MockRenderer::new(),
        None,
    )
    .await
    .unwrap();
    assert_eq!(first.new_processed, 3);

    let ledger_bytes = fs::read(dir.path().join("ledger.json")).unwrap();

    let renderer = MockRenderer::new();
    let second = run_pipeline(&config, &SampleSource, &documents, &summarizer, &renderer, None)
        .await
        .unwrap();

    assert_eq!(second.new_processed, 0);
    assert_eq!(second.previously_processed, 3);
    assert_eq!(second.total_records, 3);
    // Report and notification skipped entirely
    assert_eq!(second.report_rendered, None);
    assert!(renderer.rendered().is_empty());
    // Persisted ledger content unchanged
    assert_eq!(fs::read(dir.path().join("ledger.json")).unwrap(), ledger_bytes);
}

#[tokio::test]
async fn test_exactly_one_record_per_unique_document_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(&dir);
    let documents = sample_documents();
    let summarizer = announcements::testing::MockSummarizer::new();

    for _ in 0..3 {
        run_pipeline(
            &config,
            &SampleSource,
            &documents,
            &summarizer,
            &MockRenderer::new(),
            None,
        )
        .await
        .unwrap();
    }

    let ledger = Ledger::load(dir.path().join("ledger.json"));
    assert_eq!(ledger.len(), 3);
    assert_eq!(ledger.identity_set().len(), 3);
}

#[tokio::test]
async fn test_test_mode_caps_batch_at_limit() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(&dir).with_test_mode(true).with_test_batch_limit(2);
    let documents = sample_documents();
    let summarizer = announcements::testing::MockSummarizer::new();

    let report = run_pipeline(
        &config,
        &SampleSource,
        &documents,
        &summarizer,
        &MockRenderer::new(),
        None,
    )
    .await
    .unwrap();

    assert_eq!(report.new_processed, 2);
}

#[tokio::test]
async fn test_failed_unit_is_recorded_and_batch_completes() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(&dir);

    let pairs =
        announcements::extract_groups(&announcements::collect_hrefs(sample_listing_html())).pairs;
    let documents = MockDocumentFetcher::new()
        .with_text(pairs[0].document_ref.clone(), "text one")
        .with_request_error(pairs[1].document_ref.clone(), "connection refused")
        .with_text(pairs[2].document_ref.clone(), "text three");
    let summarizer = announcements::testing::MockSummarizer::new();

    let report = run_pipeline(
        &config,
        &SampleSource,
        &documents,
        &summarizer,
        &MockRenderer::new(),
        None,
    )
    .await
    .unwrap();

    assert_eq!(report.new_processed, 3);
    assert_eq!(report.new_failed, 1);
    assert!(report.new_records[1].summary.contains("Request Error"));

    // The failed document is in the ledger, so it is never reattempted
    let second = run_pipeline(
        &config,
        &SampleSource,
        &documents,
        &summarizer,
        &MockRenderer::new(),
        None,
    )
    .await
    .unwrap();
    assert_eq!(second.new_processed, 0);
}

#[tokio::test]
async fn test_source_failure_aborts_before_any_work() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(&dir);
    let documents = MockDocumentFetcher::new();
    let summarizer = announcements::testing::MockSummarizer::new();

    let result = run_pipeline(
        &config,
        &MockSource::failing(),
        &documents,
        &summarizer,
        &MockRenderer::new(),
        None,
    )
    .await;

    assert!(result.is_err());
    assert!(documents.fetched().is_empty());
    assert!(!dir.path().join("ledger.json").exists());
}

#[tokio::test]
async fn test_render_failure_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(&dir);
    let documents = sample_documents();
    let summarizer = announcements::testing::MockSummarizer::new();

    let report = run_pipeline(
        &config,
        &SampleSource,
        &documents,
        &summarizer,
        &MockRenderer::failing(),
        None,
    )
    .await
    .unwrap();

    assert_eq!(report.new_processed, 3);
    assert_eq!(report.report_rendered, Some(false));
    // Ledger was persisted before rendering was attempted
    assert_eq!(Ledger::load(dir.path().join("ledger.json")).len(), 3);
}

#[tokio::test]
async fn test_notifier_invoked_with_report_path() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(&dir);
    let documents = sample_documents();
    let summarizer = announcements::testing::MockSummarizer::new();
    let notifier = MockNotifier::new();

    let report = run_pipeline(
        &config,
        &SampleSource,
        &documents,
        &summarizer,
        &MockRenderer::new(),
        Some(&notifier),
    )
    .await
    .unwrap();

    let stats = report.notification.expect("notification stats");
    assert_eq!(stats.sent, 1);
    assert_eq!(
        notifier.delivered(),
        vec![std::path::PathBuf::from(&config.report_path)]
    );
}

#[tokio::test]
async fn test_notify_failure_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(&dir);
    let documents = sample_documents();
    let summarizer = announcements::testing::MockSummarizer::new();

    let report = run_pipeline(
        &config,
        &SampleSource,
        &documents,
        &summarizer,
        &MockRenderer::new(),
        Some(&MockNotifier::failing()),
    )
    .await
    .unwrap();

    assert!(report.notification.is_none());
    assert!(report.notification_error.is_some());
    assert_eq!(report.new_processed, 3);
}
