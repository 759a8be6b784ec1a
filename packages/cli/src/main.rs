//! Command-line entry point for the announcement pipeline.

mod config;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;

use announcements::traits::{Notifier, ReportRenderer};
use announcements::{
    run_pipeline, HttpDocumentFetcher, HttpSource, Ledger, OpenAiSummarizer, RunReport,
    SampleSource, SourceFetcher,
};
use mailer::SmtpMailer;
use report::PdfReportRenderer;

use crate::config::CliConfig;

/// Process corporate disclosure announcements: extract new company/PDF
/// pairs from the listing page, summarize each document, and assemble a
/// report. Repeated runs are incremental.
#[derive(Debug, Parser)]
#[command(name = "announce", version)]
struct Cli {
    /// Process only the first 3 new documents
    #[arg(long)]
    test: bool,

    /// Use canned sample markup instead of fetching the listing
    #[arg(long)]
    sample: bool,

    /// Email the rendered report when new results exist
    #[arg(long)]
    notify: bool,

    /// Also render every ledger record to the full-report path
    #[arg(long)]
    full_report: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = CliConfig::from_env().context("Failed to load configuration")?;

    if cli.notify && config.email.is_none() {
        bail!(
            "--notify requires EMAIL_SENDER, EMAIL_PASSWORD, and EMAIL_RECIPIENTS to be configured"
        );
    }

    if cli.test {
        println!("{}", "Running in test scope (first 3 documents only)".yellow());
    }
    if cli.sample {
        println!("{}", "Using sample listing data (no source fetch)".yellow());
    }

    let pipeline_config = config.pipeline_config().with_test_mode(cli.test);

    let source: Box<dyn SourceFetcher> = if cli.sample {
        Box::new(SampleSource)
    } else {
        let mut source = HttpSource::new(&config.source_announcements_url, &config.user_agent);
        if let Some(cookie) = config.source_cookie_header.clone() {
            source = source.with_cookie_header(cookie);
        }
        Box::new(source)
    };

    let documents = HttpDocumentFetcher::new(&config.user_agent);
    let summarizer = OpenAiSummarizer::new(&config.openai_api_key, &config.openai_model)
        .with_max_tokens(config.openai_max_tokens)
        .with_temperature(config.openai_temperature);
    let renderer = PdfReportRenderer::default();

    let notifier = if cli.notify {
        config
            .email
            .as_ref()
            .map(|email| SmtpMailer::new(email.mailer_options()))
    } else {
        None
    };

    let run = run_pipeline(
        &pipeline_config,
        source.as_ref(),
        &documents,
        &summarizer,
        &renderer,
        notifier.as_ref().map(|n| n as &dyn Notifier),
    )
    .await
    .context("Pipeline run failed")?;

    print_summary(&run, &config);

    if cli.full_report {
        let ledger = Ledger::load(&config.summaries_file);
        renderer
            .render(
                ledger.records(),
                std::path::Path::new(&config.full_report_file),
            )
            .await
            .context("Full report rendering failed")?;
        println!(
            "{} {}",
            "Full report written to".green(),
            config.full_report_file.bold()
        );
    }

    Ok(())
}

fn print_summary(run: &RunReport, config: &CliConfig) {
    println!();
    println!("{}", "ANNOUNCEMENT RUN SUMMARY".bold());
    println!("{}", "-".repeat(50));
    println!("Total documents in ledger:  {}", run.total_records);
    println!("Previously processed:       {}", run.previously_processed);
    println!(
        "New documents processed:    {}",
        run.new_processed.to_string().bold()
    );
    println!(
        "Successfully summarized:    {}",
        run.new_succeeded().to_string().green()
    );
    if run.new_failed > 0 {
        println!(
            "Failed to process:          {}",
            run.new_failed.to_string().red()
        );
    }

    for record in &run.new_records {
        println!();
        println!("{} {}", ">".dimmed(), record.company.bold());
        println!("  {}", record.pdf_url.dimmed());
        let preview: String = record.summary.chars().take(200).collect();
        println!("  {preview}...");
    }

    println!();
    match run.report_rendered {
        Some(true) => println!(
            "{} {}",
            "Report written to".green(),
            config.report_file.bold()
        ),
        Some(false) => println!("{}", "Report rendering failed".red()),
        None => println!("{}", "No new announcements; report skipped".dimmed()),
    }

    if let Some(stats) = &run.notification {
        println!(
            "{}",
            format!("Emailed report: {} sent, {} failed", stats.sent, stats.failed).green()
        );
    } else if let Some(error) = &run.notification_error {
        println!("{}", format!("Email delivery failed: {error}").red());
    }
}
