//! Server configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;

use announcements::PipelineConfig;
use mailer::MailerOptions;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/139.0.0.0 Safari/537.36";

/// Application configuration loaded from environment variables.
///
/// The OpenAI key is optional at load time: the process endpoint validates
/// it per request so a misconfigured server still serves `/health` with a
/// useful answer.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_max_tokens: u32,
    pub openai_temperature: f32,
    pub max_text_length: usize,
    pub delay_between_requests: u64,
    pub summaries_file: String,
    pub report_file: String,
    pub source_base_url: String,
    pub source_announcements_url: String,
    pub source_cookie_header: Option<String>,
    pub user_agent: String,
    pub email: Option<EmailConfig>,
}

/// SMTP settings; present only when sender, password, and recipients are
/// all configured.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub sender: String,
    pub password: String,
    pub recipients: Vec<String>,
    pub subject_prefix: String,
    pub greeting: String,
    pub signature: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let source_base_url = env::var("SOURCE_BASE_URL")
            .unwrap_or_else(|_| "https://www.screener.in".to_string());
        let source_announcements_url = env::var("SOURCE_ANNOUNCEMENTS_URL")
            .unwrap_or_else(|_| format!("{source_base_url}/announcements/"));

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            openai_model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            openai_max_tokens: env::var("OPENAI_MAX_TOKENS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .context("OPENAI_MAX_TOKENS must be a valid number")?,
            openai_temperature: env::var("OPENAI_TEMPERATURE")
                .unwrap_or_else(|_| "0.3".to_string())
                .parse()
                .context("OPENAI_TEMPERATURE must be a valid number")?,
            max_text_length: env::var("MAX_TEXT_LENGTH")
                .unwrap_or_else(|_| "12000".to_string())
                .parse()
                .context("MAX_TEXT_LENGTH must be a valid number")?,
            delay_between_requests: env::var("DELAY_BETWEEN_REQUESTS")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .context("DELAY_BETWEEN_REQUESTS must be a valid number")?,
            summaries_file: env::var("SUMMARIES_FILE")
                .unwrap_or_else(|_| "announcement_summaries.json".to_string()),
            report_file: env::var("REPORT_FILE")
                .unwrap_or_else(|_| "New_Announcements_Report.pdf".to_string()),
            source_base_url,
            source_announcements_url,
            source_cookie_header: env::var("SOURCE_COOKIE_HEADER").ok().filter(|c| !c.is_empty()),
            user_agent: env::var("USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
            email: EmailConfig::from_env()?,
        })
    }

    /// Pipeline tunables derived from this configuration.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new(&self.source_base_url, &self.summaries_file)
            .with_report_path(&self.report_file)
            .with_max_text_chars(self.max_text_length)
            .with_inter_request_delay(Duration::from_secs(self.delay_between_requests))
    }
}

impl EmailConfig {
    fn from_env() -> Result<Option<Self>> {
        let sender = env::var("EMAIL_SENDER").ok().filter(|s| !s.is_empty());
        let password = env::var("EMAIL_PASSWORD").ok().filter(|p| !p.is_empty());
        let recipients: Vec<String> = env::var("EMAIL_RECIPIENTS")
            .unwrap_or_default()
            .split(',')
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();

        let (Some(sender), Some(password)) = (sender, password) else {
            return Ok(None);
        };
        if recipients.is_empty() {
            return Ok(None);
        }

        Ok(Some(Self {
            smtp_server: env::var("SMTP_SERVER").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .context("SMTP_PORT must be a valid number")?,
            sender,
            password,
            recipients,
            subject_prefix: env::var("EMAIL_SUBJECT_PREFIX")
                .unwrap_or_else(|_| "Corporate Announcements Report".to_string()),
            greeting: env::var("EMAIL_GREETING").unwrap_or_else(|_| "Dear User,".to_string()),
            signature: env::var("EMAIL_SIGNATURE")
                .unwrap_or_else(|_| "Best regards,\nFinwire".to_string()),
        }))
    }

    /// Mailer options for the notifier.
    pub fn mailer_options(&self) -> MailerOptions {
        MailerOptions::new(
            &self.smtp_server,
            self.smtp_port,
            &self.sender,
            &self.password,
            self.recipients.clone(),
        )
        .with_subject_prefix(&self.subject_prefix)
        .with_greeting(&self.greeting)
        .with_signature(&self.signature)
    }
}
