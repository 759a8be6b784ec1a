//! SMTP delivery of announcement reports.
//!
//! Sends one message per recipient so no recipient ever sees another's
//! address. Per-recipient failures are counted, not raised; only a
//! connect-level failure aborts delivery.

use std::path::Path;

use async_trait::async_trait;
use chrono::Local;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

use announcements::error::NotifyError;
use announcements::traits::Notifier;
use announcements::types::DeliveryStats;

/// SMTP connection and message configuration.
#[derive(Debug, Clone)]
pub struct MailerOptions {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub sender: String,
    pub password: String,
    pub recipients: Vec<String>,
    pub subject_prefix: String,
    pub greeting: String,
    pub signature: String,
}

impl MailerOptions {
    pub fn new(
        smtp_server: impl Into<String>,
        smtp_port: u16,
        sender: impl Into<String>,
        password: impl Into<String>,
        recipients: Vec<String>,
    ) -> Self {
        Self {
            smtp_server: smtp_server.into(),
            smtp_port,
            sender: sender.into(),
            password: password.into(),
            recipients,
            subject_prefix: "Corporate Announcements Report".to_string(),
            greeting: "Dear User,".to_string(),
            signature: "Best regards,\nFinwire".to_string(),
        }
    }

    pub fn with_subject_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.subject_prefix = prefix.into();
        self
    }

    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }
}

/// Delivers the rendered report over SMTP, one message per recipient.
pub struct SmtpMailer {
    options: MailerOptions,
}

impl SmtpMailer {
    pub fn new(options: MailerOptions) -> Self {
        Self { options }
    }

    fn body(&self, generated_at: &str) -> String {
        format!(
            "{greeting}\n\n\
             Please find attached the latest Corporate Announcements Report generated on {generated_at}.\n\n\
             This report contains:\n\
             - Summaries of each new company announcement\n\
             - Sentiment assessment with rationale\n\
             - Key dates, financial highlights, and corporate actions\n\n\
             {signature}\n",
            greeting = self.options.greeting,
            signature = self.options.signature,
        )
    }

    fn build_message(
        &self,
        recipient: &str,
        sender: &Mailbox,
        subject: &str,
        body: &str,
        attachment_name: &str,
        pdf_bytes: Vec<u8>,
    ) -> Result<Message, NotifyError> {
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| NotifyError(format!("invalid recipient '{recipient}': {e}")))?;

        let pdf_type = ContentType::parse("application/pdf")
            .map_err(|e| NotifyError(format!("attachment content type: {e}")))?;

        Message::builder()
            .from(sender.clone())
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body.to_string()))
                    .singlepart(
                        Attachment::new(attachment_name.to_string()).body(pdf_bytes, pdf_type),
                    ),
            )
            .map_err(|e| NotifyError(format!("building message: {e}")))
    }
}

#[async_trait]
impl Notifier for SmtpMailer {
    async fn deliver(&self, report_path: &Path) -> Result<DeliveryStats, NotifyError> {
        let pdf_bytes = tokio::fs::read(report_path)
            .await
            .map_err(|e| NotifyError(format!("reading report {}: {e}", report_path.display())))?;

        let attachment_name = report_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report.pdf".to_string());

        let sender: Mailbox = self
            .options
            .sender
            .parse()
            .map_err(|e| NotifyError(format!("invalid sender address: {e}")))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.options.smtp_server)
            .map_err(|e| NotifyError(format!("SMTP relay setup: {e}")))?
            .port(self.options.smtp_port)
            .credentials(Credentials::new(
                self.options.sender.clone(),
                self.options.password.clone(),
            ))
            .build();

        // Surface a connect-level failure before attempting any recipient.
        match transport.test_connection().await {
            Ok(true) => {}
            Ok(false) => return Err(NotifyError("SMTP server rejected the connection".into())),
            Err(e) => return Err(NotifyError(format!("SMTP connection failed: {e}"))),
        }

        let generated_at = Local::now().format("%Y-%m-%d %H:%M").to_string();
        let subject = format!("{} - {}", self.options.subject_prefix, generated_at);
        let body = self.body(&generated_at);

        let mut stats = DeliveryStats { sent: 0, failed: 0 };

        for recipient in &self.options.recipients {
            let message = match self.build_message(
                recipient,
                &sender,
                &subject,
                &body,
                &attachment_name,
                pdf_bytes.clone(),
            ) {
                Ok(message) => message,
                Err(e) => {
                    warn!(recipient = %recipient, error = %e, "Skipping recipient");
                    stats.failed += 1;
                    continue;
                }
            };

            match transport.send(message).await {
                Ok(_) => {
                    info!(recipient = %recipient, "Report email sent");
                    stats.sent += 1;
                }
                Err(e) => {
                    warn!(recipient = %recipient, error = %e, "Failed to send report email");
                    stats.failed += 1;
                }
            }
        }

        info!(
            sent = stats.sent,
            failed = stats.failed,
            total = self.options.recipients.len(),
            "Report delivery finished"
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> MailerOptions {
        MailerOptions::new(
            "smtp.example.com",
            587,
            "sender@example.com",
            "app-password",
            vec!["a@example.com".to_string(), "b@example.com".to_string()],
        )
    }

    #[test]
    fn test_body_carries_greeting_and_signature() {
        let mailer = SmtpMailer::new(
            options()
                .with_greeting("Hello Team,")
                .with_signature("Regards,\nOps"),
        );

        let body = mailer.body("2026-01-01 09:00");
        assert!(body.starts_with("Hello Team,"));
        assert!(body.contains("2026-01-01 09:00"));
        assert!(body.ends_with("Regards,\nOps\n"));
    }

    #[test]
    fn test_build_message_rejects_invalid_recipient() {
        let mailer = SmtpMailer::new(options());
        let sender: Mailbox = "sender@example.com".parse().unwrap();

        let result = mailer.build_message(
            "not-an-address",
            &sender,
            "subject",
            "body",
            "report.pdf",
            vec![1, 2, 3],
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_build_message_attaches_pdf() {
        let mailer = SmtpMailer::new(options());
        let sender: Mailbox = "sender@example.com".parse().unwrap();

        let message = mailer
            .build_message(
                "a@example.com",
                &sender,
                "subject",
                "body",
                "report.pdf",
                b"%PDF-1.4".to_vec(),
            )
            .unwrap();

        let formatted = String::from_utf8_lossy(&message.formatted()).into_owned();
        assert!(formatted.contains("application/pdf"));
        assert!(formatted.contains("report.pdf"));
    }
}
