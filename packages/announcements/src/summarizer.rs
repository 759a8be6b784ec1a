//! OpenAI-backed summarizer.

use std::time::Duration;

use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient, OpenAIError};

use crate::error::SummarizeError;
use crate::prompt::{format_summary_prompt, SUMMARY_SYSTEM_PROMPT};
use crate::traits::Summarizer;

/// Summarizes document text through the OpenAI chat completions API.
///
/// The client is constructed once by the entry point and passed in;
/// generation parameters ride along so the pipeline itself stays free of
/// provider specifics.
pub struct OpenAiSummarizer {
    client: OpenAIClient,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiSummarizer {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: OpenAIClient::new(api_key).with_timeout(Duration::from_secs(30)),
            model: model.into(),
            max_tokens: 1000,
            temperature: 0.3,
        }
    }

    /// Wrap an already-configured client.
    pub fn with_client(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            max_tokens: 1000,
            temperature: 0.3,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, text: &str, company_name: &str) -> Result<String, SummarizeError> {
        let request = ChatRequest::new(&self.model)
            .message(Message::system(SUMMARY_SYSTEM_PROMPT))
            .message(Message::user(format_summary_prompt(text, company_name)))
            .max_tokens(self.max_tokens)
            .temperature(self.temperature);

        match self.client.chat_completion(request).await {
            Ok(response) => Ok(response.content.trim().to_string()),
            Err(OpenAIError::RateLimited(message)) => Err(SummarizeError::RateLimited(message)),
            Err(e) => Err(SummarizeError::Api(e.to_string())),
        }
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
