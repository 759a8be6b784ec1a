//! HTTP document fetcher with PDF text extraction.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use tracing::debug;

use crate::error::DocumentError;
use crate::traits::DocumentFetcher;

/// Fetches document bytes over HTTP and extracts plain text from them.
///
/// Fetch failures map to [`DocumentError::Request`], byte-to-text failures
/// to [`DocumentError::Extraction`]; the pipeline records either and moves
/// on to the next unit.
pub struct HttpDocumentFetcher {
    client: reqwest::Client,
    user_agent: String,
}

impl HttpDocumentFetcher {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            user_agent: user_agent.into(),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/pdf,application/octet-stream,*/*;q=0.8"),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.5"),
        );
        if let Ok(value) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, value);
        }
        headers
    }
}

#[async_trait]
impl DocumentFetcher for HttpDocumentFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, DocumentError> {
        debug!(url = %url, "Fetching document");

        let response = self
            .client
            .get(url)
            .headers(self.headers())
            .send()
            .await
            .map_err(|e| DocumentError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocumentError::Request(format!("HTTP {status} for {url}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DocumentError::Request(e.to_string()))?;

        // pdf-extract is synchronous and CPU-bound; keep it off the
        // runtime's I/O threads.
        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| DocumentError::Extraction(e.to_string()))?
        .map_err(DocumentError::Extraction)?;

        Ok(text)
    }
}
