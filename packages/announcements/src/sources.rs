//! HTTP listing source.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE, REFERER, USER_AGENT};
use tracing::debug;

use crate::error::SourceError;
use crate::traits::SourceFetcher;

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// Fetches the live announcement listing over HTTP.
///
/// Sends a browser-profile header set; an optional raw cookie header is
/// passed through untouched for authenticated listings.
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
    user_agent: String,
    cookie_header: Option<String>,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            url: url.into(),
            user_agent: user_agent.into(),
            cookie_header: None,
        }
    }

    /// Attach a raw `Cookie:` header value.
    pub fn with_cookie_header(mut self, cookie_header: impl Into<String>) -> Self {
        self.cookie_header = Some(cookie_header.into());
        self
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-GB,en-US;q=0.9,en;q=0.8"),
        );
        if let Ok(value) = HeaderValue::from_str(&self.url) {
            headers.insert(REFERER, value);
        }
        if let Ok(value) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, value);
        }
        if let Some(cookie) = &self.cookie_header {
            if let Ok(value) = HeaderValue::from_str(cookie) {
                headers.insert(COOKIE, value);
            }
        }
        headers
    }
}

#[async_trait]
impl SourceFetcher for HttpSource {
    async fn fetch_listing(&self) -> Result<String, SourceError> {
        debug!(url = %self.url, "Fetching announcement listing");

        let response = self
            .client
            .get(&self.url)
            .headers(self.headers())
            .send()
            .await
            .map_err(|e| SourceError::Request(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| SourceError::Request(Box::new(e)))
    }
}
