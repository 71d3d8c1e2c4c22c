//! PageFetcher and DocumentParser.
//!
//! Fetching and parsing are kept apart: [`PageFetcher::fetch`] is the only
//! suspension point and returns owned markup, while [`parse_document`] is a
//! plain function so parsed trees never live across an `.await`.

use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::{ConfigError, FetchError};

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// HTTP GET with an explicit timeout. No retries; one request per call.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Build a fetcher whose requests fail with [`FetchError::Timeout`] after `timeout`.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Fetch the raw markup for `url`.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Timeout`] when the request or body read times out
    /// - [`FetchError::Status`] for any non-2xx response
    /// - [`FetchError::Http`] for other transport or decoding failures
    #[instrument(level = "info", skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Non-success HTTP status");
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(|e| classify(url, e))?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

fn classify(url: &str, source: reqwest::Error) -> FetchError {
    if source.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source,
        }
    }
}

/// Parse a response body into a traversable document.
///
/// HTML parsing itself is total; a body with no markup at all is the one
/// case treated as unparsable.
pub fn parse_document(markup: &str, url: &str) -> Result<Html, FetchError> {
    if markup.trim().is_empty() {
        return Err(FetchError::EmptyBody {
            url: url.to_string(),
        });
    }
    Ok(Html::parse_document(markup))
}
