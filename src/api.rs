//! Summarizer collaborator: condensed text from an OpenAI-compatible LLM.
//!
//! The extraction core never retries; retry with exponential backoff lives
//! here, around the model call only.
//!
//! - [`Summarize`]: core trait, body text in, summary out
//! - [`AwfulJadeSummarizer`]: wraps `awful_aj::api::ask`
//! - [`RetrySummarize`]: decorator adding retry logic to any [`Summarize`]
//!
//! # Retry Strategy
//!
//! Set by [`RetryPolicy`] (`--summary-retries`, `--summary-backoff-ms`):
//! the delay doubles per failed attempt up to a 30 second cap, plus
//! 0-250ms of jitter.

use awful_aj::api::ask;
use awful_aj::{config::AwfulJadeConfig, template::ChatTemplate};
use rand::{Rng, rng};
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use crate::utils::truncate_chars;

/// Turn extracted article text into a shorter summary.
pub trait Summarize {
    /// # Errors
    ///
    /// Returns an error if the backend call fails or yields no text.
    async fn summarize(&self, text: &str) -> Result<String, Box<dyn Error>>;
}

/// How many times to retry a failed summary, and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub base_delay: StdDuration,
    pub max_delay: StdDuration,
}

impl RetryPolicy {
    pub fn new(max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }

    /// Wait before retry number `retry` (1-based), without jitter:
    /// `min(base_delay * 2^(retry-1), max_delay)`.
    pub fn backoff(&self, retry: usize) -> StdDuration {
        let exp = u32::try_from(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        let factor = 2u32.checked_pow(exp).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, StdDuration::from_secs(1))
    }
}

/// Decorator retrying any [`Summarize`] under a [`RetryPolicy`].
pub struct RetrySummarize<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T> RetrySummarize<T>
where
    T: Summarize,
{
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl<T> fmt::Debug for RetrySummarize<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetrySummarize")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<T> Summarize for RetrySummarize<T>
where
    T: Summarize,
{
    #[instrument(level = "info", skip_all, fields(max_retries = self.policy.max_retries))]
    async fn summarize(&self, text: &str) -> Result<String, Box<dyn Error>> {
        let started = Instant::now();
        let mut retry = 0usize;

        loop {
            let err = match self.inner.summarize(text).await {
                Ok(summary) => {
                    if retry > 0 {
                        info!(retries = retry, "Summary succeeded after retrying");
                    }
                    return Ok(summary);
                }
                Err(e) => e,
            };

            retry += 1;
            if retry > self.policy.max_retries {
                error!(
                    tries = retry,
                    elapsed_ms = started.elapsed().as_millis(),
                    error = %err,
                    "Giving up on summary"
                );
                return Err(err);
            }

            let jitter = StdDuration::from_millis(rng().random_range(0..=250));
            let delay = self.policy.backoff(retry) + jitter;
            warn!(retry, ?delay, error = %err, "Summary failed; retrying");
            sleep(delay).await;
        }
    }
}

/// [`Summarize`] over `awful_aj::api::ask`, using a chat template whose
/// system prompt asks for a concise news summary.
#[derive(Debug)]
pub struct AwfulJadeSummarizer<'a> {
    pub config: &'a AwfulJadeConfig,
    pub template: &'a ChatTemplate,
}

impl Summarize for AwfulJadeSummarizer<'_> {
    #[instrument(level = "info", skip_all, fields(chars = text.chars().count()))]
    async fn summarize(&self, text: &str) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let res = ask(self.config, text.to_string(), self.template, None, None).await;
        let dt = t0.elapsed();

        match res {
            Ok(reply) => {
                let summary = reply.trim();
                if summary.is_empty() {
                    warn!(elapsed_ms = dt.as_millis(), "Model returned an empty summary");
                    return Err("model returned an empty summary".into());
                }
                Ok(summary.to_string())
            }
            Err(e) => {
                warn!(elapsed_ms = dt.as_millis(), error = %e, "API call failed");
                Err(e)
            }
        }
    }
}

/// Summarize article text with retries, truncating the input to
/// `max_input_chars` characters first since the model limits its context.
#[instrument(level = "info", skip_all, fields(max_input_chars = max_input_chars))]
pub async fn summarize_with_backoff(
    config: &AwfulJadeConfig,
    template: &ChatTemplate,
    article_text: &str,
    max_input_chars: usize,
    policy: RetryPolicy,
) -> Result<String, Box<dyn Error>> {
    let input = truncate_chars(article_text, max_input_chars);
    if input.len() < article_text.len() {
        info!(
            original_bytes = article_text.len(),
            kept_bytes = input.len(),
            "Truncated article text for summarizer"
        );
    }

    let t0 = Instant::now();
    let client = AwfulJadeSummarizer { config, template };
    let api = RetrySummarize::new(client, policy);
    let res = api.summarize(input).await;
    let dt = t0.elapsed();

    match &res {
        Ok(_) => info!(elapsed_ms_total = dt.as_millis(), "summarize_with_backoff succeeded"),
        Err(e) => error!(elapsed_ms_total = dt.as_millis(), error = %e, "summarize_with_backoff failed"),
    }
    res
}
