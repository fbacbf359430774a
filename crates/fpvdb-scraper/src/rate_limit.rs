//! Retry policy for the page retrieval service.
//!
//! Only [`ScraperError::RateLimited`] is retried, after a fixed delay. Every
//! other error is returned on the spot: a broken page or a network failure
//! will not improve by waiting, and the caller skips that URL.

use std::future::Future;
use std::time::Duration;

use crate::client::PageSource;
use crate::error::ScraperError;
use crate::types::ScrapedPage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Values below 1 behave as 1.
    pub max_attempts: u32,
    /// Sleep between a rate-limited attempt and the next one.
    pub delay: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(45))
    }
}

fn is_retriable(err: &ScraperError) -> bool {
    matches!(err, ScraperError::RateLimited { .. })
}

/// Executes `operation`, retrying rate-limited attempts after `delay`.
///
/// With `max_attempts = 3` the operation runs at most three times. When every
/// attempt is rate limited the last `RateLimited` error is returned.
///
/// # Errors
///
/// Returns the first non-retriable error, or the last `RateLimited` error
/// once attempts are exhausted.
pub async fn retry_on_rate_limit<T, F, Fut>(
    max_attempts: u32,
    delay: Duration,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_attempts {
                    return Err(err);
                }
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_secs = delay.as_secs(),
                    error = %err,
                    "rate limited; waiting before retry"
                );
            }
        }

        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

/// Scrapes `url` through `source` under `policy`, treating a response without
/// page content as [`ScraperError::EmptyPage`].
///
/// # Errors
///
/// Returns the source's error (after retries for rate limiting) or
/// [`ScraperError::EmptyPage`].
pub async fn scrape_with_retry<S: PageSource>(
    source: &S,
    url: &str,
    policy: RetryPolicy,
) -> Result<ScrapedPage, ScraperError> {
    let page =
        retry_on_rate_limit(policy.max_attempts, policy.delay, || source.scrape(url)).await?;
    if page.content().is_none() {
        return Err(ScraperError::EmptyPage {
            url: url.to_owned(),
        });
    }
    Ok(page)
}
