use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use crate::feed::RetryPolicy;

/// Runtime tuning, overridable through the environment. Unparseable values
/// fall back to the default rather than failing the run.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub timeout: Duration,
    /// Additional attempts after the first.
    pub retries: u32,
    pub retry_delay: Duration,
    pub max_per_feed: usize,
    pub max_total: usize,
    pub site_title: String,
    pub site_url: String,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub(crate) fn from_env() -> Self {
        Self {
            timeout: Duration::from_secs(env_or("FEED_TIMEOUT", 25)),
            retries: env_or("FEED_RETRY", 2),
            retry_delay: Duration::from_millis(env_or("FEED_RETRY_DELAY_MS", 1200)),
            max_per_feed: env_or("MAX_PER_FEED", 30),
            max_total: env_or("MAX_TOTAL", 1000),
            site_title: env::var("SITE_TITLE").unwrap_or_else(|_| "Aggregated Feed".to_string()),
            site_url: env::var("SITE_URL").unwrap_or_else(|_| "https://example.org".to_string()),
        }
    }

    pub(crate) fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.retries + 1,
            base_delay: self.retry_delay,
        }
    }
}

/// Reads the newline-separated feed list. Blank lines and `#` comments are
/// skipped. A missing file is the one fatal configuration error.
pub(crate) fn read_feed_list(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("missing feed list {}", path.display()))?;

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
