pub mod atom;
pub mod rss;

use std::time::Duration;

/// One fetched-and-parsed feed document. Lives only while its source is
/// being merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RawFeed {
    pub title: Option<String>,
    pub entries: Vec<RawEntry>,
}

/// A single entry as the source published it. The timestamp candidates stay
/// in their textual form; the normalizer decides which one is usable.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub published: Option<String>,
    pub updated: Option<String>,
    pub created: Option<String>,
}

/// Best-effort parse. Malformed input yields an empty document; the fetch
/// layer treats that as a failed attempt.
pub(crate) fn parse(bytes: &[u8]) -> RawFeed {
    let text = String::from_utf8_lossy(bytes);
    if text.contains("<rss") {
        rss::parse(bytes)
    } else {
        atom::parse(bytes)
    }
}

/// A transport error, an HTTP error status, and a document without entries
/// are all the same thing to the caller: an attempt that should be retried.
pub(crate) fn fetch_once(
    client: &reqwest::blocking::Client,
    url: &str,
) -> anyhow::Result<RawFeed> {
    let response = client.get(url).send()?.error_for_status()?;
    let bytes = response.bytes()?;
    let doc = parse(&bytes);
    if doc.entries.is_empty() {
        anyhow::bail!("no entries parsed");
    }
    Ok(doc)
}

/// Bounded retries with a linearly growing pause: after failed attempt `i`
/// (1-based) the next one waits `base_delay * i`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub(crate) fn delay(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    pub(crate) fn run<T>(
        &self,
        mut op: impl FnMut() -> anyhow::Result<T>,
        mut on_fail: impl FnMut(u32, &anyhow::Error),
    ) -> anyhow::Result<T> {
        let mut last = None;
        for attempt in 1..=self.attempts {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) => {
                    on_fail(attempt, &err);
                    if attempt < self.attempts {
                        std::thread::sleep(self.delay(attempt));
                    }
                    last = Some(err);
                }
            }
        }
        Err(last.unwrap_or_else(|| anyhow::anyhow!("no attempts configured")))
    }
}
