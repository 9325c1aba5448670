use std::collections::HashSet;

use indicatif::ProgressBar;
use rayon::prelude::*;

use crate::feed::{self, RawFeed, RetryPolicy};
use crate::item::{self, Item};

pub(crate) struct MergeOutcome {
    pub items: Vec<Item>,
    pub failed: usize,
}

/// Fetch every source and collate the results. Fetches run on the rayon
/// pool; the indexed collect hands results back in source-list order, and
/// `collate` folds them sequentially, so the first-wins dedup rule means
/// "first in the feed list", not "first to arrive".
pub(crate) fn merge(
    client: &reqwest::blocking::Client,
    sources: &[String],
    policy: RetryPolicy,
    per_feed_cap: usize,
    total_cap: usize,
) -> MergeOutcome {
    let pb = ProgressBar::new(sources.len() as u64);
    let docs: Vec<(String, RawFeed)> = sources
        .par_iter()
        .map(|url| {
            pb.set_message(url.clone());
            let doc = fetch_source(client, url, policy, &pb);
            pb.inc(1);
            (url.clone(), doc)
        })
        .collect();
    pb.finish_and_clear();

    collate(docs, per_feed_cap, total_cap)
}

/// One source, retried per policy. A source that exhausts its attempts
/// degrades to an empty document so the remaining sources still run.
fn fetch_source(
    client: &reqwest::blocking::Client,
    url: &str,
    policy: RetryPolicy,
    pb: &ProgressBar,
) -> RawFeed {
    let total = policy.attempts;
    let result = policy.run(
        || feed::fetch_once(client, url),
        |attempt, err| {
            pb.suspend(|| eprintln!("warning: fetch failed ({attempt}/{total}): {url}: {err}"));
        },
    );

    match result {
        Ok(doc) => doc,
        Err(err) => {
            pb.suspend(|| eprintln!("error: giving up on {url}: {err}"));
            RawFeed::default()
        }
    }
}

/// The pure core of the pipeline: per-feed cap, global dedup by canonical
/// link, stable descending sort, total cap. The per-feed cap is applied to
/// the raw entries before normalization, so duplicate or link-less entries
/// inside a source's first N still consume cap slots.
pub(crate) fn collate(
    docs: Vec<(String, RawFeed)>,
    per_feed_cap: usize,
    total_cap: usize,
) -> MergeOutcome {
    let mut seen = HashSet::new();
    let mut items = Vec::new();
    let mut failed = 0;

    for (url, doc) in docs {
        if doc.entries.is_empty() {
            failed += 1;
            continue;
        }

        let source = doc
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| url.clone());

        for entry in doc.entries.iter().take(per_feed_cap) {
            let Some(item) = item::normalize(entry, &source) else {
                continue;
            };
            if !seen.insert(item.link.clone()) {
                continue;
            }
            items.push(item);
        }
    }

    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    items.truncate(total_cap);

    MergeOutcome { items, failed }
}
