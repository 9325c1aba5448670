use std::io::BufReader;

use atom_syndication::Feed;

use super::{RawEntry, RawFeed};

/// Atom into the raw document shape. `published` and `updated` are carried
/// as RFC 3339 text so the normalizer applies one parsing chain to every
/// format.
pub(crate) fn parse(bytes: &[u8]) -> RawFeed {
    let feed = match Feed::read_from(BufReader::new(bytes)) {
        Ok(feed) => feed,
        Err(_) => return RawFeed::default(),
    };

    let entries = feed
        .entries()
        .iter()
        .map(|entry| RawEntry {
            title: Some(entry.title().as_str().to_string()),
            link: entry.links().first().map(|l| l.href().to_string()),
            summary: entry.summary().map(|s| s.as_str().to_string()),
            published: entry.published().map(|d| d.to_rfc3339()),
            updated: Some(entry.updated().to_rfc3339()),
            created: None,
        })
        .collect();

    RawFeed {
        title: Some(feed.title().as_str().to_string()),
        entries,
    }
}
