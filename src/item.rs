use chrono::{DateTime, Utc};
use url::Url;

use crate::feed::RawEntry;

pub(crate) const UNTITLED: &str = "(untitled)";

/// The canonical entry shape every output consumes. Built once during
/// normalization, immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Item {
    pub title: String,
    /// Canonical link, also the dedup key. Never empty.
    pub link: String,
    pub summary: String,
    /// Owning feed's title, or its URL when the feed has none.
    pub source: String,
    /// Always present so the collection stays totally orderable.
    pub timestamp: DateTime<Utc>,
}

fn canonical_link(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => url.to_string(),
        Err(_) => raw.to_string(),
    }
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|d| d.to_utc())
}

/// Candidate fields in priority order; the first one that parses wins.
/// Entries with no usable candidate get the current instant.
pub(crate) fn resolve_timestamp(entry: &RawEntry) -> DateTime<Utc> {
    [&entry.published, &entry.updated, &entry.created]
        .into_iter()
        .flatten()
        .find_map(|raw| parse_instant(raw))
        .unwrap_or_else(Utc::now)
}

/// Returns `None` for entries without a usable link. The link is the
/// identity key and cannot be synthesized.
pub(crate) fn normalize(entry: &RawEntry, source: &str) -> Option<Item> {
    let link = entry.link.as_deref().unwrap_or_default().trim();
    if link.is_empty() {
        return None;
    }

    let title = entry.title.as_deref().unwrap_or_default().trim();
    let summary = entry.summary.as_deref().unwrap_or_default().trim();

    Some(Item {
        title: if title.is_empty() {
            UNTITLED.to_string()
        } else {
            title.to_string()
        },
        link: canonical_link(link),
        summary: summary.to_string(),
        source: source.to_string(),
        timestamp: resolve_timestamp(entry),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entry(link: Option<&str>) -> RawEntry {
        RawEntry {
            link: link.map(str::to_string),
            ..RawEntry::default()
        }
    }

    #[rstest]
    #[case("Mon, 01 Jan 2024 00:00:00 +0000", "2024-01-01 00:00")]
    #[case("Mon, 01 Jan 2024 23:00:00 -0500", "2024-01-02 04:00")]
    #[case("2024-01-01T00:00:00Z", "2024-01-01 00:00")]
    #[case("2024-01-01T23:00:00-05:00", "2024-01-02 04:00")]
    #[case("  2024-01-01T00:00:00Z  ", "2024-01-01 00:00")]
    fn test_parse_instant_formats(#[case] raw: &str, #[case] expected: &str) {
        let parsed = parse_instant(raw).unwrap();
        assert_eq!(parsed.format("%Y-%m-%d %H:%M").to_string(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("yesterday")]
    #[case("2024-01-01")]
    fn test_parse_instant_rejects_garbage(#[case] raw: &str) {
        assert_eq!(parse_instant(raw), None);
    }

    #[test]
    fn test_timestamp_prefers_published() {
        let e = RawEntry {
            published: Some("Mon, 01 Jan 2024 00:00:00 +0000".to_string()),
            updated: Some("2024-06-01T00:00:00Z".to_string()),
            created: Some("2024-07-01T00:00:00Z".to_string()),
            ..RawEntry::default()
        };

        let ts = resolve_timestamp(&e);
        assert_eq!(ts.format("%Y-%m-%d").to_string(), "2024-01-01");
    }

    #[test]
    fn test_timestamp_unparseable_published_falls_through() {
        let e = RawEntry {
            published: Some("not a date".to_string()),
            updated: Some("2024-06-01T00:00:00Z".to_string()),
            ..RawEntry::default()
        };

        let ts = resolve_timestamp(&e);
        assert_eq!(ts.format("%Y-%m-%d").to_string(), "2024-06-01");
    }

    #[test]
    fn test_timestamp_created_is_last_resort() {
        let e = RawEntry {
            created: Some("2024-07-01T00:00:00Z".to_string()),
            ..RawEntry::default()
        };

        let ts = resolve_timestamp(&e);
        assert_eq!(ts.format("%Y-%m-%d").to_string(), "2024-07-01");
    }

    #[test]
    fn test_timestamp_falls_back_to_now() {
        let before = Utc::now();
        let ts = resolve_timestamp(&RawEntry::default());
        let after = Utc::now();

        assert!(ts >= before && ts <= after);
    }

    #[test]
    fn test_entry_without_link_is_dropped() {
        assert_eq!(normalize(&entry(None), "Feed"), None);
        assert_eq!(normalize(&entry(Some("   ")), "Feed"), None);
    }

    #[test]
    fn test_missing_title_gets_placeholder() {
        let item = normalize(&entry(Some("https://example.com/post")), "Feed").unwrap();
        assert_eq!(item.title, UNTITLED);

        let e = RawEntry {
            title: Some("   ".to_string()),
            link: Some("https://example.com/post".to_string()),
            ..RawEntry::default()
        };
        assert_eq!(normalize(&e, "Feed").unwrap().title, UNTITLED);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let e = RawEntry {
            title: Some("  A Post  ".to_string()),
            link: Some("  https://example.com/post  ".to_string()),
            summary: Some("  body text  ".to_string()),
            ..RawEntry::default()
        };

        let item = normalize(&e, "Feed").unwrap();
        assert_eq!(item.title, "A Post");
        assert_eq!(item.link, "https://example.com/post");
        assert_eq!(item.summary, "body text");
        assert_eq!(item.source, "Feed");
    }

    #[test]
    fn test_missing_summary_is_empty() {
        let item = normalize(&entry(Some("https://example.com/post")), "Feed").unwrap();
        assert_eq!(item.summary, "");
    }

    #[test]
    fn test_link_is_canonicalized() {
        let item = normalize(&entry(Some("HTTPS://EXAMPLE.COM/post/1")), "Feed").unwrap();
        assert_eq!(item.link, "https://example.com/post/1");
    }

    #[test]
    fn test_unparseable_link_kept_verbatim() {
        let item = normalize(&entry(Some("not-a-url")), "Feed").unwrap();
        assert_eq!(item.link, "not-a-url");
    }
}
