use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::item::Item;

/// Stable non-permalink identifier for a feed item. Derived from the
/// canonical link alone so the same item keeps the same guid across runs,
/// which lets downstream readers deduplicate.
pub(crate) fn item_guid(link: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(link.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub(crate) fn build_channel(site_title: &str, site_url: &str, items: &[Item]) -> rss::Channel {
    let feed_items: Vec<rss::Item> = items
        .iter()
        .map(|item| {
            rss::ItemBuilder::default()
                .title(Some(item.title.clone()))
                .link(Some(item.link.clone()))
                .guid(Some(
                    rss::GuidBuilder::default()
                        .value(item_guid(&item.link))
                        .permalink(false)
                        .build(),
                ))
                .pub_date(Some(item.timestamp.to_rfc2822()))
                .author(Some(item.source.clone()))
                .description(Some(item.summary.clone()))
                .build()
        })
        .collect();

    rss::ChannelBuilder::default()
        .title(site_title.to_string())
        .link(site_url.to_string())
        .description(format!("{site_title} - combined feed"))
        .last_build_date(Some(Utc::now().to_rfc2822()))
        .items(feed_items)
        .build()
}

pub(crate) fn write_combined(path: &Path, channel: &rss::Channel) -> anyhow::Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    channel
        .pretty_write_to(file, b' ', 2)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
