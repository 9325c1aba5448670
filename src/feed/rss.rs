use std::io::BufReader;

use rss::Channel;

use super::{RawEntry, RawFeed};

/// RSS 2.0 into the raw document shape. `<pubDate>` becomes the `published`
/// candidate; the first Dublin Core `<dc:date>`, when a feed carries one,
/// becomes `created`.
pub(crate) fn parse(bytes: &[u8]) -> RawFeed {
    let channel = match Channel::read_from(BufReader::new(bytes)) {
        Ok(channel) => channel,
        Err(_) => return RawFeed::default(),
    };

    let entries = channel
        .items()
        .iter()
        .map(|item| RawEntry {
            title: item.title().map(str::to_string),
            link: item.link().map(str::to_string),
            summary: item.description().map(str::to_string),
            published: item.pub_date().map(str::to_string),
            updated: None,
            created: item
                .dublin_core_ext()
                .and_then(|dc| dc.dates().first().cloned()),
        })
        .collect();

    RawFeed {
        title: Some(channel.title().to_string()),
        entries,
    }
}
