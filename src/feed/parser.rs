//! Feed parser for building the worklist
//!
//! Each feed item contributes its first link and a post count read from its
//! description. The description is HTML; the count is the text before the
//! configured delimiter inside the first marker element that contains it,
//! e.g. `<small>12 个帖子 - 5 位参与者</small>` yields 12.

use crate::config::FeedConfig;
use crate::feed::WorklistEntry;
use crate::FeedError;
use scraper::{Html, Selector};

/// Parses a feed document into an ordered worklist
///
/// Fails closed: an item without a link, without a description, or with a
/// description the count cannot be read from fails the whole document.
///
/// # Example
///
/// ```
/// use forum_rounds::config::FeedConfig;
/// use forum_rounds::feed::parse_worklist;
///
/// let xml = r#"<?xml version="1.0"?>
/// <rss version="2.0"><channel><title>Latest</title>
///   <item>
///     <title>Hello</title>
///     <link>https://forum.example.com/t/hello/7</link>
///     <description><![CDATA[<p><small>4 个帖子 - 2 位参与者</small></p>]]></description>
///   </item>
/// </channel></rss>"#;
///
/// let worklist = parse_worklist(xml.as_bytes(), &FeedConfig::default()).unwrap();
/// assert_eq!(worklist[0].reply_count, 4);
/// ```
pub fn parse_worklist(body: &[u8], config: &FeedConfig) -> Result<Vec<WorklistEntry>, FeedError> {
    let feed = feed_rs::parser::parse(body).map_err(|e| FeedError::Parse(e.to_string()))?;
    let marker = Selector::parse(&config.count_marker)
        .map_err(|e| FeedError::Parse(format!("bad count marker: {:?}", e)))?;

    let mut worklist = Vec::with_capacity(feed.entries.len());

    for (index, entry) in feed.entries.into_iter().enumerate() {
        let link = entry
            .links
            .into_iter()
            .next()
            .map(|l| l.href)
            .filter(|href| !href.trim().is_empty())
            .ok_or(FeedError::MissingField {
                index,
                field: "link",
            })?;

        let description = entry.summary.map(|t| t.content).ok_or(FeedError::MissingField {
            index,
            field: "description",
        })?;

        let reply_count =
            extract_reply_count(&description, &marker, &config.reply_count_delimiter).ok_or_else(
                || FeedError::ReplyCount {
                    link: link.clone(),
                    description: description.clone(),
                },
            )?;

        worklist.push(WorklistEntry::new(link.trim(), reply_count));
    }

    Ok(worklist)
}

/// Reads the post count out of an item description
fn extract_reply_count(description: &str, marker: &Selector, delimiter: &str) -> Option<u32> {
    let fragment = Html::parse_fragment(description);

    fragment
        .select(marker)
        .map(|element| element.text().collect::<String>())
        .find_map(|text| {
            let (count, _) = text.split_once(delimiter)?;
            count.trim().parse::<u32>().ok()
        })
}
