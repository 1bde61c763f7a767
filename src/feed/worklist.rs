use std::ops::RangeInclusive;

/// One topic to visit, as read from the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorklistEntry {
    /// Address of the topic's first page
    pub topic_url: String,

    /// Posts in the topic, counting the opening post
    pub reply_count: u32,
}

impl WorklistEntry {
    pub fn new(topic_url: impl Into<String>, reply_count: u32) -> Self {
        Self {
            topic_url: topic_url.into(),
            reply_count,
        }
    }

    /// Reply page indices after the topic page, in visiting order
    ///
    /// Always `2..=reply_count`, which is empty when the topic has fewer
    /// than two posts.
    pub fn sub_page_indices(&self) -> RangeInclusive<u32> {
        2..=self.reply_count
    }

    /// Address of reply page `index`: the topic URL with `/index` appended
    pub fn sub_page_url(&self, index: u32) -> String {
        format!("{}/{}", self.topic_url, index)
    }
}
