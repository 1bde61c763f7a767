//! Topic traversal with per-page retries
//!
//! Pages are visited strictly in order: each topic page, then its reply
//! pages in ascending index order, then the next topic. Every page runs its
//! own [`VisitState`] machine:
//!
//! 1. Attempt the visit
//! 2. On failure with attempts left: refresh, cool down, try again
//! 3. On failure of the last attempt: log and skip the page
//! 4. On success: count it and let the page settle
//!
//! A skipped page never stops the rest of the worklist.

use crate::browser::PageDriver;
use crate::config::{Config, TopicFailurePolicy};
use crate::engine::PageVisitor;
use crate::feed::WorklistEntry;
use crate::state::{SessionStats, VisitOutcome, VisitState};
use std::fmt;
use std::time::Duration;
use tracing::{error, info, warn};

/// Retry budget and pacing for a traversal
#[derive(Debug, Clone)]
pub struct TraversalPolicy {
    /// Attempts per page, at least 1
    pub max_retries: u32,
    pub retry_cooldown: Duration,
    pub settle_delay: Duration,
    pub visit_timeout: Duration,
    pub ready_selector: String,
    pub on_topic_exhausted: TopicFailurePolicy,
}

impl TraversalPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_retries: config.traversal.max_retries.max(1),
            retry_cooldown: config.traversal.retry_cooldown(),
            settle_delay: config.traversal.settle_delay(),
            visit_timeout: config.traversal.visit_timeout(),
            ready_selector: config.site.ready_selector.clone(),
            on_topic_exhausted: config.traversal.on_topic_exhausted,
        }
    }
}

impl Default for TraversalPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_cooldown: Duration::from_secs(2),
            settle_delay: Duration::from_secs(3),
            visit_timeout: Duration::from_secs(10),
            ready_selector: "article".to_string(),
            on_topic_exhausted: TopicFailurePolicy::Continue,
        }
    }
}

/// Which page of a topic is being visited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Topic,
    Reply { index: u32, of: u32 },
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Topic => write!(f, "topic page"),
            Self::Reply { index, of } => write!(f, "reply page {}/{}", index, of),
        }
    }
}

/// Final result for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Succeeded { attempts: u32 },
    Exhausted { attempts: u32, last: VisitOutcome },
}

impl ItemOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// Drives one session's page visits
pub struct TopicTraverser<'a> {
    driver: &'a mut dyn PageDriver,
    policy: &'a TraversalPolicy,
    visitor: PageVisitor,
}

impl<'a> TopicTraverser<'a> {
    pub fn new(driver: &'a mut dyn PageDriver, policy: &'a TraversalPolicy) -> Self {
        let visitor = PageVisitor::new(policy.ready_selector.clone(), policy.visit_timeout);
        Self {
            driver,
            policy,
            visitor,
        }
    }

    /// Visits every entry in worklist order
    pub async fn traverse(&mut self, worklist: &[WorklistEntry], stats: &mut SessionStats) {
        let total = worklist.len();
        for (position, entry) in worklist.iter().enumerate() {
            self.traverse_entry(entry, position + 1, total, stats).await;
        }
    }

    /// Visits one topic page and then its reply pages
    ///
    /// Returns the topic page's outcome.
    pub async fn traverse_entry(
        &mut self,
        entry: &WorklistEntry,
        position: usize,
        total: usize,
        stats: &mut SessionStats,
    ) -> ItemOutcome {
        info!("Visiting topic ({}/{}): {}", position, total, entry.topic_url);

        let topic = self.visit_item(&entry.topic_url, PageKind::Topic).await;
        record(&topic, PageKind::Topic, stats);

        if !topic.is_success() && self.policy.on_topic_exhausted == TopicFailurePolicy::SkipReplies
        {
            info!("Skipping reply pages of {}", entry.topic_url);
            return topic;
        }

        for index in entry.sub_page_indices() {
            let kind = PageKind::Reply {
                index,
                of: entry.reply_count,
            };
            let url = entry.sub_page_url(index);
            let outcome = self.visit_item(&url, kind).await;
            record(&outcome, kind, stats);
        }

        topic
    }

    /// Runs the retry state machine for a single page
    pub async fn visit_item(&mut self, url: &str, kind: PageKind) -> ItemOutcome {
        let max = self.policy.max_retries;
        let mut state = VisitState::start();
        let mut attempts = 0;
        let mut last = VisitOutcome::Success;

        while let Some(attempt) = state.attempt() {
            attempts = attempt;
            if let PageKind::Reply { .. } = kind {
                info!("Visiting {}", kind);
            }

            last = self.visitor.visit(&mut *self.driver, url).await;
            state = state.advance(&last, max);

            if let VisitState::Attempting(_) = state {
                warn!(
                    "Failed to load {}, retrying ({}/{}): {}",
                    kind, attempt, max, last
                );
                if let Err(e) = self.driver.refresh().await {
                    warn!("Refresh failed: {}", e);
                }
                tokio::time::sleep(self.policy.retry_cooldown).await;
            }
        }

        if state == VisitState::Succeeded {
            tokio::time::sleep(self.policy.settle_delay).await;
            ItemOutcome::Succeeded { attempts }
        } else {
            error!(
                "Still unable to load {} after {} attempts, skipping: {} ({})",
                kind, attempts, url, last
            );
            ItemOutcome::Exhausted { attempts, last }
        }
    }
}

fn record(outcome: &ItemOutcome, kind: PageKind, stats: &mut SessionStats) {
    match (outcome, kind) {
        (ItemOutcome::Succeeded { .. }, PageKind::Topic) => stats.record_topic(),
        (ItemOutcome::Succeeded { .. }, PageKind::Reply { .. }) => stats.record_post(),
        (ItemOutcome::Exhausted { .. }, _) => stats.record_exhausted(),
    }
}
