//! Per-session visit counters

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// Counters owned by one session
///
/// Counters only ever increase; a fresh session starts a fresh set.
#[derive(Debug, Clone)]
pub struct SessionStats {
    topics_visited: u64,
    posts_visited: u64,
    items_exhausted: u64,
    started_at: DateTime<Utc>,
    started: Instant,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            topics_visited: 0,
            posts_visited: 0,
            items_exhausted: 0,
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    pub fn record_topic(&mut self) {
        self.topics_visited += 1;
    }

    pub fn record_post(&mut self) {
        self.posts_visited += 1;
    }

    pub fn record_exhausted(&mut self) {
        self.items_exhausted += 1;
    }

    pub fn topics_visited(&self) -> u64 {
        self.topics_visited
    }

    pub fn posts_visited(&self) -> u64 {
        self.posts_visited
    }

    /// Pages skipped after running out of attempts
    pub fn items_exhausted(&self) -> u64 {
        self.items_exhausted
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}
