//! Fleet coordinator - runs one session per account
//!
//! Every account gets its own [`SessionRunner`] spawned onto the runtime, so
//! a slow page wait in one session never holds up another. The coordinator
//! waits for all of them, then makes a final pass over every session's
//! driver handle and releases anything a crashed session left open.

use crate::browser::{
    Authenticator, ChromeLauncher, DriverHandle, DriverLauncher, FormLogin,
};
use crate::config::{Account, Config};
use crate::engine::{SessionContext, SessionReport, SessionRunner, TraversalPolicy};
use crate::feed::{RssWorklistSource, WorklistSource};
use crate::output::MaskedIdentity;
use crate::FeedError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::{self, JoinSet};

/// Results of a whole fleet run, one report per account in account order
#[derive(Debug, Clone, Default)]
pub struct FleetReport {
    pub sessions: Vec<SessionReport>,
}

impl FleetReport {
    pub fn total_topics(&self) -> u64 {
        self.sessions.iter().map(|s| s.topics_visited).sum()
    }

    pub fn total_posts(&self) -> u64 {
        self.sessions.iter().map(|s| s.posts_visited).sum()
    }

    pub fn failed_sessions(&self) -> usize {
        self.sessions.iter().filter(|s| !s.is_success()).count()
    }
}

/// Starts and supervises the sessions of every configured account
pub struct FleetCoordinator {
    context: SessionContext,
}

impl FleetCoordinator {
    pub fn new(
        launcher: Arc<dyn DriverLauncher>,
        authenticator: Arc<dyn Authenticator>,
        source: Arc<dyn WorklistSource>,
        policy: TraversalPolicy,
    ) -> Self {
        Self {
            context: SessionContext {
                launcher,
                authenticator,
                source,
                policy: Arc::new(policy),
            },
        }
    }

    /// Wires up Chromium, form login, and the RSS feed from configuration
    pub fn from_config(config: &Config) -> Result<Self, FeedError> {
        let source = RssWorklistSource::new(config.site.feed_url.clone(), config.feed.clone())?;

        Ok(Self::new(
            Arc::new(ChromeLauncher::new(config.browser.clone())),
            Arc::new(FormLogin::new(
                config.site.home_url.clone(),
                config.login.clone(),
            )),
            Arc::new(source),
            TraversalPolicy::from_config(config),
        ))
    }

    /// Runs every account's session concurrently and waits for all of them
    ///
    /// Each session ends `Closed` regardless of how it went; a failure in one
    /// never affects the others.
    pub async fn run_all(&self, accounts: Vec<Account>) -> FleetReport {
        let start_time = Instant::now();
        let count = accounts.len();
        tracing::info!("Starting {} sessions", count);

        let mut set = JoinSet::new();
        let mut handles: Vec<(MaskedIdentity, DriverHandle)> = Vec::with_capacity(count);
        let mut tasks: HashMap<task::Id, usize> = HashMap::with_capacity(count);

        for (index, account) in accounts.into_iter().enumerate() {
            let handle = DriverHandle::new();
            let runner = SessionRunner::new(account, self.context.clone(), handle.clone());
            handles.push((runner.identity().clone(), handle));
            let task = set.spawn(runner.run());
            tasks.insert(task.id(), index);
        }

        let mut reports: Vec<Option<SessionReport>> = vec![None; count];
        while let Some(joined) = set.join_next_with_id().await {
            match joined {
                Ok((id, report)) => {
                    if let Some(&index) = tasks.get(&id) {
                        reports[index] = Some(report);
                    }
                }
                Err(e) => match tasks.get(&e.id()) {
                    Some(&index) => {
                        tracing::error!("[{}] Session task failed: {}", handles[index].0, e)
                    }
                    None => tracing::error!("Session task failed: {}", e),
                },
            }
        }

        for (identity, handle) in &handles {
            if handle.release().await {
                tracing::warn!("[{}] Released browser left open by a failed session", identity);
            }
        }

        let sessions: Vec<SessionReport> = reports
            .into_iter()
            .zip(handles)
            .map(|(report, (identity, _))| {
                report.unwrap_or_else(|| SessionReport::aborted(identity, "session task panicked"))
            })
            .collect();

        let fleet = FleetReport { sessions };
        tracing::info!(
            "All sessions closed in {:?}: {} topics, {} posts, {} failed sessions",
            start_time.elapsed(),
            fleet.total_topics(),
            fleet.total_posts(),
            fleet.failed_sessions()
        );

        fleet
    }
}
