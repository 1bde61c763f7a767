//! One account's session
//!
//! Lifecycle: `Created → Authenticating → Traversing → Summarizing → Closed`.
//! Launch, login, and worklist failures end the session early by jumping
//! to `Summarizing`; the summary and the browser release happen on every
//! path out of [`SessionRunner::run`].

use crate::browser::{Authenticator, DriverHandle, DriverLauncher};
use crate::config::Account;
use crate::engine::{TopicTraverser, TraversalPolicy};
use crate::feed::WorklistSource;
use crate::output::{render_session_summary, MaskedIdentity};
use crate::state::{SessionPhase, SessionStats};
use crate::SessionError;
use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn, Instrument};

/// Collaborators shared by every session of a fleet
#[derive(Clone)]
pub struct SessionContext {
    pub launcher: Arc<dyn DriverLauncher>,
    pub authenticator: Arc<dyn Authenticator>,
    pub source: Arc<dyn WorklistSource>,
    pub policy: Arc<TraversalPolicy>,
}

/// What a finished session reports
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub identity: MaskedIdentity,
    pub phase: SessionPhase,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub topics_visited: u64,
    pub posts_visited: u64,
    pub items_exhausted: u64,
    /// Why the session ended early, if it did
    pub failure: Option<String>,
}

impl SessionReport {
    /// Report for a session whose task died before producing its own
    pub fn aborted(identity: MaskedIdentity, reason: impl Into<String>) -> Self {
        Self {
            identity,
            phase: SessionPhase::Closed,
            started_at: Utc::now(),
            elapsed: Duration::ZERO,
            topics_visited: 0,
            posts_visited: 0,
            items_exhausted: 0,
            failure: Some(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Runs login, worklist fetch, and traversal for a single account
pub struct SessionRunner {
    account: Account,
    identity: MaskedIdentity,
    context: SessionContext,
    driver: DriverHandle,
    phase: SessionPhase,
    stats: SessionStats,
}

impl SessionRunner {
    /// Creates a session that will launch its browser into `driver`
    pub fn new(account: Account, context: SessionContext, driver: DriverHandle) -> Self {
        let identity = account.masked();
        Self {
            account,
            identity,
            context,
            driver,
            phase: SessionPhase::Created,
            stats: SessionStats::new(),
        }
    }

    pub fn identity(&self) -> &MaskedIdentity {
        &self.identity
    }

    /// Runs the session to `Closed`
    ///
    /// Never fails: fatal errors and panics are logged and recorded in the
    /// report, keeping whatever was visited before them.
    pub async fn run(mut self) -> SessionReport {
        let span = tracing::info_span!("session", account = %self.identity);

        async move {
            info!("Session starting");

            let failure = match AssertUnwindSafe(self.run_body()).catch_unwind().await {
                Ok(Ok(())) => None,
                Ok(Err(e)) => {
                    error!("Session ended early: {}", e);
                    Some(e.to_string())
                }
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    error!("Session panicked: {}", message);
                    Some(format!("session panicked: {}", message))
                }
            };

            let mut report = self.summarize(failure);
            self.close().await;
            report.phase = self.phase;
            report
        }
        .instrument(span)
        .await
    }

    async fn run_body(&mut self) -> Result<(), SessionError> {
        let driver = self
            .context
            .launcher
            .launch(&self.identity)
            .await
            .map_err(SessionError::Launch)?;
        self.driver.install(driver).await;

        self.advance(SessionPhase::Authenticating)?;

        let handle = self.driver.clone();
        let mut slot = handle.lock().await;
        let driver = slot.as_deref_mut().ok_or(SessionError::DriverReleased)?;

        self.context
            .authenticator
            .login(driver, &self.account)
            .await?;
        info!("Login succeeded");

        info!("Fetching worklist");
        let worklist = self.context.source.fetch_worklist().await?;
        info!("Worklist ready: {} topics", worklist.len());

        self.advance(SessionPhase::Traversing)?;

        let policy = Arc::clone(&self.context.policy);
        TopicTraverser::new(driver, &policy)
            .traverse(&worklist, &mut self.stats)
            .await;

        Ok(())
    }

    /// Moves to `Summarizing` and builds the report
    fn summarize(&mut self, failure: Option<String>) -> SessionReport {
        if let Err(e) = self.advance(SessionPhase::Summarizing) {
            warn!("{}", e);
        }

        let report = SessionReport {
            identity: self.identity.clone(),
            phase: self.phase,
            started_at: self.stats.started_at(),
            elapsed: self.stats.elapsed(),
            topics_visited: self.stats.topics_visited(),
            posts_visited: self.stats.posts_visited(),
            items_exhausted: self.stats.items_exhausted(),
            failure,
        };

        info!("{}", render_session_summary(&report));
        report
    }

    /// Releases the browser and moves to `Closed`
    async fn close(&mut self) {
        info!("Closing browser");
        if !self.driver.release().await {
            debug!("No browser to release");
        }

        if let Err(e) = self.advance(SessionPhase::Closed) {
            warn!("{}", e);
        }
    }

    fn advance(&mut self, next: SessionPhase) -> Result<(), SessionError> {
        if !self.phase.can_advance_to(next) {
            return Err(SessionError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }

        debug!("Session phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
