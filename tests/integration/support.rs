//! Scripted collaborators for driving sessions without a real browser

use async_trait::async_trait;
use forum_rounds::browser::{Authenticator, DriverLauncher, PageDriver};
use forum_rounds::config::{Account, TopicFailurePolicy};
use forum_rounds::engine::TraversalPolicy;
use forum_rounds::{DriverError, FeedError, MaskedIdentity, SessionError, WorklistEntry, WorklistSource};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Everything the scripted drivers of one test did
#[derive(Debug, Default)]
pub struct DriverLog {
    pub navigations: Vec<String>,
    pub refreshes: usize,
    pub launches: usize,
    pub quits: usize,
}

pub type SharedLog = Arc<Mutex<DriverLog>>;

/// Fast policy so tests do not sleep
pub fn quick_policy() -> TraversalPolicy {
    TraversalPolicy {
        max_retries: 3,
        retry_cooldown: Duration::ZERO,
        settle_delay: Duration::ZERO,
        visit_timeout: Duration::from_millis(50),
        ready_selector: "article".to_string(),
        on_topic_exhausted: TopicFailurePolicy::Continue,
    }
}

/// A driver whose readiness checks fail a scripted number of times per URL
pub struct ScriptedDriver {
    log: SharedLog,
    failures: HashMap<String, u32>,
    panic_on: Option<String>,
    current: Option<String>,
}

#[async_trait]
impl PageDriver for ScriptedDriver {
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        if self.panic_on.as_deref() == Some(url) {
            panic!("scripted crash on {}", url);
        }
        self.log.lock().unwrap().navigations.push(url.to_string());
        self.current = Some(url.to_string());
        Ok(())
    }

    async fn wait_ready(&mut self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        let Some(ref url) = self.current else {
            return Ok(());
        };
        match self.failures.get_mut(url) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                Err(DriverError::Timeout {
                    selector: selector.to_string(),
                    timeout,
                })
            }
            _ => Ok(()),
        }
    }

    async fn refresh(&mut self) -> Result<(), DriverError> {
        self.log.lock().unwrap().refreshes += 1;
        Ok(())
    }

    async fn click(&mut self, _selector: &str, _timeout: Duration) -> Result<(), DriverError> {
        Ok(())
    }

    async fn fill(
        &mut self,
        _selector: &str,
        _text: &str,
        _timeout: Duration,
    ) -> Result<(), DriverError> {
        Ok(())
    }

    async fn quit(&mut self) -> Result<(), DriverError> {
        self.log.lock().unwrap().quits += 1;
        Ok(())
    }
}

/// Hands every session a fresh [`ScriptedDriver`] sharing one log
#[derive(Default)]
pub struct ScriptedLauncher {
    pub log: SharedLog,
    failures: HashMap<String, u32>,
    panic_on: Option<String>,
    fail_launch: bool,
}

impl ScriptedLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `url` fail its readiness check `times` times before loading
    pub fn failing(mut self, url: &str, times: u32) -> Self {
        self.failures.insert(url.to_string(), times);
        self
    }

    /// Makes navigation to `url` panic
    pub fn panicking_on(mut self, url: &str) -> Self {
        self.panic_on = Some(url.to_string());
        self
    }

    pub fn unlaunchable(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    pub fn log(&self) -> SharedLog {
        Arc::clone(&self.log)
    }
}

#[async_trait]
impl DriverLauncher for ScriptedLauncher {
    async fn launch(&self, _identity: &MaskedIdentity) -> Result<Box<dyn PageDriver>, DriverError> {
        if self.fail_launch {
            return Err(DriverError::Launch("no browser installed".to_string()));
        }

        self.log.lock().unwrap().launches += 1;
        Ok(Box::new(ScriptedDriver {
            log: Arc::clone(&self.log),
            failures: self.failures.clone(),
            panic_on: self.panic_on.clone(),
            current: None,
        }))
    }
}

/// Accepts every account except the ones named as rejected
#[derive(Default)]
pub struct FakeAuthenticator {
    rejected: Vec<String>,
}

impl FakeAuthenticator {
    pub fn rejecting(usernames: &[&str]) -> Self {
        Self {
            rejected: usernames.iter().map(|u| u.to_string()).collect(),
        }
    }
}

#[async_trait]
impl Authenticator for FakeAuthenticator {
    async fn login(&self, _driver: &mut dyn PageDriver, account: &Account) -> Result<(), SessionError> {
        if self.rejected.contains(&account.username) {
            return Err(SessionError::Login {
                reason: "logged-in marker never appeared".to_string(),
            });
        }
        Ok(())
    }
}

/// A fixed worklist, or a fixed feed failure
pub struct FakeSource {
    worklist: Option<Vec<WorklistEntry>>,
    pub fetches: AtomicUsize,
}

impl FakeSource {
    pub fn with(worklist: Vec<WorklistEntry>) -> Self {
        Self {
            worklist: Some(worklist),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            worklist: None,
            fetches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl WorklistSource for FakeSource {
    async fn fetch_worklist(&self) -> Result<Vec<WorklistEntry>, FeedError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match self.worklist {
            Some(ref worklist) => Ok(worklist.clone()),
            None => Err(FeedError::Status {
                url: "https://forum.example.com/latest.rss".to_string(),
                status: 503,
            }),
        }
    }
}

pub fn two_topics() -> Vec<WorklistEntry> {
    vec![
        WorklistEntry::new("https://forum.example.com/t/first/1", 3),
        WorklistEntry::new("https://forum.example.com/t/second/2", 1),
    ]
}
