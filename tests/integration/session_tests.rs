//! Single-session tests against scripted collaborators

use crate::support::{quick_policy, two_topics, FakeAuthenticator, FakeSource, ScriptedLauncher};
use forum_rounds::browser::DriverHandle;
use forum_rounds::config::{Account, TopicFailurePolicy};
use forum_rounds::engine::{SessionContext, SessionRunner, TraversalPolicy};
use forum_rounds::{SessionPhase, WorklistEntry};
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn context(
    launcher: ScriptedLauncher,
    authenticator: FakeAuthenticator,
    source: FakeSource,
    policy: TraversalPolicy,
) -> (SessionContext, crate::support::SharedLog, Arc<FakeSource>) {
    let log = launcher.log();
    let source = Arc::new(source);
    let context = SessionContext {
        launcher: Arc::new(launcher),
        authenticator: Arc::new(authenticator),
        source: source.clone(),
        policy: Arc::new(policy),
    };
    (context, log, source)
}

#[tokio::test]
async fn test_session_visits_topics_and_reply_pages() {
    let (ctx, log, source) = context(
        ScriptedLauncher::new(),
        FakeAuthenticator::default(),
        FakeSource::with(two_topics()),
        quick_policy(),
    );
    let handle = DriverHandle::new();

    let report = SessionRunner::new(Account::new("alice", "pw"), ctx, handle.clone())
        .run()
        .await;

    assert!(report.is_success());
    assert_eq!(report.phase, SessionPhase::Closed);
    assert_eq!(report.topics_visited, 2);
    assert_eq!(report.posts_visited, 2);
    assert_eq!(report.items_exhausted, 0);
    assert_eq!(source.fetches.load(Ordering::SeqCst), 1);

    let log = log.lock().unwrap();
    assert_eq!(
        log.navigations,
        vec![
            "https://forum.example.com/t/first/1",
            "https://forum.example.com/t/first/1/2",
            "https://forum.example.com/t/first/1/3",
            "https://forum.example.com/t/second/2",
        ]
    );
    assert_eq!(log.refreshes, 0);
    assert_eq!(log.quits, 1);
    drop(log);

    assert!(!handle.is_open().await);
}

#[tokio::test]
async fn test_session_recovers_after_transient_failures() {
    let (ctx, log, _) = context(
        ScriptedLauncher::new().failing("https://forum.example.com/t/first/1/2", 2),
        FakeAuthenticator::default(),
        FakeSource::with(two_topics()),
        quick_policy(),
    );

    let report = SessionRunner::new(Account::new("alice", "pw"), ctx, DriverHandle::new())
        .run()
        .await;

    assert_eq!(report.topics_visited, 2);
    assert_eq!(report.posts_visited, 2);

    let log = log.lock().unwrap();
    assert_eq!(log.refreshes, 2);
    assert_eq!(log.quits, 1);
}

#[tokio::test]
async fn test_session_continues_past_exhausted_topic() {
    let (ctx, log, _) = context(
        ScriptedLauncher::new().failing("https://forum.example.com/t/first/1", u32::MAX),
        FakeAuthenticator::default(),
        FakeSource::with(two_topics()),
        quick_policy(),
    );

    let report = SessionRunner::new(Account::new("alice", "pw"), ctx, DriverHandle::new())
        .run()
        .await;

    // Reply pages of the failed topic are still visited by default
    assert!(report.is_success());
    assert_eq!(report.topics_visited, 1);
    assert_eq!(report.posts_visited, 2);
    assert_eq!(report.items_exhausted, 1);

    let log = log.lock().unwrap();
    // Three attempts, refreshed between them but not after the last
    assert_eq!(log.refreshes, 2);
    assert_eq!(log.navigations.last().unwrap(), "https://forum.example.com/t/second/2");
}

#[tokio::test]
async fn test_session_skips_replies_of_exhausted_topic() {
    let policy = TraversalPolicy {
        on_topic_exhausted: TopicFailurePolicy::SkipReplies,
        ..quick_policy()
    };
    let (ctx, log, _) = context(
        ScriptedLauncher::new().failing("https://forum.example.com/t/first/1", u32::MAX),
        FakeAuthenticator::default(),
        FakeSource::with(two_topics()),
        policy,
    );

    let report = SessionRunner::new(Account::new("alice", "pw"), ctx, DriverHandle::new())
        .run()
        .await;

    assert_eq!(report.topics_visited, 1);
    assert_eq!(report.posts_visited, 0);

    let log = log.lock().unwrap();
    assert!(!log
        .navigations
        .iter()
        .any(|url| url.starts_with("https://forum.example.com/t/first/1/")));
}

#[tokio::test]
async fn test_login_failure_ends_session_and_closes_browser() {
    let (ctx, log, source) = context(
        ScriptedLauncher::new(),
        FakeAuthenticator::rejecting(&["alice"]),
        FakeSource::with(two_topics()),
        quick_policy(),
    );

    let report = SessionRunner::new(Account::new("alice", "pw"), ctx, DriverHandle::new())
        .run()
        .await;

    assert!(!report.is_success());
    assert!(report.failure.as_deref().unwrap().starts_with("Login failed"));
    assert_eq!(report.phase, SessionPhase::Closed);
    assert_eq!(report.topics_visited, 0);
    assert_eq!(report.posts_visited, 0);
    assert_eq!(source.fetches.load(Ordering::SeqCst), 0);

    let log = log.lock().unwrap();
    assert!(log.navigations.is_empty());
    assert_eq!(log.quits, 1);
}

#[tokio::test]
async fn test_feed_failure_ends_session_before_traversal() {
    let (ctx, log, _) = context(
        ScriptedLauncher::new(),
        FakeAuthenticator::default(),
        FakeSource::unavailable(),
        quick_policy(),
    );

    let report = SessionRunner::new(Account::new("alice", "pw"), ctx, DriverHandle::new())
        .run()
        .await;

    assert!(report.failure.as_deref().unwrap().contains("503"));
    assert_eq!(report.phase, SessionPhase::Closed);
    assert_eq!(report.topics_visited, 0);

    let log = log.lock().unwrap();
    assert!(log.navigations.is_empty());
    assert_eq!(log.quits, 1);
}

#[tokio::test]
async fn test_launch_failure_still_summarizes() {
    let (ctx, log, source) = context(
        ScriptedLauncher::new().unlaunchable(),
        FakeAuthenticator::default(),
        FakeSource::with(two_topics()),
        quick_policy(),
    );

    let report = SessionRunner::new(Account::new("alice", "pw"), ctx, DriverHandle::new())
        .run()
        .await;

    assert!(report.failure.is_some());
    assert_eq!(report.phase, SessionPhase::Closed);
    assert_eq!(source.fetches.load(Ordering::SeqCst), 0);
    assert_eq!(log.lock().unwrap().quits, 0);
}

#[tokio::test]
async fn test_empty_worklist_is_a_successful_session() {
    let (ctx, log, _) = context(
        ScriptedLauncher::new(),
        FakeAuthenticator::default(),
        FakeSource::with(Vec::<WorklistEntry>::new()),
        quick_policy(),
    );

    let report = SessionRunner::new(Account::new("alice", "pw"), ctx, DriverHandle::new())
        .run()
        .await;

    assert!(report.is_success());
    assert_eq!(report.topics_visited, 0);
    assert_eq!(log.lock().unwrap().quits, 1);
}

#[tokio::test]
async fn test_panic_during_traversal_is_summarized_and_closed() {
    let (ctx, log, _) = context(
        ScriptedLauncher::new().panicking_on("https://forum.example.com/t/second/2"),
        FakeAuthenticator::default(),
        FakeSource::with(two_topics()),
        quick_policy(),
    );
    let handle = DriverHandle::new();

    let report = SessionRunner::new(Account::new("alice", "pw"), ctx, handle.clone())
        .run()
        .await;

    assert_eq!(report.phase, SessionPhase::Closed);
    assert_eq!(
        report.failure.as_deref(),
        Some("session panicked: scripted crash on https://forum.example.com/t/second/2")
    );
    assert_eq!(report.topics_visited, 1);
    assert_eq!(report.posts_visited, 2);

    assert_eq!(log.lock().unwrap().quits, 1);
    assert!(!handle.is_open().await);
}
