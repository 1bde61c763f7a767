//! Fleet tests: several accounts, one scripted browser each

use crate::support::{quick_policy, two_topics, FakeAuthenticator, FakeSource, ScriptedLauncher};
use forum_rounds::config::{Account, FeedConfig};
use forum_rounds::feed::RssWorklistSource;
use forum_rounds::{FleetCoordinator, SessionPhase};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn accounts() -> Vec<Account> {
    vec![
        Account::new("alice@example.com", "pw-a"),
        Account::new("bob", "pw-b"),
        Account::new("carol.smith", "pw-c"),
    ]
}

#[tokio::test]
async fn test_fleet_isolates_login_failure() {
    let launcher = ScriptedLauncher::new();
    let log = launcher.log();
    let coordinator = FleetCoordinator::new(
        Arc::new(launcher),
        Arc::new(FakeAuthenticator::rejecting(&["bob"])),
        Arc::new(FakeSource::with(two_topics())),
        quick_policy(),
    );

    let fleet = coordinator.run_all(accounts()).await;

    assert_eq!(fleet.sessions.len(), 3);
    assert_eq!(fleet.failed_sessions(), 1);
    assert_eq!(fleet.total_topics(), 4);
    assert_eq!(fleet.total_posts(), 4);

    // Reports come back in account order, with masked identities
    assert_eq!(fleet.sessions[0].identity.as_str(), "ali***********com");
    assert_eq!(fleet.sessions[1].identity.as_str(), "b*b");
    assert!(fleet.sessions[1].failure.is_some());
    assert_eq!(fleet.sessions[1].topics_visited, 0);
    assert!(fleet
        .sessions
        .iter()
        .all(|s| s.phase == SessionPhase::Closed));

    let log = log.lock().unwrap();
    assert_eq!(log.launches, 3);
    assert_eq!(log.quits, 3);
}

#[tokio::test]
async fn test_fleet_keeps_stats_of_panicked_session() {
    let launcher = ScriptedLauncher::new().panicking_on("https://forum.example.com/t/second/2");
    let log = launcher.log();
    let coordinator = FleetCoordinator::new(
        Arc::new(launcher),
        Arc::new(FakeAuthenticator::default()),
        Arc::new(FakeSource::with(two_topics())),
        quick_policy(),
    );

    let fleet = coordinator
        .run_all(vec![Account::new("alice", "pw")])
        .await;

    assert_eq!(fleet.sessions.len(), 1);
    let session = &fleet.sessions[0];
    assert_eq!(session.identity.as_str(), "a***e");
    assert_eq!(session.phase, SessionPhase::Closed);
    assert!(session
        .failure
        .as_deref()
        .unwrap()
        .starts_with("session panicked: scripted crash"));

    // Work done before the crash is still reported
    assert_eq!(session.topics_visited, 1);
    assert_eq!(session.posts_visited, 2);

    assert_eq!(log.lock().unwrap().quits, 1);
}

#[tokio::test]
async fn test_fleet_with_no_accounts() {
    let coordinator = FleetCoordinator::new(
        Arc::new(ScriptedLauncher::new()),
        Arc::new(FakeAuthenticator::default()),
        Arc::new(FakeSource::with(two_topics())),
        quick_policy(),
    );

    let fleet = coordinator.run_all(Vec::new()).await;

    assert!(fleet.sessions.is_empty());
    assert_eq!(fleet.total_topics(), 0);
}

#[tokio::test]
async fn test_fleet_reads_worklist_from_feed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let feed = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel>
<title>Latest topics</title>
<link>{base}/latest</link>
<description>Latest topics</description>
<item>
  <title>Welcome</title>
  <link>{base}/t/welcome/7</link>
  <description><![CDATA[<p><small>2 个帖子 - 1 位参与者</small></p>]]></description>
</item>
<item>
  <title>Rules</title>
  <link>{base}/t/rules/8</link>
  <description><![CDATA[<p><small>1 个帖子 - 1 位参与者</small></p>]]></description>
</item>
</channel></rss>"#,
        base = base_url
    );

    Mock::given(method("GET"))
        .and(path("/latest.rss"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(feed)
                .insert_header("content-type", "application/rss+xml"),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let source = RssWorklistSource::new(format!("{}/latest.rss", base_url), FeedConfig::default())
        .expect("Failed to build feed client");
    let launcher = ScriptedLauncher::new();
    let log = launcher.log();
    let coordinator = FleetCoordinator::new(
        Arc::new(launcher),
        Arc::new(FakeAuthenticator::default()),
        Arc::new(source),
        quick_policy(),
    );

    let fleet = coordinator
        .run_all(vec![Account::new("alice", "pw"), Account::new("bob", "pw")])
        .await;

    assert_eq!(fleet.failed_sessions(), 0);
    assert_eq!(fleet.total_topics(), 4);
    assert_eq!(fleet.total_posts(), 2);

    let log = log.lock().unwrap();
    assert!(log
        .navigations
        .contains(&format!("{}/t/welcome/7/2", base_url)));
    assert_eq!(log.quits, 2);
}
