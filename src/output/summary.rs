//! Session and fleet summaries

use crate::engine::{FleetReport, SessionReport};

/// Renders the end-of-session summary logged by every session
pub fn render_session_summary(report: &SessionReport) -> String {
    let mut summary = format!(
        "[{}] Run complete:\n - elapsed: {:.2} s\n - topics visited: {}\n - posts visited: {}",
        report.identity,
        report.elapsed.as_secs_f64(),
        report.topics_visited,
        report.posts_visited
    );

    if report.items_exhausted > 0 {
        summary.push_str(&format!("\n - pages skipped: {}", report.items_exhausted));
    }

    if let Some(ref failure) = report.failure {
        summary.push_str(&format!("\n - ended early: {}", failure));
    }

    summary
}

/// Prints the fleet summary to stdout
pub fn print_fleet_summary(fleet: &FleetReport) {
    println!("=== Fleet Summary ===\n");

    println!(
        "  {:<20} {:>8} {:>8} {:>8} {:>10}  {}",
        "Account", "Topics", "Posts", "Skipped", "Elapsed", "Status"
    );
    for session in &fleet.sessions {
        let status = match session.failure {
            Some(ref failure) => format!("failed: {}", failure),
            None => "ok".to_string(),
        };
        println!(
            "  {:<20} {:>8} {:>8} {:>8} {:>9.1}s  {}",
            session.identity.as_str(),
            session.topics_visited,
            session.posts_visited,
            session.items_exhausted,
            session.elapsed.as_secs_f64(),
            status
        );
    }
    println!();

    println!(
        "Totals: {} topics, {} posts across {} sessions ({} failed)",
        fleet.total_topics(),
        fleet.total_posts(),
        fleet.sessions.len(),
        fleet.failed_sessions()
    );
}
