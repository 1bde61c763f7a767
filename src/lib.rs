//! Forum-Rounds: a multi-account topic visitor
//!
//! This crate logs a set of accounts into a discussion forum, reads the
//! latest topics from the forum's syndication feed, and visits every topic
//! page and reply page for each account, retrying pages that fail to load.
//! Each account runs as its own concurrent session.

pub mod browser;
pub mod config;
pub mod engine;
pub mod feed;
pub mod output;
pub mod state;

use std::time::Duration;
use thiserror::Error;

/// Main error type for Forum-Rounds operations
#[derive(Debug, Error)]
pub enum RoundsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Browser error: {0}")]
    Driver(#[from] DriverError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid account list in ${var}: {source}")]
    Accounts {
        var: String,
        source: serde_json::Error,
    },
}

/// Errors raised while fetching or parsing the topic feed
///
/// Any of these fails the whole fetch; no partial worklist is produced.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Feed request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Malformed feed: {0}")]
    Parse(String),

    #[error("Feed item {index} has no {field}")]
    MissingField { index: usize, field: &'static str },

    #[error("Could not extract reply count for {link} from description {description:?}")]
    ReplyCount { link: String, description: String },
}

/// Page driver errors
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Timed out after {timeout:?} waiting for {selector}")]
    Timeout { selector: String, timeout: Duration },

    #[error("Element {selector} failed: {message}")]
    Element { selector: String, message: String },

    #[error("Browser command failed: {0}")]
    Command(String),
}

/// Session-terminating errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Browser launch failed: {0}")]
    Launch(#[source] DriverError),

    #[error("Login failed: {reason}")]
    Login { reason: String },

    #[error("Worklist unavailable: {0}")]
    Worklist(#[from] FeedError),

    #[error("Invalid session transition: {from} -> {to}")]
    InvalidTransition {
        from: state::SessionPhase,
        to: state::SessionPhase,
    },

    #[error("Browser handle was already released")]
    DriverReleased,
}

/// Result type alias for Forum-Rounds operations
pub type Result<T> = std::result::Result<T, RoundsError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for feed operations
pub type FeedResult<T> = std::result::Result<T, FeedError>;

/// Result type alias for driver operations
pub type DriverResult<T> = std::result::Result<T, DriverError>;

// Re-export commonly used types
pub use config::{Account, Config};
pub use engine::{FleetCoordinator, FleetReport, SessionReport, SessionRunner, TopicTraverser};
pub use feed::{WorklistEntry, WorklistSource};
pub use output::{mask_identity, MaskedIdentity};
pub use state::{SessionPhase, SessionStats, VisitState};
