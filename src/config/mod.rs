//! Configuration module for Forum-Rounds
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and resolving the account list.
//!
//! # Example
//!
//! ```no_run
//! use forum_rounds::config::{load_accounts, load_config, DEFAULT_ACCOUNTS_VAR};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("rounds.toml")).unwrap();
//! let accounts = load_accounts(&config.accounts, DEFAULT_ACCOUNTS_VAR).unwrap();
//! println!("{} accounts will visit {}", accounts.len(), config.site.feed_url);
//! ```

mod accounts;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Account, BrowserConfig, Config, FeedConfig, LoggingConfig, LoginConfig, SiteConfig,
    TopicFailurePolicy, TraversalConfig,
};

// Re-export parser functions
pub use accounts::{accounts_from_json, load_accounts, resolve_accounts, DEFAULT_ACCOUNTS_VAR};
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate_accounts;
