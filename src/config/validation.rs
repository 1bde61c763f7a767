use crate::config::types::{
    Account, Config, FeedConfig, LoggingConfig, LoginConfig, SiteConfig, TraversalConfig,
};
use crate::ConfigError;
use scraper::Selector;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_traversal_config(&config.traversal)?;
    validate_login_config(&config.login)?;
    validate_feed_config(&config.feed)?;
    validate_logging_config(&config.logging)?;
    validate_accounts(&config.accounts)?;
    Ok(())
}

/// Validates forum addresses and the readiness selector
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_web_url("home-url", &config.home_url)?;
    validate_web_url("feed-url", &config.feed_url)?;
    validate_selector("ready-selector", &config.ready_selector)?;
    Ok(())
}

/// Validates retry and pacing configuration
fn validate_traversal_config(config: &TraversalConfig) -> Result<(), ConfigError> {
    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    if config.visit_timeout_ms < 1 {
        return Err(ConfigError::Validation(
            "visit-timeout-ms must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates login selectors
fn validate_login_config(config: &LoginConfig) -> Result<(), ConfigError> {
    validate_selector("open-button", &config.open_button)?;
    validate_selector("username-field", &config.username_field)?;
    validate_selector("password-field", &config.password_field)?;
    validate_selector("submit-button", &config.submit_button)?;
    validate_selector("logged-in-marker", &config.logged_in_marker)?;

    if config.timeout_ms < 1 {
        return Err(ConfigError::Validation(
            "login timeout-ms must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates reply-count extraction settings
fn validate_feed_config(config: &FeedConfig) -> Result<(), ConfigError> {
    if config.reply_count_delimiter.trim().is_empty() {
        return Err(ConfigError::Validation(
            "reply-count-delimiter cannot be blank".to_string(),
        ));
    }

    validate_selector("count-marker", &config.count_marker)?;
    Ok(())
}

/// Validates the log clock offset
fn validate_logging_config(config: &LoggingConfig) -> Result<(), ConfigError> {
    if !(-23..=23).contains(&config.utc_offset_hours) {
        return Err(ConfigError::Validation(format!(
            "utc-offset-hours must be between -23 and 23, got {}",
            config.utc_offset_hours
        )));
    }
    Ok(())
}

/// Validates account entries
///
/// An empty list is accepted here; accounts may still arrive from the
/// environment.
pub fn validate_accounts(accounts: &[Account]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for (index, account) in accounts.iter().enumerate() {
        if account.username.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "account #{} has an empty username",
                index + 1
            )));
        }

        if account.password.is_empty() {
            return Err(ConfigError::Validation(format!(
                "account {} has an empty password",
                account.masked()
            )));
        }

        if !seen.insert(account.username.as_str()) {
            return Err(ConfigError::Validation(format!(
                "account {} is listed more than once",
                account.masked()
            )));
        }
    }

    Ok(())
}

/// Checks that a URL parses and uses http or https
fn validate_web_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", key, value, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            key, value
        )));
    }

    Ok(())
}

/// Checks that a CSS selector is non-empty and parses
fn validate_selector(key: &str, selector: &str) -> Result<(), ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", key)));
    }

    Selector::parse(selector).map_err(|e| {
        ConfigError::Validation(format!("{} '{}' is not a valid selector: {:?}", key, selector, e))
    })?;

    Ok(())
}
