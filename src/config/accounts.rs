//! Account sources
//!
//! Accounts come from `[[account]]` tables in the config file or from an
//! environment variable holding a JSON array of `{username, password}`
//! objects. When the variable is set it replaces the file's list.

use crate::config::types::Account;
use crate::config::validation::validate_accounts;
use crate::ConfigError;

/// Environment variable read when no other name is given
pub const DEFAULT_ACCOUNTS_VAR: &str = "ACCOUNTS_JSON";

/// Parses a JSON account list
pub fn accounts_from_json(var: &str, json: &str) -> Result<Vec<Account>, ConfigError> {
    serde_json::from_str(json).map_err(|source| ConfigError::Accounts {
        var: var.to_string(),
        source,
    })
}

/// Picks the effective account list
///
/// `env_value` is the raw content of `var`, if set. The result is validated
/// and must not be empty.
pub fn resolve_accounts(
    file_accounts: &[Account],
    var: &str,
    env_value: Option<&str>,
) -> Result<Vec<Account>, ConfigError> {
    let accounts = match env_value {
        Some(json) if !json.trim().is_empty() => {
            tracing::debug!("Reading accounts from ${}", var);
            accounts_from_json(var, json)?
        }
        _ => file_accounts.to_vec(),
    };

    if accounts.is_empty() {
        return Err(ConfigError::Validation(format!(
            "no accounts configured: add [[account]] entries or set ${}",
            var
        )));
    }

    validate_accounts(&accounts)?;
    Ok(accounts)
}

/// Resolves accounts against the process environment
///
/// A `.env` file in the working directory is loaded first if present.
pub fn load_accounts(file_accounts: &[Account], var: &str) -> Result<Vec<Account>, ConfigError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!("Ignoring unreadable .env file: {}", e);
        }
    }

    let env_value = std::env::var(var).ok();
    resolve_accounts(file_accounts, var, env_value.as_deref())
}
