//! Account login

use crate::browser::PageDriver;
use crate::config::{Account, LoginConfig};
use crate::SessionError;
use async_trait::async_trait;

/// Brings a page into a logged-in state for one account
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Any failure, including a step timing out, is fatal for the session
    async fn login(&self, driver: &mut dyn PageDriver, account: &Account)
        -> Result<(), SessionError>;
}

/// Logs in through the forum's login form
pub struct FormLogin {
    home_url: String,
    config: LoginConfig,
}

impl FormLogin {
    pub fn new(home_url: impl Into<String>, config: LoginConfig) -> Self {
        Self {
            home_url: home_url.into(),
            config,
        }
    }
}

#[async_trait]
impl Authenticator for FormLogin {
    async fn login(
        &self,
        driver: &mut dyn PageDriver,
        account: &Account,
    ) -> Result<(), SessionError> {
        let timeout = self.config.timeout();
        let failed = |step: &str, e: crate::DriverError| SessionError::Login {
            reason: format!("{}: {}", step, e),
        };

        driver
            .navigate(&self.home_url)
            .await
            .map_err(|e| failed("open home page", e))?;

        tracing::info!("Opening login form and entering credentials");
        driver
            .click(&self.config.open_button, timeout)
            .await
            .map_err(|e| failed("open login form", e))?;
        driver
            .fill(&self.config.username_field, &account.username, timeout)
            .await
            .map_err(|e| failed("enter username", e))?;
        driver
            .fill(&self.config.password_field, &account.password, timeout)
            .await
            .map_err(|e| failed("enter password", e))?;
        driver
            .click(&self.config.submit_button, timeout)
            .await
            .map_err(|e| failed("submit login form", e))?;
        driver
            .wait_ready(&self.config.logged_in_marker, timeout)
            .await
            .map_err(|e| failed("confirm login", e))?;

        Ok(())
    }
}
