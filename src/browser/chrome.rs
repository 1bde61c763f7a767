//! Headless Chromium page driver
//!
//! Every session gets its own browser process with its own throwaway
//! profile directory; Chromium locks a profile while running, so sessions
//! cannot share one.

use crate::browser::{DriverLauncher, PageDriver};
use crate::config::BrowserConfig;
use crate::output::MaskedIdentity;
use crate::DriverError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures_util::StreamExt;
use std::time::Duration;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Interval between element lookups while waiting for a selector
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Launches one Chromium per session
pub struct ChromeLauncher {
    config: BrowserConfig,
}

impl ChromeLauncher {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    fn cdp_config(&self, profile: &TempDir) -> Result<CdpConfig, DriverError> {
        let mut builder = CdpConfig::builder()
            .window_size(self.config.window_width, self.config.window_height)
            .request_timeout(Duration::from_millis(self.config.launch_timeout_ms))
            .user_data_dir(profile.path())
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--mute-audio");

        if !self.config.headless {
            builder = builder.with_head();
        }

        if let Some(ref chrome_path) = self.config.chrome_path {
            builder = builder.chrome_executable(chrome_path);
        }

        builder.build().map_err(DriverError::Launch)
    }
}

#[async_trait]
impl DriverLauncher for ChromeLauncher {
    async fn launch(&self, _identity: &MaskedIdentity) -> Result<Box<dyn PageDriver>, DriverError> {
        let profile = TempDir::new()
            .map_err(|e| DriverError::Launch(format!("cannot create profile directory: {}", e)))?;
        let cdp_config = self.cdp_config(&profile)?;

        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {}", e);
                }
            }
        });

        let mut driver = ChromeDriver {
            browser,
            page: None,
            handler,
            _profile: profile,
        };

        if let Err(e) = driver.open_page(self.config.user_agent.as_deref()).await {
            if let Err(quit_error) = driver.quit().await {
                warn!("Browser did not quit cleanly: {}", quit_error);
            }
            return Err(e);
        }

        match self.config.user_agent {
            Some(ref user_agent) => info!("Browser started with User-Agent: {}", user_agent),
            None => info!("Browser started"),
        }

        Ok(Box::new(driver))
    }
}

/// A single Chromium tab driven over CDP
pub struct ChromeDriver {
    browser: Browser,
    page: Option<Page>,
    handler: JoinHandle<()>,
    _profile: TempDir,
}

impl ChromeDriver {
    /// Opens the tab every later command runs against
    async fn open_page(&mut self, user_agent: Option<&str>) -> Result<(), DriverError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| DriverError::Launch(format!("cannot open page: {}", e)))?;

        if let Some(user_agent) = user_agent {
            page.set_user_agent(SetUserAgentOverrideParams::new(user_agent))
                .await
                .map_err(|e| DriverError::Launch(format!("cannot set user agent: {}", e)))?;
        }

        self.page = Some(page);
        Ok(())
    }

    fn page(&self) -> Result<&Page, DriverError> {
        self.page
            .as_ref()
            .ok_or_else(|| DriverError::Command("browser has no open page".to_string()))
    }

    /// Polls for `selector` until it appears or `timeout` passes
    async fn wait_for_element(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Element, DriverError> {
        let page = self.page()?;

        let poll = async {
            loop {
                match page.find_element(selector).await {
                    Ok(element) => return element,
                    Err(e) => {
                        debug!("{} not present yet: {}", selector, e);
                        tokio::time::sleep(POLL_INTERVAL).await;
                    }
                }
            }
        };

        tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| DriverError::Timeout {
                selector: selector.to_string(),
                timeout,
            })
    }
}

#[async_trait]
impl PageDriver for ChromeDriver {
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.page()?
            .goto(url)
            .await
            .map(|_| ())
            .map_err(|e| DriverError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    async fn wait_ready(&mut self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        self.wait_for_element(selector, timeout).await.map(|_| ())
    }

    async fn refresh(&mut self) -> Result<(), DriverError> {
        self.page()?
            .reload()
            .await
            .map(|_| ())
            .map_err(|e| DriverError::Command(format!("reload: {}", e)))
    }

    async fn click(&mut self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        let element = self.wait_for_element(selector, timeout).await?;
        element
            .click()
            .await
            .map(|_| ())
            .map_err(|e| DriverError::Element {
                selector: selector.to_string(),
                message: e.to_string(),
            })
    }

    async fn fill(
        &mut self,
        selector: &str,
        text: &str,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        let element = self.wait_for_element(selector, timeout).await?;
        element
            .click()
            .await
            .map_err(|e| DriverError::Element {
                selector: selector.to_string(),
                message: e.to_string(),
            })?
            .type_str(text)
            .await
            .map(|_| ())
            .map_err(|e| DriverError::Element {
                selector: selector.to_string(),
                message: e.to_string(),
            })
    }

    async fn quit(&mut self) -> Result<(), DriverError> {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                debug!("Failed to close page: {}", e);
            }
        }

        let result = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| DriverError::Command(format!("close browser: {}", e)));

        if let Err(e) = self.browser.wait().await {
            warn!("Browser process did not exit cleanly: {}", e);
        }
        self.handler.abort();

        result
    }
}
