//! Page driver seam
//!
//! The engine talks to the browser only through [`PageDriver`]. Each session
//! owns one driver inside a [`DriverHandle`]; releasing the handle quits the
//! browser exactly once, however many times release is requested.

use crate::output::MaskedIdentity;
use crate::DriverError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};

/// One browser page
#[async_trait]
pub trait PageDriver: Send {
    /// Starts loading `url`
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError>;

    /// Blocks until `selector` matches, or fails with [`DriverError::Timeout`]
    async fn wait_ready(&mut self, selector: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Reloads the current page
    async fn refresh(&mut self) -> Result<(), DriverError>;

    /// Waits for `selector` and clicks it
    async fn click(&mut self, selector: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Waits for `selector` and types `text` into it
    async fn fill(&mut self, selector: &str, text: &str, timeout: Duration)
        -> Result<(), DriverError>;

    /// Shuts the browser down
    async fn quit(&mut self) -> Result<(), DriverError>;
}

/// Creates a fresh driver for each session
#[async_trait]
pub trait DriverLauncher: Send + Sync {
    async fn launch(&self, identity: &MaskedIdentity) -> Result<Box<dyn PageDriver>, DriverError>;
}

/// A session's exclusively owned driver slot
///
/// Clones refer to the same slot, so the fleet can keep a clone as a
/// safety net and release whatever a failed session left behind.
#[derive(Clone, Default)]
pub struct DriverHandle {
    slot: Arc<Mutex<Option<Box<dyn PageDriver>>>>,
}

impl DriverHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts a launched driver into the slot
    pub async fn install(&self, driver: Box<dyn PageDriver>) {
        let mut slot = self.slot.lock().await;
        if slot.replace(driver).is_some() {
            tracing::warn!("Replaced a browser that was never released");
        }
    }

    /// Locks the slot for exclusive use; `None` inside means released or never launched
    pub async fn lock(&self) -> MutexGuard<'_, Option<Box<dyn PageDriver>>> {
        self.slot.lock().await
    }

    /// Returns true while a driver is installed and not yet released
    pub async fn is_open(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    /// Quits and drops the driver if one is still installed
    ///
    /// Returns true only for the call that actually released it.
    pub async fn release(&self) -> bool {
        let driver = self.slot.lock().await.take();

        match driver {
            Some(mut driver) => {
                if let Err(e) = driver.quit().await {
                    tracing::warn!("Browser did not quit cleanly: {}", e);
                }
                true
            }
            None => false,
        }
    }
}
