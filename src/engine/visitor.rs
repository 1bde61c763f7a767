//! Single navigation attempt
//!
//! The visitor never retries; what to do with a failed attempt is up to the
//! traverser.

use crate::browser::PageDriver;
use crate::state::VisitOutcome;
use crate::DriverError;
use std::time::Duration;

/// Navigates to a page and waits for it to render
#[derive(Debug, Clone)]
pub struct PageVisitor {
    ready_selector: String,
    timeout: Duration,
}

impl PageVisitor {
    pub fn new(ready_selector: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ready_selector: ready_selector.into(),
            timeout,
        }
    }

    /// Makes one attempt at `url`
    ///
    /// | driver result | outcome |
    /// |---------------|---------|
    /// | ready selector found | `Success` |
    /// | readiness wait expired | `Timeout` |
    /// | any other fault | `TransientError` |
    pub async fn visit(&self, driver: &mut dyn PageDriver, url: &str) -> VisitOutcome {
        if let Err(e) = driver.navigate(url).await {
            return classify(e);
        }

        match driver.wait_ready(&self.ready_selector, self.timeout).await {
            Ok(()) => VisitOutcome::Success,
            Err(e) => classify(e),
        }
    }
}

fn classify(error: DriverError) -> VisitOutcome {
    match error {
        DriverError::Timeout { .. } => VisitOutcome::Timeout,
        other => VisitOutcome::TransientError(other.to_string()),
    }
}
