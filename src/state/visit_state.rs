//! Per-page retry state machine
//!
//! Each topic page or reply page starts at `Attempting(1)` and moves to
//! `Succeeded` or `Exhausted` independently of every other page.

use std::fmt;

/// Result of a single navigation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitOutcome {
    /// The readiness condition was met
    Success,

    /// The readiness wait expired
    Timeout,

    /// Navigation failed for any other reason
    TransientError(String),
}

impl VisitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for VisitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Timeout => write!(f, "timed out waiting for page"),
            Self::TransientError(message) => write!(f, "error: {}", message),
        }
    }
}

/// Where a single page is in its retry budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitState {
    /// The n-th attempt (1-based) is about to run or running
    Attempting(u32),

    /// The page loaded; counted exactly once
    Succeeded,

    /// Every attempt failed; the page is skipped
    Exhausted,
}

impl VisitState {
    /// Entry state for a new page
    pub fn start() -> Self {
        Self::Attempting(1)
    }

    /// Applies the outcome of the current attempt
    ///
    /// A failure below `max_retries` moves to the next attempt; a failure on
    /// the last attempt exhausts the page. Terminal states ignore further
    /// outcomes.
    pub fn advance(self, outcome: &VisitOutcome, max_retries: u32) -> Self {
        match self {
            Self::Attempting(_) if outcome.is_success() => Self::Succeeded,
            Self::Attempting(n) if n < max_retries => Self::Attempting(n + 1),
            Self::Attempting(_) => Self::Exhausted,
            terminal => terminal,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Attempting(_))
    }

    /// Attempt number while still attempting
    pub fn attempt(&self) -> Option<u32> {
        match self {
            Self::Attempting(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attempting(n) => write!(f, "attempting({})", n),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Exhausted => write!(f, "exhausted"),
        }
    }
}
