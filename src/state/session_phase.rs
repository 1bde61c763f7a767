//! Session lifecycle phases
//!
//! A session moves forward only. Any phase before `Summarizing` may jump
//! straight to `Summarizing` when a fatal error ends the session early, and
//! `Closed` is reachable only from `Summarizing`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Constructed, browser not yet in use
    Created,

    /// Logging in
    Authenticating,

    /// Visiting the worklist
    Traversing,

    /// Producing the final report
    Summarizing,

    /// Browser released; terminal
    Closed,
}

impl SessionPhase {
    /// Returns true if `next` is a legal successor of this phase
    pub fn can_advance_to(&self, next: SessionPhase) -> bool {
        use SessionPhase::*;
        matches!(
            (self, next),
            (Created, Authenticating)
                | (Created, Summarizing)
                | (Authenticating, Traversing)
                | (Authenticating, Summarizing)
                | (Traversing, Summarizing)
                | (Summarizing, Closed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Authenticating => "authenticating",
            Self::Traversing => "traversing",
            Self::Summarizing => "summarizing",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
