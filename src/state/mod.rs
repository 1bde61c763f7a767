//! State module for tracking session progress
//!
//! # Components
//!
//! - `SessionPhase`: Lifecycle of one account's session (created through closed)
//! - `VisitState`: Retry state of a single page visit
//! - `SessionStats`: Monotonic per-session visit counters

mod session_phase;
mod stats;
mod visit_state;

// Re-export main types
pub use session_phase::SessionPhase;
pub use stats::SessionStats;
pub use visit_state::{VisitOutcome, VisitState};
