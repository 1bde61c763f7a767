//! Output module for Forum-Rounds
//!
//! This module handles everything that is only about presentation:
//! - Masking account identifiers for logs
//! - Session and fleet summaries
//! - The fixed-offset clock used for log timestamps

mod mask;
mod summary;
mod timer;

pub use mask::{mask_identity, MaskedIdentity};
pub use summary::{print_fleet_summary, render_session_summary};
pub use timer::OffsetTimer;
