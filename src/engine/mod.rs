//! Engine module for visiting topics
//!
//! This module contains the core visiting logic:
//! - `PageVisitor`: one navigation attempt with a readiness wait
//! - `TopicTraverser`: per-page retry state machine over a worklist
//! - `SessionRunner`: one account's lifecycle from login to close
//! - `FleetCoordinator`: all accounts' sessions run concurrently

mod coordinator;
mod session;
mod traverser;
mod visitor;

pub use coordinator::{FleetCoordinator, FleetReport};
pub use session::{SessionContext, SessionReport, SessionRunner};
pub use traverser::{ItemOutcome, PageKind, TopicTraverser, TraversalPolicy};
pub use visitor::PageVisitor;
