//! Feed module for discovering the topics to visit
//!
//! This module contains:
//! - The worklist entry type and reply-page addressing
//! - Parsing of the forum's RSS feed into a worklist
//! - The `WorklistSource` seam and its HTTP implementation

mod fetcher;
mod parser;
mod worklist;

pub use fetcher::{build_http_client, RssWorklistSource, WorklistSource};
pub use parser::parse_worklist;
pub use worklist::WorklistEntry;
