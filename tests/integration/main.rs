//! Integration tests for sessions and fleets
//!
//! Browsers are replaced by scripted drivers; the feed is either a fixed
//! worklist or a wiremock server serving RSS.

mod fleet_tests;
mod session_tests;
mod support;
