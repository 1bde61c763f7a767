//! Log timestamps at a fixed UTC offset

use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::fmt;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders the wall clock in a fixed time zone, independent of the host's
#[derive(Debug, Clone, Copy)]
pub struct OffsetTimer {
    offset: FixedOffset,
}

impl OffsetTimer {
    /// Returns `None` when the offset is outside ±23 hours
    pub fn from_hours(hours: i32) -> Option<Self> {
        FixedOffset::east_opt(hours * 3600).map(|offset| Self { offset })
    }

    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    pub fn render(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.offset)
            .format(TIMESTAMP_FORMAT)
            .to_string()
    }
}

impl FormatTime for OffsetTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", self.render(Utc::now()))
    }
}
