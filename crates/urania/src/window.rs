//! The analysis window and how derived intervals relate to it.

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

/// Half-open analysis interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl AnalysisWindow {
    /// Window of `months` calendar months starting at `start`.
    ///
    /// Returns `None` when the end date falls outside chrono's range.
    pub fn months_from(start: DateTime<Utc>, months: u32) -> Option<Self> {
        let end = start.checked_add_months(Months::new(months))?;
        Some(Self { start, end })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }

    /// Clip `[start, end]` to the window. `None` when nothing of it remains.
    pub fn clip(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Option<(DateTime<Utc>, DateTime<Utc>, WindowSpan)> {
        let clipped_start = start.max(self.start);
        let clipped_end = end.min(self.end);
        if clipped_end <= clipped_start {
            return None;
        }
        let span = WindowSpan::from_flags(start < self.start, end > self.end);
        Some((clipped_start, clipped_end, span))
    }
}

/// Whether an interval's reported boundaries are its real ones or were cut
/// at the edge of the window (or of the available samples).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowSpan {
    Contained,
    ClippedStart,
    ClippedEnd,
    ClippedBoth,
}

impl WindowSpan {
    pub fn from_flags(clipped_start: bool, clipped_end: bool) -> Self {
        match (clipped_start, clipped_end) {
            (false, false) => WindowSpan::Contained,
            (true, false) => WindowSpan::ClippedStart,
            (false, true) => WindowSpan::ClippedEnd,
            (true, true) => WindowSpan::ClippedBoth,
        }
    }

    pub fn is_open_ended(self) -> bool {
        matches!(self, WindowSpan::ClippedEnd | WindowSpan::ClippedBoth)
    }
}
