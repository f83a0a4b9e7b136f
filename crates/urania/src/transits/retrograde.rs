//! Retrograde segments from the speed series.

use crate::bodies::Body;
use crate::ephemeris::PositionSample;
use crate::window::{AnalysisWindow, WindowSpan};
use crate::zodiac::Sign;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrogradationPeriod {
    pub planet: Body,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Sign occupied at the retrograde station
    pub station_sign: Sign,
    /// Whether the planet backed into the sign before `station_sign`
    pub returns_to_previous_sign: bool,
    pub span: WindowSpan,
}

impl RetrogradationPeriod {
    /// Whole days between the (possibly clipped) boundaries.
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Segments start at the first sample whose speed turns negative and end at
/// the first later sample whose speed is back to non-negative.
///
/// Segments are clipped to the window and the duration is measured between
/// the clipped boundaries, not the astronomical stations. A segment already
/// retrograde at the first sample is tagged as clipped at the start. A segment
/// still retrograde at the last sample ends at that sample (or the window end,
/// if earlier) and is tagged as clipped at the end; a station on the very last
/// sample has no observed duration and yields no period.
pub fn retrogradation_periods(
    planet: Body,
    samples: &[PositionSample],
    window: &AnalysisWindow,
) -> Vec<RetrogradationPeriod> {
    let mut periods = Vec::new();
    let mut open: Option<usize> = None;

    for (i, sample) in samples.iter().enumerate() {
        let retrograde = sample.speed < 0.0;
        match open {
            None if retrograde => open = Some(i),
            Some(start) if !retrograde => {
                periods.extend(build_period(planet, samples, start, Some(i), window));
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        periods.extend(build_period(planet, samples, start, None, window));
    }
    periods
}

fn build_period(
    planet: Body,
    samples: &[PositionSample],
    start: usize,
    direct: Option<usize>,
    window: &AnalysisWindow,
) -> Option<RetrogradationPeriod> {
    let station = &samples[start];
    let last = samples.last()?;
    let (end_at, segment) = match direct {
        Some(i) => (samples[i].timestamp, &samples[start..i]),
        None => (last.timestamp.min(window.end), &samples[start..]),
    };

    let (clipped_start, clipped_end, span) = window.clip(station.timestamp, end_at)?;
    let span = WindowSpan::from_flags(
        start == 0 || matches!(span, WindowSpan::ClippedStart | WindowSpan::ClippedBoth),
        direct.is_none() || span.is_open_ended(),
    );

    let previous = station.sign.previous();
    Some(RetrogradationPeriod {
        planet,
        start: clipped_start,
        end: clipped_end,
        station_sign: station.sign,
        returns_to_previous_sign: segment.iter().any(|s| s.sign == previous),
        span,
    })
}
