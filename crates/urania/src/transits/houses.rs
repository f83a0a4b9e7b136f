//! House activations: which natal house a transiting planet occupies, and when.

use crate::bodies::Body;
use crate::ephemeris::PositionSample;
use crate::natal::NatalChart;
use crate::window::{AnalysisWindow, WindowSpan};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mean Gregorian month in days
pub const DAYS_PER_MONTH: f64 = 30.4375;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseActivation {
    pub planet: Body,
    pub house: u8,
    pub entry: DateTime<Utc>,
    pub exit: DateTime<Utc>,
    pub span: WindowSpan,
}

impl HouseActivation {
    pub fn duration_days(&self) -> i64 {
        (self.exit - self.entry).num_days()
    }

    pub fn duration_months(&self) -> f64 {
        let months = (self.exit - self.entry).num_seconds() as f64 / 86_400.0 / DAYS_PER_MONTH;
        (months * 10.0).round() / 10.0
    }
}

/// Walk the in-window samples and cut a new activation every time the house
/// changes. Each activation exits when the next one enters; the last one
/// stays open until the window end. Re-entering a house yields a new record.
pub fn house_activations(
    planet: Body,
    samples: &[PositionSample],
    chart: &NatalChart,
    window: &AnalysisWindow,
) -> Vec<HouseActivation> {
    let mut activations = Vec::new();
    // (house, entry, entered before the first sample)
    let mut current: Option<(u8, DateTime<Utc>, bool)> = None;

    for sample in samples.iter().filter(|s| window.contains(s.timestamp)) {
        let house = chart.house_of(sample.longitude);
        match current {
            None => current = Some((house, sample.timestamp, true)),
            Some((open, entry, clipped)) if open != house => {
                activations.push(HouseActivation {
                    planet,
                    house: open,
                    entry,
                    exit: sample.timestamp,
                    span: WindowSpan::from_flags(clipped, false),
                });
                current = Some((house, sample.timestamp, false));
            }
            Some(_) => {}
        }
    }

    if let Some((open, entry, clipped)) = current {
        activations.push(HouseActivation {
            planet,
            house: open,
            entry,
            exit: window.end,
            span: WindowSpan::from_flags(clipped, true),
        });
    }
    activations
}
