//! Relevance scoring and event ranking.

use crate::aspects::Aspect;
use crate::bodies::Body;
use crate::config::{EngineConfig, WeightTable};
use crate::transits::{HouseActivation, PlanetTransits, RetrogradationPeriod};
use chrono::{DateTime, Utc};
use std::cmp::Reverse;

pub struct RelevanceScorer<'a> {
    weights: &'a WeightTable,
    retrograde_bonus: u32,
}

impl<'a> RelevanceScorer<'a> {
    pub fn new(weights: &'a WeightTable, retrograde_bonus: u32) -> Self {
        Self {
            weights,
            retrograde_bonus,
        }
    }

    pub fn from_config(config: &'a EngineConfig) -> Self {
        Self::new(&config.weights, config.retrograde_bonus)
    }

    /// Base weight + every aspect intensity + a bonus when retrograde in the window.
    pub fn planet_score(&self, transits: &PlanetTransits) -> u32 {
        let aspects = transits
            .aspects
            .iter()
            .fold(0u32, |total, a| total.saturating_add(a.intensity));
        let bonus = if transits.retrogrades.is_empty() {
            0
        } else {
            self.retrograde_bonus
        };
        self.weights
            .weight(transits.planet)
            .saturating_add(aspects)
            .saturating_add(bonus)
    }
}

/// Sort key for derived events. Ascending order is rank order: higher parent
/// score, then higher own weight, then earlier start, then natal point, then
/// a per-kind discriminator so the order is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EventRank {
    planet_score: Reverse<u32>,
    weight: Reverse<i64>,
    starts: DateTime<Utc>,
    natal_point: Option<Body>,
    discriminator: u8,
}

impl EventRank {
    pub fn aspect(planet_score: u32, aspect: &Aspect) -> Self {
        Self {
            planet_score: Reverse(planet_score),
            weight: Reverse(aspect.intensity as i64),
            starts: aspect.start,
            natal_point: Some(aspect.natal_point),
            discriminator: aspect.kind as u8,
        }
    }

    /// Longer stays rank first.
    pub fn house(planet_score: u32, activation: &HouseActivation) -> Self {
        Self {
            planet_score: Reverse(planet_score),
            weight: Reverse((activation.exit - activation.entry).num_seconds()),
            starts: activation.entry,
            natal_point: None,
            discriminator: activation.house,
        }
    }

    pub fn retrograde(planet_score: u32, period: &RetrogradationPeriod) -> Self {
        Self {
            planet_score: Reverse(planet_score),
            weight: Reverse((period.end - period.start).num_seconds()),
            starts: period.start,
            natal_point: None,
            discriminator: 0,
        }
    }
}
