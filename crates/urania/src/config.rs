//! Engine configuration.
//!
//! A single immutable [`EngineConfig`] value is handed to the engine at
//! construction. Analyses with different caps (the reduced summary versus the
//! full-fidelity dump) share the same derivation code and only differ in the
//! value passed in.

use crate::bodies::Body;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("orb must be within (0, 30) degrees, got {0}")]
    InvalidOrb(f64),
    #[error("window_months must be at least 1")]
    EmptyWindow,
    #[error("speed_average_samples must be at least 1")]
    NoSpeedSamples,
    #[error("stationary_speed must be positive and finite, got {0}")]
    InvalidStationarySpeed(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Aspect orb tolerance in degrees
    pub orb: f64,
    /// Length of the analysis window in calendar months
    pub window_months: u32,
    /// Planets scoring below this are dropped by the reducer
    pub min_relevance: u32,
    /// Added to a planet's relevance when it is retrograde inside the window
    pub retrograde_bonus: u32,
    /// Average speed (deg/day) below which an ingress projection is indeterminate
    pub stationary_speed: f64,
    /// Trailing samples averaged for the ingress projection speed
    pub speed_average_samples: usize,
    pub caps: ReductionCaps,
    pub weights: WeightTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            orb: 5.0,
            window_months: 12,
            min_relevance: 5,
            retrograde_bonus: 3,
            stationary_speed: 0.001,
            speed_average_samples: 5,
            caps: ReductionCaps::default(),
            weights: WeightTable::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.orb > 0.0 && self.orb < 30.0) {
            return Err(ConfigError::InvalidOrb(self.orb));
        }
        if self.window_months == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        if self.speed_average_samples == 0 {
            return Err(ConfigError::NoSpeedSamples);
        }
        if !(self.stationary_speed.is_finite() && self.stationary_speed > 0.0) {
            return Err(ConfigError::InvalidStationarySpeed(self.stationary_speed));
        }
        Ok(())
    }

    pub fn analysis_period_label(&self) -> String {
        format!("{} months", self.window_months)
    }
}

/// Nested caps applied by the output reducer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReductionCaps {
    pub max_planets: usize,
    pub max_houses: usize,
    pub max_aspects: usize,
    pub min_aspect_intensity: u32,
    pub max_retrogrades: usize,
    pub max_sign_changes: usize,
}

impl Default for ReductionCaps {
    fn default() -> Self {
        Self {
            max_planets: 6,
            max_houses: 3,
            max_aspects: 5,
            min_aspect_intensity: 6,
            max_retrogrades: 2,
            max_sign_changes: 3,
        }
    }
}

/// Base relevance weight per body. Slow outer planets and the
/// eclipse-relevant lights outrank the fast inner planets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightTable(BTreeMap<Body, u32>);

/// Weight for bodies missing from a user-supplied table.
pub const FALLBACK_WEIGHT: u32 = 1;

impl WeightTable {
    pub fn new(weights: BTreeMap<Body, u32>) -> Self {
        Self(weights)
    }

    pub fn weight(&self, body: Body) -> u32 {
        self.0.get(&body).copied().unwrap_or(FALLBACK_WEIGHT)
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self(BTreeMap::from([
            (Body::Pluto, 10),
            (Body::Neptune, 9),
            (Body::Uranus, 9),
            (Body::Saturn, 8),
            (Body::Jupiter, 7),
            (Body::NorthNode, 6),
            (Body::Chiron, 5),
            (Body::Sun, 4),
            (Body::Mars, 4),
            (Body::Moon, 3),
            (Body::Venus, 2),
            (Body::Mercury, 2),
        ]))
    }
}
