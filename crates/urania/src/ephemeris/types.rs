use crate::bodies::Body;
use crate::zodiac::{degree_in_sign, Sign};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One body's resolved position at one sample instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub body: Body,
    /// Longitude in degrees (0-360)
    pub longitude: f64,
    /// Sign derived from the longitude
    pub sign: Sign,
    /// Speed in longitude (degrees per day, signed)
    pub speed: f64,
    /// Retrograde flag as delivered by the ephemeris
    pub retrograde: bool,
    pub timestamp: DateTime<Utc>,
}

impl PositionSample {
    pub fn degree_in_sign(&self) -> f64 {
        degree_in_sign(self.longitude)
    }
}
