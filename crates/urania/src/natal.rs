//! The natal reference chart transits are measured against.

use crate::bodies::Body;
use crate::zodiac::normalize_longitude;
use serde::{Deserialize, Serialize};

/// A natal body (or angle) that transiting planets aspect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatalPoint {
    pub body: Body,
    pub longitude: f64,
    /// Natal house (1-12)
    pub house: u8,
}

/// House cusps plus natal points. Read-only once resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatalChart {
    /// Cusp longitudes indexed by house number - 1
    cusps: [f64; 12],
    points: Vec<NatalPoint>,
}

impl NatalChart {
    /// Build a chart from cusps that describe twelve contiguous
    /// counter-clockwise arcs. Returns `None` when they do not.
    pub fn new(cusps: [f64; 12], points: Vec<NatalPoint>) -> Option<Self> {
        let cusps = cusps.map(normalize_longitude);
        let total: f64 = (0..12).map(|h| arc_length(cusps[h], cusps[(h + 1) % 12])).sum();
        if (total - 360.0).abs() > 1e-6 {
            return None;
        }
        Some(Self { cusps, points })
    }

    pub fn with_points(mut self, points: Vec<NatalPoint>) -> Self {
        self.points = points;
        self
    }

    pub fn cusps(&self) -> &[f64; 12] {
        &self.cusps
    }

    pub fn points(&self) -> &[NatalPoint] {
        &self.points
    }

    /// House (1-12) whose arc contains `longitude`: the one whose cusp was
    /// passed most recently going counter-clockwise.
    pub fn house_of(&self, longitude: f64) -> u8 {
        let lon = normalize_longitude(longitude);
        let (index, _) = self
            .cusps
            .iter()
            .map(|cusp| (lon - cusp).rem_euclid(360.0))
            .enumerate()
            .fold((0, f64::INFINITY), |best, (h, offset)| {
                if offset < best.1 {
                    (h, offset)
                } else {
                    best
                }
            });
        (index + 1) as u8
    }
}

fn arc_length(from: f64, to: f64) -> f64 {
    (to - from).rem_euclid(360.0)
}

/// Step distance between two houses in natal order (0-6).
pub fn house_distance(a: u8, b: u8) -> u8 {
    let forward = (b as i16 - a as i16).rem_euclid(12) as u8;
    forward.min(12 - forward)
}
