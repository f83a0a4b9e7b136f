//! Projected sign ingress from the last known position.

use crate::bodies::Body;
use crate::ephemeris::PositionSample;
use crate::zodiac::{degree_in_sign, Sign, SIGN_SPAN};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Projections further out than this are treated as indeterminate.
pub const MAX_PROJECTION_DAYS: f64 = 36_525.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Projection {
    Projected {
        ingress: DateTime<Utc>,
        days_remaining: f64,
    },
    /// Planet is (near) stationary; no meaningful date can be projected.
    Indeterminate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignChangeEvent {
    pub planet: Body,
    pub current_sign: Sign,
    pub next_sign: Sign,
    /// Degrees left before the boundary in the direction of motion
    pub degrees_remaining: f64,
    pub projection: Projection,
}

impl SignChangeEvent {
    pub fn ingress(&self) -> Option<DateTime<Utc>> {
        match self.projection {
            Projection::Projected { ingress, .. } => Some(ingress),
            Projection::Indeterminate => None,
        }
    }
}

/// Project the next ingress from the last sample, using the mean speed of
/// the trailing `speed_samples` samples. Retrograde motion projects back
/// into the previous sign.
pub fn project_sign_change(
    planet: Body,
    samples: &[PositionSample],
    speed_samples: usize,
    stationary_speed: f64,
) -> Option<SignChangeEvent> {
    let last = samples.last()?;
    let trailing = &samples[samples.len().saturating_sub(speed_samples.max(1))..];
    let mean_speed = trailing.iter().map(|s| s.speed).sum::<f64>() / trailing.len() as f64;

    let offset = degree_in_sign(last.longitude);
    let (next_sign, degrees_remaining) = if mean_speed < 0.0 {
        (last.sign.previous(), offset)
    } else {
        (last.sign.next(), SIGN_SPAN - offset)
    };

    let projection = if mean_speed.abs() < stationary_speed {
        Projection::Indeterminate
    } else {
        let days = degrees_remaining / mean_speed.abs();
        if days.is_finite() && days <= MAX_PROJECTION_DAYS {
            let ingress = last.timestamp + Duration::seconds((days * 86_400.0).round() as i64);
            Projection::Projected {
                ingress,
                days_remaining: days,
            }
        } else {
            Projection::Indeterminate
        }
    };

    Some(SignChangeEvent {
        planet,
        current_sign: last.sign,
        next_sign,
        degrees_remaining,
        projection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(longitude: f64, speed: f64) -> PositionSample {
        PositionSample {
            body: Body::Uranus,
            longitude,
            sign: Sign::from_longitude(longitude),
            speed,
            retrograde: speed < 0.0,
            timestamp: Utc.with_ymd_and_hms(2025, 7, 7, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn direct_motion_projects_forward() {
        let event = project_sign_change(Body::Uranus, &[at(88.0, 0.5)], 5, 0.001).unwrap();
        assert_eq!(event.current_sign, Sign::Gemini);
        assert_eq!(event.next_sign, Sign::Cancer);
        assert!((event.degrees_remaining - 2.0).abs() < 1e-9);
        match event.projection {
            Projection::Projected { days_remaining, ingress } => {
                assert!((days_remaining - 4.0).abs() < 1e-9);
                assert_eq!(ingress, Utc.with_ymd_and_hms(2025, 7, 11, 0, 0, 0).unwrap());
            }
            Projection::Indeterminate => panic!("expected a projection"),
        }
    }

    #[test]
    fn retrograde_motion_projects_backward() {
        let event = project_sign_change(Body::Uranus, &[at(61.0, -0.25)], 5, 0.001).unwrap();
        assert_eq!(event.next_sign, Sign::Taurus);
        assert_eq!(event.ingress(), Some(Utc.with_ymd_and_hms(2025, 7, 11, 0, 0, 0).unwrap()));
    }

    #[test]
    fn stationary_planet_is_indeterminate() {
        let event = project_sign_change(Body::Neptune, &[at(2.0, 0.0001)], 5, 0.001).unwrap();
        assert_eq!(event.projection, Projection::Indeterminate);
        assert_eq!(event.ingress(), None);
    }

    #[test]
    fn averages_trailing_samples() {
        let samples = [at(10.0, 9.0), at(10.0, 1.0), at(10.0, 1.0)];
        let event = project_sign_change(Body::Mars, &samples, 2, 0.001).unwrap();
        match event.projection {
            Projection::Projected { days_remaining, .. } => assert!((days_remaining - 20.0).abs() < 1e-9),
            Projection::Indeterminate => panic!("expected a projection"),
        }
    }

    #[test]
    fn empty_series_has_no_event() {
        assert!(project_sign_change(Body::Mars, &[], 5, 0.001).is_none());
    }
}
