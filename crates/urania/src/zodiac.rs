//! Tropical zodiac signs.

use serde::{Deserialize, Serialize};

pub const SIGN_SPAN: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

const SIGN_ORDER: [Sign; 12] = [
    Sign::Aries,
    Sign::Taurus,
    Sign::Gemini,
    Sign::Cancer,
    Sign::Leo,
    Sign::Virgo,
    Sign::Libra,
    Sign::Scorpio,
    Sign::Sagittarius,
    Sign::Capricorn,
    Sign::Aquarius,
    Sign::Pisces,
];

impl Sign {
    /// Sign containing an ecliptic longitude (any real value, normalized first).
    pub fn from_longitude(longitude: f64) -> Sign {
        let lon = normalize_longitude(longitude);
        let index = (lon / SIGN_SPAN).floor() as usize;
        SIGN_ORDER[index % 12]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Sign {
        SIGN_ORDER[(self.index() + 1) % 12]
    }

    pub fn previous(self) -> Sign {
        SIGN_ORDER[(self.index() + 11) % 12]
    }
}

/// Normalize a longitude into `[0, 360)`.
pub fn normalize_longitude(longitude: f64) -> f64 {
    let lon = longitude.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if lon >= 360.0 {
        0.0
    } else {
        lon
    }
}

/// Degrees already travelled inside the current sign, `[0, 30)`.
pub fn degree_in_sign(longitude: f64) -> f64 {
    normalize_longitude(longitude) % SIGN_SPAN
}
