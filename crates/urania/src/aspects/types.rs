use crate::bodies::Body;
use crate::window::WindowSpan;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Major aspect types. Minor aspects are not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectKind {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
}

impl AspectKind {
    /// Most common first
    pub const ALL: [AspectKind; 5] = [
        AspectKind::Conjunction,
        AspectKind::Opposition,
        AspectKind::Trine,
        AspectKind::Square,
        AspectKind::Sextile,
    ];

    pub fn exact_angle(self) -> f64 {
        match self {
            AspectKind::Conjunction => 0.0,
            AspectKind::Sextile => 60.0,
            AspectKind::Square => 90.0,
            AspectKind::Trine => 120.0,
            AspectKind::Opposition => 180.0,
        }
    }

    /// Hard aspects outweigh the soft ones.
    pub fn base_weight(self) -> u32 {
        match self {
            AspectKind::Conjunction => 5,
            AspectKind::Opposition => 5,
            AspectKind::Square => 4,
            AspectKind::Trine => 3,
            AspectKind::Sextile => 2,
        }
    }
}

/// A contiguous run of samples during which a transiting planet holds an
/// aspect to one natal point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    pub kind: AspectKind,
    pub planet: Body,
    pub natal_point: Body,
    pub natal_house: u8,
    /// First in-orb sample
    pub start: DateTime<Utc>,
    /// Last in-orb sample
    pub end: DateTime<Utc>,
    /// Sample of closest approach
    pub exact_at: DateTime<Utc>,
    /// Deviation from the exact angle at closest approach
    pub closest_orb: f64,
    pub intensity: u32,
    pub span: WindowSpan,
}
