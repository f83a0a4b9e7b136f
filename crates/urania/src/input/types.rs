use serde::{Deserialize, Serialize};

/// Minimum elements in one sample array: 11 transiting bodies, 11 natal
/// bodies, then the natal house block.
pub const REQUIRED_ELEMENTS: usize = 23;
pub const TRANSIT_SLOTS: std::ops::Range<usize> = 0..11;
pub const NATAL_SLOTS: std::ops::Range<usize> = 11..22;
pub const HOUSES_SLOT: usize = 22;

/// An analysis request: the sampled series plus optional anchors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub samples: Vec<RawSnapshot>,
    /// Start of the analysis window (defaults to the earliest sample)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_start: Option<String>,
    /// Timestamp reported in the summary metadata (defaults to the window start)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
}

/// One time-sampled snapshot exactly as the caller sent it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSnapshot {
    pub timestamp: String,
    pub data: Vec<serde_json::Value>,
}

/// Body element of a snapshot array.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawBody {
    pub name: String,
    pub full_degree: f64,
    pub speed: f64,
    #[serde(default)]
    pub is_retro: Option<RetroFlag>,
    #[serde(default)]
    pub house: Option<i64>,
}

/// `isRetro` arrives either as a JSON bool or as "true"/"false".
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RetroFlag {
    Bool(bool),
    Text(String),
}

impl RetroFlag {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RetroFlag::Bool(b) => Some(*b),
            RetroFlag::Text(s) => match s.trim().to_lowercase().as_str() {
                "true" | "sim" | "yes" => Some(true),
                "false" | "não" | "nao" | "no" => Some(false),
                _ => None,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawHouses {
    pub houses: Vec<RawCusp>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawCusp {
    pub house: i64,
    /// Absolute cusp longitude
    pub degree: f64,
}
