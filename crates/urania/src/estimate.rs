//! Rough token counts for a request, computed without running derivation.

use crate::bodies::Body;
use crate::config::EngineConfig;
use crate::input::types::{NATAL_SLOTS, TRANSIT_SLOTS};
use crate::input::AnalysisRequest;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::ops::Range;

const CHARS_PER_TOKEN: usize = 4;

// Approximate rendered cost of each summary item
const METADATA_TOKENS: usize = 60;
const PLANET_TOKENS: usize = 45;
const HOUSE_TOKENS: usize = 30;
const ASPECT_TOKENS: usize = 45;
const RETROGRADE_TOKENS: usize = 40;
const SIGN_CHANGE_TOKENS: usize = 25;

/// Typical number of house activations per planet over a year.
const HOUSES_PER_PLANET: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEstimate {
    pub input_tokens: usize,
    /// Upper bound for the reduced summary, from the caps alone
    pub reduced_output_tokens: usize,
    /// Ballpark for the full-fidelity dump
    pub full_output_tokens: usize,
}

fn bodies_in(data: &[Value], slots: Range<usize>) -> BTreeSet<Body> {
    data.iter()
        .take(slots.end)
        .skip(slots.start)
        .filter_map(|v| v.get("name").and_then(Value::as_str))
        .filter_map(Body::from_name)
        .collect()
}

pub fn estimate_tokens(request: &AnalysisRequest, config: &EngineConfig) -> TokenEstimate {
    let input_chars = serde_json::to_vec(request)
        .map(|bytes| bytes.len())
        .unwrap_or_default();

    let first = request.samples.first().map(|s| s.data.as_slice()).unwrap_or_default();
    let planets = bodies_in(first, TRANSIT_SLOTS)
        .into_iter()
        .filter(|b| !b.is_angle())
        .count();
    let natal_points = bodies_in(first, NATAL_SLOTS).len();

    let caps = &config.caps;
    let kept_planets = planets.min(caps.max_planets);
    let reduced_output_tokens = METADATA_TOKENS
        + kept_planets
            * (PLANET_TOKENS
                + caps.max_houses * HOUSE_TOKENS
                + caps.max_aspects * ASPECT_TOKENS
                + caps.max_retrogrades * RETROGRADE_TOKENS)
        + kept_planets.min(caps.max_sign_changes) * SIGN_CHANGE_TOKENS;

    let full_output_tokens = METADATA_TOKENS
        + planets
            * (PLANET_TOKENS
                + HOUSES_PER_PLANET * HOUSE_TOKENS
                + natal_points * ASPECT_TOKENS
                + RETROGRADE_TOKENS
                + SIGN_CHANGE_TOKENS);

    TokenEstimate {
        input_tokens: input_chars.div_ceil(CHARS_PER_TOKEN),
        reduced_output_tokens,
        full_output_tokens,
    }
}
