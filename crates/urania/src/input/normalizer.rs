use crate::bodies::Body;
use crate::ephemeris::PositionSample;
use crate::input::types::{
    AnalysisRequest, RawBody, RawHouses, RawSnapshot, HOUSES_SLOT, NATAL_SLOTS,
    REQUIRED_ELEMENTS, TRANSIT_SLOTS,
};
use crate::natal::{NatalChart, NatalPoint};
use crate::zodiac::{normalize_longitude, Sign};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::debug;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Malformed input. Raised before any derivation runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("request contains no samples")]
    EmptySeries,
    #[error("sample {sample}: expected at least {required} elements, found {found}")]
    TooFewElements {
        sample: usize,
        found: usize,
        required: usize,
    },
    #[error("sample {sample}: invalid timestamp {value:?}")]
    InvalidTimestamp { sample: usize, value: String },
    #[error("invalid {field} {value:?}")]
    InvalidAnchor { field: &'static str, value: String },
    #[error("sample {sample}, element {index}: {message}")]
    InvalidField {
        sample: usize,
        index: usize,
        message: String,
    },
    #[error("sample {sample}, element {index}: unknown body {name:?}")]
    UnknownBody {
        sample: usize,
        index: usize,
        name: String,
    },
    #[error("sample {sample}, element {index}: duplicate body {body}")]
    DuplicateBody {
        sample: usize,
        index: usize,
        body: Body,
    },
    #[error("sample {sample}: {message}")]
    InvalidHouses { sample: usize, message: String },
}

/// A natal body as read from one snapshot, before house resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct NatalBody {
    pub body: Body,
    pub longitude: f64,
    pub house: Option<u8>,
}

/// One validated snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Position of the snapshot in the request
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub transits: Vec<PositionSample>,
    pub natal: Vec<NatalBody>,
    pub cusps: [f64; 12],
}

/// Validated request, ready for derivation.
#[derive(Debug, Clone)]
pub struct NormalizedInput {
    pub chart: NatalChart,
    /// Per-planet samples ordered by timestamp. Angles are excluded.
    pub series: BTreeMap<Body, Vec<PositionSample>>,
    pub window_start: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub sample_count: usize,
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS[.fff]` (taken as UTC) or `YYYY-MM-DD`.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn normalize(request: &AnalysisRequest) -> Result<NormalizedInput, InputError> {
    if request.samples.is_empty() {
        return Err(InputError::EmptySeries);
    }

    let mut snapshots = request
        .samples
        .iter()
        .enumerate()
        .map(|(i, raw)| normalize_snapshot(i, raw))
        .collect::<Result<Vec<_>, _>>()?;
    snapshots.sort_by_key(|s| s.timestamp);

    let earliest = &snapshots[0];
    let chart = resolve_chart(earliest)?;

    let window_start = match &request.window_start {
        Some(value) => parse_anchor("window_start", value)?,
        None => earliest.timestamp,
    };
    let generated_at = match &request.generated_at {
        Some(value) => parse_anchor("generated_at", value)?,
        None => window_start,
    };

    let mut series: BTreeMap<Body, Vec<PositionSample>> = BTreeMap::new();
    for snapshot in &snapshots {
        for sample in &snapshot.transits {
            if sample.body.is_angle() {
                continue;
            }
            series.entry(sample.body).or_default().push(sample.clone());
        }
    }

    debug!(
        "normalized {} samples, {} transiting planets, {} natal points",
        snapshots.len(),
        series.len(),
        chart.points().len()
    );

    Ok(NormalizedInput {
        chart,
        series,
        window_start,
        generated_at,
        sample_count: snapshots.len(),
    })
}

/// Validate one raw snapshot array.
pub fn normalize_snapshot(sample: usize, raw: &RawSnapshot) -> Result<Snapshot, InputError> {
    if raw.data.len() < REQUIRED_ELEMENTS {
        return Err(InputError::TooFewElements {
            sample,
            found: raw.data.len(),
            required: REQUIRED_ELEMENTS,
        });
    }
    if raw.data.len() > REQUIRED_ELEMENTS {
        debug!(
            "sample {}: ignoring {} trailing elements",
            sample,
            raw.data.len() - REQUIRED_ELEMENTS
        );
    }

    let timestamp = parse_timestamp(&raw.timestamp).ok_or_else(|| InputError::InvalidTimestamp {
        sample,
        value: raw.timestamp.clone(),
    })?;

    let mut transits = Vec::with_capacity(TRANSIT_SLOTS.len());
    let mut seen = HashSet::new();
    for index in TRANSIT_SLOTS {
        let body = parse_body(sample, index, &raw.data[index])?;
        let resolved = resolve_body(sample, index, &body.name)?;
        if !seen.insert(resolved) {
            return Err(InputError::DuplicateBody {
                sample,
                index,
                body: resolved,
            });
        }
        let longitude = normalize_longitude(body.full_degree);
        let retrograde = match &body.is_retro {
            Some(flag) => flag.as_bool().ok_or_else(|| InputError::InvalidField {
                sample,
                index,
                message: "isRetro must be a boolean or \"true\"/\"false\"".to_string(),
            })?,
            None => body.speed < 0.0,
        };
        transits.push(PositionSample {
            body: resolved,
            longitude,
            sign: Sign::from_longitude(longitude),
            speed: body.speed,
            retrograde,
            timestamp,
        });
    }

    let mut natal = Vec::with_capacity(NATAL_SLOTS.len());
    seen.clear();
    for index in NATAL_SLOTS {
        let body = parse_body(sample, index, &raw.data[index])?;
        let resolved = resolve_body(sample, index, &body.name)?;
        if !seen.insert(resolved) {
            return Err(InputError::DuplicateBody {
                sample,
                index,
                body: resolved,
            });
        }
        natal.push(NatalBody {
            body: resolved,
            longitude: normalize_longitude(body.full_degree),
            house: body
                .house
                .filter(|h| (1..=12).contains(h))
                .map(|h| h as u8),
        });
    }

    let cusps = parse_cusps(sample, &raw.data[HOUSES_SLOT])?;

    Ok(Snapshot {
        index: sample,
        timestamp,
        transits,
        natal,
        cusps,
    })
}

fn parse_anchor(field: &'static str, value: &str) -> Result<DateTime<Utc>, InputError> {
    parse_timestamp(value).ok_or_else(|| InputError::InvalidAnchor {
        field,
        value: value.to_string(),
    })
}

fn parse_body(sample: usize, index: usize, value: &serde_json::Value) -> Result<RawBody, InputError> {
    let body: RawBody =
        serde_json::from_value(value.clone()).map_err(|e| InputError::InvalidField {
            sample,
            index,
            message: e.to_string(),
        })?;
    if !body.full_degree.is_finite() || !body.speed.is_finite() {
        return Err(InputError::InvalidField {
            sample,
            index,
            message: "fullDegree and speed must be finite".to_string(),
        });
    }
    Ok(body)
}

fn resolve_body(sample: usize, index: usize, name: &str) -> Result<Body, InputError> {
    Body::from_name(name).ok_or_else(|| InputError::UnknownBody {
        sample,
        index,
        name: name.to_string(),
    })
}

fn parse_cusps(sample: usize, value: &serde_json::Value) -> Result<[f64; 12], InputError> {
    let invalid = |message: String| InputError::InvalidHouses { sample, message };

    let block: RawHouses = serde_json::from_value(value.clone())
        .map_err(|e| invalid(format!("house block: {}", e)))?;
    if block.houses.len() != 12 {
        return Err(invalid(format!(
            "expected 12 house cusps, found {}",
            block.houses.len()
        )));
    }

    let mut cusps = [None; 12];
    for cusp in &block.houses {
        if !(1..=12).contains(&cusp.house) {
            return Err(invalid(format!("house number {} out of range", cusp.house)));
        }
        if !cusp.degree.is_finite() {
            return Err(invalid(format!("house {} cusp is not finite", cusp.house)));
        }
        let slot = &mut cusps[(cusp.house - 1) as usize];
        if slot.is_some() {
            return Err(invalid(format!("house {} listed twice", cusp.house)));
        }
        *slot = Some(normalize_longitude(cusp.degree));
    }

    let mut resolved = [0.0; 12];
    for (h, cusp) in cusps.iter().enumerate() {
        // twelve distinct in-range houses fill every slot
        resolved[h] = cusp.unwrap_or_default();
    }
    if NatalChart::new(resolved, Vec::new()).is_none() {
        return Err(invalid(
            "cusps must form twelve contiguous counter-clockwise arcs".to_string(),
        ));
    }
    Ok(resolved)
}

fn resolve_chart(snapshot: &Snapshot) -> Result<NatalChart, InputError> {
    let frame = NatalChart::new(snapshot.cusps, Vec::new()).ok_or_else(|| {
        InputError::InvalidHouses {
            sample: snapshot.index,
            message: "cusps must form twelve contiguous counter-clockwise arcs".to_string(),
        }
    })?;
    let points = snapshot
        .natal
        .iter()
        .map(|natal| NatalPoint {
            body: natal.body,
            longitude: natal.longitude,
            house: natal
                .house
                .unwrap_or_else(|| frame.house_of(natal.longitude)),
        })
        .collect();
    Ok(frame.with_points(points))
}
