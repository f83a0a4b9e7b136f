#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};
use urania::{AnalysisRequest, RawSnapshot};

/// Transit slot order used by the upstream payloads.
pub const TRANSIT_NAMES: [&str; 11] = [
    "Sol", "Lua", "Mercúrio", "Vênus", "Marte", "Júpiter", "Saturno", "Urano", "Netuno", "Plutão",
    "Ascendente",
];

/// Where untouched planets sit: no major aspect to a natal point at 0°.
pub const PARKED_LONGITUDE: f64 = 45.0;

pub fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
}

type Track = Box<dyn Fn(i64) -> (f64, f64)>;

/// Builds synthetic requests: daily (or `step`-day) snapshots where every
/// transit body is parked unless given a track, every natal point sits at
/// 0° unless moved, and houses are equal 30° arcs from 0° Aries.
pub struct RequestBuilder {
    first_day: i64,
    last_day: i64,
    step: i64,
    tracks: Vec<(&'static str, Track)>,
    natal: Vec<(&'static str, f64)>,
    cusps: [f64; 12],
    window_start: Option<String>,
    generated_at: Option<String>,
}

impl RequestBuilder {
    pub fn new(first_day: i64, last_day: i64) -> Self {
        Self {
            first_day,
            last_day,
            step: 1,
            tracks: Vec::new(),
            natal: TRANSIT_NAMES.iter().map(|n| (*n, 0.0)).collect(),
            cusps: std::array::from_fn(|h| 30.0 * h as f64),
            window_start: None,
            generated_at: None,
        }
    }

    pub fn step(mut self, step: i64) -> Self {
        self.step = step;
        self
    }

    /// Longitude and speed as a function of the day index.
    pub fn track(mut self, name: &'static str, f: impl Fn(i64) -> (f64, f64) + 'static) -> Self {
        self.tracks.push((name, Box::new(f)));
        self
    }

    /// Constant-speed motion from `lon0` at day 0.
    pub fn linear(self, name: &'static str, lon0: f64, speed: f64) -> Self {
        self.track(name, move |d| (lon0 + speed * d as f64, speed))
    }

    pub fn natal(mut self, name: &'static str, longitude: f64) -> Self {
        if let Some(slot) = self.natal.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = longitude;
        }
        self
    }

    pub fn cusps(mut self, cusps: [f64; 12]) -> Self {
        self.cusps = cusps;
        self
    }

    pub fn window_start(mut self, value: &str) -> Self {
        self.window_start = Some(value.to_string());
        self
    }

    pub fn generated_at(mut self, value: &str) -> Self {
        self.generated_at = Some(value.to_string());
        self
    }

    fn position(&self, name: &str, d: i64) -> (f64, f64) {
        self.tracks
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, f)| f(d))
            .unwrap_or((PARKED_LONGITUDE, 0.0))
    }

    pub fn snapshot_data(&self, d: i64) -> Vec<Value> {
        let mut data: Vec<Value> = TRANSIT_NAMES
            .iter()
            .map(|name| {
                let (lon, speed) = self.position(name, d);
                body(name, lon, speed)
            })
            .collect();
        data.extend(self.natal.iter().map(|(name, lon)| body(name, *lon, 0.0)));
        let houses: Vec<Value> = self
            .cusps
            .iter()
            .enumerate()
            .map(|(h, degree)| json!({ "house": h + 1, "sign": "", "degree": degree }))
            .collect();
        data.push(json!({ "houses": houses }));
        data
    }

    pub fn build(&self) -> AnalysisRequest {
        let samples = (self.first_day..=self.last_day)
            .step_by(self.step as usize)
            .map(|d| RawSnapshot {
                timestamp: day(d).to_rfc3339(),
                data: self.snapshot_data(d),
            })
            .collect();
        AnalysisRequest {
            samples,
            window_start: self.window_start.clone(),
            generated_at: self.generated_at.clone(),
        }
    }
}

pub fn body(name: &str, longitude: f64, speed: f64) -> Value {
    let lon = longitude.rem_euclid(360.0);
    let retro = if speed < 0.0 { "true" } else { "false" };
    json!({
        "name": name,
        "fullDegree": lon,
        "normDegree": lon % 30.0,
        "speed": speed,
        "isRetro": retro,
        "sign": "",
        "house": 0
    })
}
