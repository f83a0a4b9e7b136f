use crate::aspects::types::{Aspect, AspectKind};
use crate::bodies::Body;
use crate::ephemeris::PositionSample;
use crate::natal::{NatalChart, NatalPoint};
use crate::window::{AnalysisWindow, WindowSpan};

/// Points awarded for a perfectly exact aspect on top of the base weight.
const TIGHTNESS_SCALE: f64 = 10.0;

/// Angular separation between two longitudes, normalized to 0-180.
pub fn angular_separation(lon1: f64, lon2: f64) -> f64 {
    let raw_diff = (lon1 - lon2).rem_euclid(360.0);
    if raw_diff > 180.0 {
        360.0 - raw_diff
    } else {
        raw_diff
    }
}

/// Detects transit-to-natal aspects over a sampled series.
pub struct AspectDetector {
    orb: f64,
}

struct Run {
    kind: AspectKind,
    start: usize,
    end: usize,
    closest: usize,
    closest_orb: f64,
}

impl AspectDetector {
    pub fn new(orb: f64) -> Self {
        Self { orb }
    }

    /// Aspect formed by a separation, with its deviation from exact.
    pub fn classify(&self, separation: f64) -> Option<(AspectKind, f64)> {
        AspectKind::ALL.iter().find_map(|kind| {
            let deviation = (separation - kind.exact_angle()).abs();
            (deviation <= self.orb).then_some((*kind, deviation))
        })
    }

    /// Non-decreasing in tightness: the closer to exact, the higher or equal.
    /// Tightness is rounded to whole points, so orbs within the same tenth
    /// of the configured orb share a value.
    pub fn intensity(&self, kind: AspectKind, closest_orb: f64) -> u32 {
        let tightness = (1.0 - closest_orb / self.orb).clamp(0.0, 1.0);
        kind.base_weight() + (tightness * TIGHTNESS_SCALE).round() as u32
    }

    /// Every aspect run of `planet` to every natal point inside the window.
    pub fn detect(
        &self,
        planet: Body,
        samples: &[PositionSample],
        chart: &NatalChart,
        window: &AnalysisWindow,
    ) -> Vec<Aspect> {
        let in_window: Vec<&PositionSample> = samples
            .iter()
            .filter(|s| window.contains(s.timestamp))
            .collect();

        let mut aspects = Vec::new();
        for point in chart.points() {
            aspects.extend(self.detect_to_point(planet, &in_window, point));
        }
        aspects.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then(a.natal_point.cmp(&b.natal_point))
                .then(a.kind.cmp(&b.kind))
        });
        aspects
    }

    fn detect_to_point(
        &self,
        planet: Body,
        samples: &[&PositionSample],
        point: &NatalPoint,
    ) -> Vec<Aspect> {
        let mut aspects = Vec::new();
        let mut run: Option<Run> = None;

        for (i, sample) in samples.iter().enumerate() {
            let hit = self.classify(angular_separation(sample.longitude, point.longitude));
            match hit {
                Some((kind, deviation)) if run.as_ref().is_some_and(|r| r.kind == kind) => {
                    if let Some(r) = run.as_mut() {
                        r.end = i;
                        if deviation < r.closest_orb {
                            r.closest = i;
                            r.closest_orb = deviation;
                        }
                    }
                }
                _ => {
                    if let Some(done) = run.take() {
                        aspects.push(self.close_run(planet, point, samples, done));
                    }
                    run = hit.map(|(kind, deviation)| Run {
                        kind,
                        start: i,
                        end: i,
                        closest: i,
                        closest_orb: deviation,
                    });
                }
            }
        }
        if let Some(done) = run {
            aspects.push(self.close_run(planet, point, samples, done));
        }
        aspects
    }

    fn close_run(
        &self,
        planet: Body,
        point: &NatalPoint,
        samples: &[&PositionSample],
        run: Run,
    ) -> Aspect {
        Aspect {
            kind: run.kind,
            planet,
            natal_point: point.body,
            natal_house: point.house,
            start: samples[run.start].timestamp,
            end: samples[run.end].timestamp,
            exact_at: samples[run.closest].timestamp,
            closest_orb: run.closest_orb,
            intensity: self.intensity(run.kind, run.closest_orb),
            span: WindowSpan::from_flags(run.start == 0, run.end + 1 == samples.len()),
        }
    }
}
