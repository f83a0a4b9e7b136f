//! Per-planet transit derivation.
//!
//! Each transiting planet's series is run independently through the house,
//! aspect, retrograde and ingress calculators.

pub mod houses;
pub mod ingress;
pub mod retrograde;

pub use houses::{house_activations, HouseActivation};
pub use ingress::{project_sign_change, Projection, SignChangeEvent};
pub use retrograde::{retrogradation_periods, RetrogradationPeriod};

use crate::aspects::{Aspect, AspectDetector};
use crate::bodies::Body;
use crate::config::EngineConfig;
use crate::ephemeris::PositionSample;
use crate::natal::NatalChart;
use crate::window::AnalysisWindow;
use log::debug;
use std::collections::BTreeMap;

/// Everything derived for one transiting planet.
#[derive(Debug, Clone)]
pub struct PlanetTransits {
    pub planet: Body,
    /// Position at the start of the window
    pub current: PositionSample,
    pub houses: Vec<HouseActivation>,
    pub aspects: Vec<Aspect>,
    pub retrogrades: Vec<RetrogradationPeriod>,
    pub sign_change: Option<SignChangeEvent>,
}

/// First sample inside the window, or the latest one before it.
fn reference_sample<'a>(
    samples: &'a [PositionSample],
    window: &AnalysisWindow,
) -> Option<&'a PositionSample> {
    samples
        .iter()
        .find(|s| s.timestamp >= window.start)
        .or_else(|| samples.last())
}

pub fn derive_planet(
    planet: Body,
    samples: &[PositionSample],
    chart: &NatalChart,
    window: &AnalysisWindow,
    config: &EngineConfig,
) -> Option<PlanetTransits> {
    let current = reference_sample(samples, window)?.clone();
    let transits = PlanetTransits {
        planet,
        current,
        houses: house_activations(planet, samples, chart, window),
        aspects: AspectDetector::new(config.orb).detect(planet, samples, chart, window),
        retrogrades: retrogradation_periods(planet, samples, window),
        sign_change: project_sign_change(
            planet,
            samples,
            config.speed_average_samples,
            config.stationary_speed,
        ),
    };
    debug!(
        "{}: {} houses, {} aspects, {} retrograde periods",
        planet,
        transits.houses.len(),
        transits.aspects.len(),
        transits.retrogrades.len()
    );
    Some(transits)
}

/// Derive every planet in the series, in body order.
pub fn derive_all(
    series: &BTreeMap<Body, Vec<PositionSample>>,
    chart: &NatalChart,
    window: &AnalysisWindow,
    config: &EngineConfig,
) -> Vec<PlanetTransits> {
    series
        .iter()
        .filter_map(|(planet, samples)| derive_planet(*planet, samples, chart, window, config))
        .collect()
}
