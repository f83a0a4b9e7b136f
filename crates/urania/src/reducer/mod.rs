//! Output reducer: nested per-planet and per-category caps over the derived
//! event set.
//!
//! Planets are ranked and gated first, then each retained planet's houses,
//! aspects and retrograde periods are capped independently, so a planet with
//! many strong aspects never starves another retained planet. Sign changes
//! are the only category selected across planets.

pub mod stages;

pub use stages::{
    gate_planets, rank_planets, select_aspects, select_houses, select_retrogrades,
    select_sign_changes, ScoredPlanet,
};

use crate::aspects::Aspect;
use crate::config::EngineConfig;
use crate::ephemeris::PositionSample;
use crate::scoring::RelevanceScorer;
use crate::transits::{HouseActivation, PlanetTransits, RetrogradationPeriod, SignChangeEvent};
use log::debug;

/// The events kept for one planet.
#[derive(Debug, Clone)]
pub struct PlanetSelection {
    pub current: PositionSample,
    pub relevance: u32,
    pub houses: Vec<HouseActivation>,
    pub aspects: Vec<Aspect>,
    pub retrogrades: Vec<RetrogradationPeriod>,
    /// Always carried so the summary can report time left in sign, even when
    /// the event lost its slot in the cross-planet sign-change list.
    pub sign_change: Option<SignChangeEvent>,
}

#[derive(Debug, Clone, Default)]
pub struct Reduction {
    pub planets: Vec<PlanetSelection>,
    pub sign_changes: Vec<SignChangeEvent>,
}

pub struct OutputReducer<'a> {
    config: &'a EngineConfig,
    scorer: RelevanceScorer<'a>,
}

impl<'a> OutputReducer<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            config,
            scorer: RelevanceScorer::from_config(config),
        }
    }

    /// Rank, gate and cap.
    pub fn reduce(&self, transits: &[PlanetTransits]) -> Reduction {
        let caps = &self.config.caps;
        let ranked = rank_planets(transits, &self.scorer);
        let considered = ranked.len();
        let retained = gate_planets(ranked, self.config.min_relevance, caps.max_planets);
        debug!("reducer kept {} of {} planets", retained.len(), considered);

        let planets: Vec<PlanetSelection> = retained.iter().map(|p| self.cap_planet(p)).collect();
        let sign_changes = select_sign_changes(
            planets.iter().filter_map(|p| p.sign_change.as_ref()),
            caps.max_sign_changes,
        );
        Reduction {
            planets,
            sign_changes,
        }
    }

    /// Per-category caps for a single planet, without the relevance gate.
    pub fn reduce_planet(&self, transits: &PlanetTransits) -> Reduction {
        let scored = ScoredPlanet {
            transits,
            score: self.scorer.planet_score(transits),
        };
        let selection = self.cap_planet(&scored);
        let sign_changes = select_sign_changes(
            selection.sign_change.iter(),
            self.config.caps.max_sign_changes,
        );
        Reduction {
            planets: vec![selection],
            sign_changes,
        }
    }

    /// Every planet and every event, ranked planets first, events chronological.
    pub fn passthrough(&self, transits: &[PlanetTransits]) -> Reduction {
        let planets: Vec<PlanetSelection> = rank_planets(transits, &self.scorer)
            .iter()
            .map(|p| {
                let mut aspects = p.transits.aspects.clone();
                aspects.sort_by(|a, b| {
                    a.start
                        .cmp(&b.start)
                        .then(a.natal_point.cmp(&b.natal_point))
                        .then(a.kind.cmp(&b.kind))
                });
                PlanetSelection {
                    current: p.transits.current.clone(),
                    relevance: p.score,
                    houses: p.transits.houses.clone(),
                    aspects,
                    retrogrades: p.transits.retrogrades.clone(),
                    sign_change: p.transits.sign_change.clone(),
                }
            })
            .collect();
        let sign_changes = select_sign_changes(
            planets.iter().filter_map(|p| p.sign_change.as_ref()),
            usize::MAX,
        );
        Reduction {
            planets,
            sign_changes,
        }
    }

    fn cap_planet(&self, planet: &ScoredPlanet<'_>) -> PlanetSelection {
        let caps = &self.config.caps;
        PlanetSelection {
            current: planet.transits.current.clone(),
            relevance: planet.score,
            houses: select_houses(planet, caps.max_houses),
            aspects: select_aspects(planet, caps.min_aspect_intensity, caps.max_aspects),
            retrogrades: select_retrogrades(planet, caps.max_retrogrades),
            sign_change: planet.transits.sign_change.clone(),
        }
    }
}
