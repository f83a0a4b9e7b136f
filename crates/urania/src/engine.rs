//! Transit engine: normalization, derivation, reduction, rendering.

use crate::bodies::Body;
use crate::config::{ConfigError, EngineConfig};
use crate::input::{normalize, AnalysisRequest, InputError, NormalizedInput};
use crate::reducer::{OutputReducer, Reduction};
use crate::summary::{build_summary, Fidelity, TransitSummary};
use crate::transits::{derive_all, derive_planet, PlanetTransits};
use crate::window::AnalysisWindow;
use chrono::{DateTime, Utc};
use log::info;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("malformed input: {0}")]
    MalformedInput(#[from] InputError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("analysis window starting {0} is out of range")]
    WindowOutOfRange(DateTime<Utc>),
    #[error("{0} has no transit samples in this request")]
    PlanetNotTracked(Body),
}

/// Everything derived for one request, before reduction.
#[derive(Debug, Clone)]
pub struct Derivation {
    pub input: NormalizedInput,
    pub window: AnalysisWindow,
    pub transits: Vec<PlanetTransits>,
}

/// Stateless between calls; clone freely and share across threads.
#[derive(Debug, Clone)]
pub struct TransitEngine {
    config: Arc<EngineConfig>,
}

impl TransitEngine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn window_for(&self, input: &NormalizedInput) -> Result<AnalysisWindow, EngineError> {
        AnalysisWindow::months_from(input.window_start, self.config.window_months)
            .ok_or(EngineError::WindowOutOfRange(input.window_start))
    }

    /// Normalize and derive every planet's events.
    pub fn derive(&self, request: &AnalysisRequest) -> Result<Derivation, EngineError> {
        let input = normalize(request)?;
        let window = self.window_for(&input)?;
        let transits = derive_all(&input.series, &input.chart, &window, &self.config);
        Ok(Derivation {
            input,
            window,
            transits,
        })
    }

    /// Reduced summary.
    pub fn analyze(&self, request: &AnalysisRequest) -> Result<TransitSummary, EngineError> {
        let derivation = self.derive(request)?;
        let reduction = OutputReducer::new(&self.config).reduce(&derivation.transits);
        info!(
            "analyzed {} samples: {} of {} planets retained, {} sign changes",
            derivation.input.sample_count,
            reduction.planets.len(),
            derivation.transits.len(),
            reduction.sign_changes.len()
        );
        Ok(self.render(&derivation, &reduction, Fidelity::Reduced))
    }

    /// Every derived event, no gate and no caps.
    pub fn analyze_full(&self, request: &AnalysisRequest) -> Result<TransitSummary, EngineError> {
        let derivation = self.derive(request)?;
        let reduction = OutputReducer::new(&self.config).passthrough(&derivation.transits);
        info!(
            "analyzed {} samples at full fidelity: {} planets",
            derivation.input.sample_count,
            reduction.planets.len()
        );
        Ok(self.render(&derivation, &reduction, Fidelity::Full))
    }

    /// Report for one planet with per-category caps applied. The relevance
    /// gate is skipped: asking for a planet always returns it.
    pub fn analyze_planet(
        &self,
        request: &AnalysisRequest,
        planet: Body,
    ) -> Result<TransitSummary, EngineError> {
        let input = normalize(request)?;
        let window = self.window_for(&input)?;
        let samples = input
            .series
            .get(&planet)
            .ok_or(EngineError::PlanetNotTracked(planet))?;
        let transits = derive_planet(planet, samples, &input.chart, &window, &self.config)
            .ok_or(EngineError::PlanetNotTracked(planet))?;
        let reduction = OutputReducer::new(&self.config).reduce_planet(&transits);
        info!("analyzed {} over {} samples", planet, input.sample_count);

        let derivation = Derivation {
            input,
            window,
            transits: vec![transits],
        };
        Ok(self.render(&derivation, &reduction, Fidelity::Reduced))
    }

    fn render(
        &self,
        derivation: &Derivation,
        reduction: &Reduction,
        fidelity: Fidelity,
    ) -> TransitSummary {
        build_summary(
            reduction,
            &derivation.window,
            derivation.input.generated_at,
            self.config.analysis_period_label(),
            self.config.orb,
            fidelity,
        )
    }
}
