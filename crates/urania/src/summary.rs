//! The structured summary handed to downstream consumers.

use crate::aspects::{Aspect, AspectKind};
use crate::bodies::Body;
use crate::reducer::{PlanetSelection, Reduction};
use crate::transits::{HouseActivation, Projection, RetrogradationPeriod, SignChangeEvent};
use crate::window::{AnalysisWindow, WindowSpan};
use crate::zodiac::Sign;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fidelity {
    Reduced,
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitSummary {
    pub planets: Vec<PlanetSummary>,
    pub sign_changes: Vec<SignChangeSummary>,
    pub metadata: SummaryMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetadata {
    pub analysis_period: String,
    pub generated_at: DateTime<Utc>,
    pub planets_analyzed: usize,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub orb_degrees: f64,
    pub fidelity: Fidelity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetSummary {
    pub planet: Body,
    pub sign: Sign,
    /// Degree within the sign
    pub degree: f64,
    pub longitude: f64,
    pub retrograde: bool,
    pub relevance: u32,
    pub houses: Vec<HouseSummary>,
    pub aspects: Vec<AspectSummary>,
    pub retrogrades: Vec<RetrogradeSummary>,
    pub time_in_sign: TimeInSign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseSummary {
    pub house: u8,
    pub entry: NaiveDate,
    pub exit: NaiveDate,
    pub duration_months: f64,
    pub span: WindowSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectSummary {
    pub kind: AspectKind,
    pub natal_point: Body,
    pub natal_house: u8,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub exact: NaiveDate,
    pub orb: f64,
    pub intensity: u32,
    pub span: WindowSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrogradeSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Sign occupied at the retrograde station
    pub sign: Sign,
    pub duration_days: i64,
    pub returns_to_previous_sign: bool,
    pub span: WindowSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TimeInSign {
    Projected {
        next_sign: Sign,
        ingress: NaiveDate,
        days_remaining: f64,
    },
    Indeterminate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignChangeSummary {
    pub planet: Body,
    pub from: Sign,
    pub to: Sign,
    pub ingress: NaiveDate,
}

impl From<&HouseActivation> for HouseSummary {
    fn from(h: &HouseActivation) -> Self {
        Self {
            house: h.house,
            entry: h.entry.date_naive(),
            exit: h.exit.date_naive(),
            duration_months: h.duration_months(),
            span: h.span,
        }
    }
}

impl From<&Aspect> for AspectSummary {
    fn from(a: &Aspect) -> Self {
        Self {
            kind: a.kind,
            natal_point: a.natal_point,
            natal_house: a.natal_house,
            start: a.start.date_naive(),
            end: a.end.date_naive(),
            exact: a.exact_at.date_naive(),
            orb: round1(a.closest_orb),
            intensity: a.intensity,
            span: a.span,
        }
    }
}

impl From<&RetrogradationPeriod> for RetrogradeSummary {
    fn from(r: &RetrogradationPeriod) -> Self {
        Self {
            start: r.start.date_naive(),
            end: r.end.date_naive(),
            sign: r.station_sign,
            duration_days: r.duration_days(),
            returns_to_previous_sign: r.returns_to_previous_sign,
            span: r.span,
        }
    }
}

impl TimeInSign {
    fn from_event(event: Option<&SignChangeEvent>) -> Self {
        match event.map(|e| (e.next_sign, &e.projection)) {
            Some((
                next_sign,
                Projection::Projected {
                    ingress,
                    days_remaining,
                },
            )) => TimeInSign::Projected {
                next_sign,
                ingress: ingress.date_naive(),
                days_remaining: round1(*days_remaining),
            },
            _ => TimeInSign::Indeterminate,
        }
    }
}

impl SignChangeSummary {
    fn from_event(event: &SignChangeEvent) -> Option<Self> {
        Some(Self {
            planet: event.planet,
            from: event.current_sign,
            to: event.next_sign,
            ingress: event.ingress()?.date_naive(),
        })
    }
}

impl From<&PlanetSelection> for PlanetSummary {
    fn from(p: &PlanetSelection) -> Self {
        Self {
            planet: p.current.body,
            sign: p.current.sign,
            degree: round1(p.current.degree_in_sign()),
            longitude: round1(p.current.longitude),
            retrograde: p.current.retrograde,
            relevance: p.relevance,
            houses: p.houses.iter().map(HouseSummary::from).collect(),
            aspects: p.aspects.iter().map(AspectSummary::from).collect(),
            retrogrades: p.retrogrades.iter().map(RetrogradeSummary::from).collect(),
            time_in_sign: TimeInSign::from_event(p.sign_change.as_ref()),
        }
    }
}

/// Render a reduction. `planets_analyzed` counts the planets that made it
/// into the summary.
pub fn build_summary(
    reduction: &Reduction,
    window: &AnalysisWindow,
    generated_at: DateTime<Utc>,
    analysis_period: String,
    orb_degrees: f64,
    fidelity: Fidelity,
) -> TransitSummary {
    TransitSummary {
        planets: reduction.planets.iter().map(PlanetSummary::from).collect(),
        sign_changes: reduction
            .sign_changes
            .iter()
            .filter_map(SignChangeSummary::from_event)
            .collect(),
        metadata: SummaryMetadata {
            analysis_period,
            generated_at,
            planets_analyzed: reduction.planets.len(),
            window_start: window.start.date_naive(),
            window_end: window.end.date_naive(),
            orb_degrees,
            fidelity,
        },
    }
}
