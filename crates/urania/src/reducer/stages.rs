//! The reducer's sort-and-slice stages. Each one is a pure function over
//! already-derived events so it can be exercised on its own.

use crate::aspects::Aspect;
use crate::scoring::{EventRank, RelevanceScorer};
use crate::transits::{HouseActivation, PlanetTransits, RetrogradationPeriod, SignChangeEvent};

/// A planet paired with its aggregate relevance.
#[derive(Debug, Clone, Copy)]
pub struct ScoredPlanet<'a> {
    pub transits: &'a PlanetTransits,
    pub score: u32,
}

/// Score every planet and order them by relevance, highest first.
/// Equal scores keep body order.
pub fn rank_planets<'a>(
    transits: &'a [PlanetTransits],
    scorer: &RelevanceScorer<'_>,
) -> Vec<ScoredPlanet<'a>> {
    let mut ranked: Vec<ScoredPlanet<'a>> = transits
        .iter()
        .map(|t| ScoredPlanet {
            transits: t,
            score: scorer.planet_score(t),
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.transits.planet.cmp(&b.transits.planet))
    });
    ranked
}

/// Drop planets under the relevance threshold, then keep the top `max_planets`.
pub fn gate_planets(
    mut ranked: Vec<ScoredPlanet<'_>>,
    min_relevance: u32,
    max_planets: usize,
) -> Vec<ScoredPlanet<'_>> {
    ranked.retain(|p| p.score >= min_relevance);
    ranked.truncate(max_planets);
    ranked
}

/// Longest stays win; the survivors are returned in chronological order.
pub fn select_houses(planet: &ScoredPlanet<'_>, cap: usize) -> Vec<HouseActivation> {
    let mut houses: Vec<&HouseActivation> = planet.transits.houses.iter().collect();
    houses.sort_by_key(|h| EventRank::house(planet.score, h));
    houses.truncate(cap);
    houses.sort_by_key(|h| (h.entry, h.house));
    houses.into_iter().cloned().collect()
}

/// Strongest aspects at or above `min_intensity`, strongest first.
pub fn select_aspects(planet: &ScoredPlanet<'_>, min_intensity: u32, cap: usize) -> Vec<Aspect> {
    let mut aspects: Vec<&Aspect> = planet
        .transits
        .aspects
        .iter()
        .filter(|a| a.intensity >= min_intensity)
        .collect();
    aspects.sort_by_key(|a| EventRank::aspect(planet.score, a));
    aspects.into_iter().take(cap).cloned().collect()
}

/// Longest retrograde periods first.
pub fn select_retrogrades(planet: &ScoredPlanet<'_>, cap: usize) -> Vec<RetrogradationPeriod> {
    let mut periods: Vec<&RetrogradationPeriod> = planet.transits.retrogrades.iter().collect();
    periods.sort_by_key(|r| EventRank::retrograde(planet.score, r));
    periods.into_iter().take(cap).cloned().collect()
}

/// Soonest projected ingresses across the retained planets. Indeterminate
/// projections never compete for a slot.
pub fn select_sign_changes<'a, I>(events: I, cap: usize) -> Vec<SignChangeEvent>
where
    I: IntoIterator<Item = &'a SignChangeEvent>,
{
    let mut upcoming: Vec<&SignChangeEvent> = events
        .into_iter()
        .filter(|e| e.ingress().is_some())
        .collect();
    upcoming.sort_by_key(|e| (e.ingress(), e.planet));
    upcoming.into_iter().take(cap).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspects::AspectKind;
    use crate::bodies::Body;
    use crate::config::EngineConfig;
    use crate::ephemeris::PositionSample;
    use crate::transits::Projection;
    use crate::window::WindowSpan;
    use crate::zodiac::Sign;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
    }

    fn planet(body: Body) -> PlanetTransits {
        PlanetTransits {
            planet: body,
            current: PositionSample {
                body,
                longitude: 12.0,
                sign: Sign::Aries,
                speed: 0.5,
                retrograde: false,
                timestamp: day(0),
            },
            houses: vec![],
            aspects: vec![],
            retrogrades: vec![],
            sign_change: None,
        }
    }

    fn house(body: Body, house: u8, entry: i64, exit: i64) -> HouseActivation {
        HouseActivation {
            planet: body,
            house,
            entry: day(entry),
            exit: day(exit),
            span: WindowSpan::Contained,
        }
    }

    fn aspect(body: Body, natal_point: Body, intensity: u32) -> Aspect {
        Aspect {
            kind: AspectKind::Trine,
            planet: body,
            natal_point,
            natal_house: 5,
            start: day(1),
            end: day(9),
            exact_at: day(4),
            closest_orb: 0.5,
            intensity,
            span: WindowSpan::Contained,
        }
    }

    fn sign_change(body: Body, ingress: Option<i64>) -> SignChangeEvent {
        SignChangeEvent {
            planet: body,
            current_sign: Sign::Aries,
            next_sign: Sign::Taurus,
            degrees_remaining: 18.0,
            projection: match ingress {
                Some(n) => Projection::Projected {
                    ingress: day(n),
                    days_remaining: n as f64,
                },
                None => Projection::Indeterminate,
            },
        }
    }

    #[test]
    fn ranks_by_score_then_body() {
        let config = EngineConfig::default();
        let scorer = RelevanceScorer::from_config(&config);
        let transits = vec![planet(Body::Mars), planet(Body::Sun), planet(Body::Pluto)];
        let ranked = rank_planets(&transits, &scorer);
        let order: Vec<Body> = ranked.iter().map(|p| p.transits.planet).collect();
        // Sun and Mars share weight 4; Sun comes first in body order.
        assert_eq!(order, vec![Body::Pluto, Body::Sun, Body::Mars]);
    }

    #[test]
    fn gate_applies_threshold_before_cap() {
        let config = EngineConfig::default();
        let scorer = RelevanceScorer::from_config(&config);
        let transits = vec![
            planet(Body::Mercury),
            planet(Body::Saturn),
            planet(Body::Jupiter),
            planet(Body::Venus),
        ];
        let gated = gate_planets(rank_planets(&transits, &scorer), 5, 1);
        assert_eq!(gated.len(), 1);
        assert_eq!(gated[0].transits.planet, Body::Saturn);

        let gated = gate_planets(rank_planets(&transits, &scorer), 5, 10);
        assert_eq!(gated.len(), 2);
    }

    #[test]
    fn houses_keep_longest_then_sort_by_entry() {
        let mut transits = planet(Body::Jupiter);
        transits.houses = vec![
            house(Body::Jupiter, 1, 0, 20),
            house(Body::Jupiter, 2, 20, 200),
            house(Body::Jupiter, 3, 200, 210),
            house(Body::Jupiter, 4, 210, 300),
        ];
        let scored = ScoredPlanet {
            transits: &transits,
            score: 7,
        };
        let kept: Vec<u8> = select_houses(&scored, 2).iter().map(|h| h.house).collect();
        assert_eq!(kept, vec![2, 4]);
    }

    #[test]
    fn aspects_filtered_by_intensity_and_capped() {
        let mut transits = planet(Body::Saturn);
        transits.aspects = vec![
            aspect(Body::Saturn, Body::Sun, 5),
            aspect(Body::Saturn, Body::Moon, 13),
            aspect(Body::Saturn, Body::Venus, 9),
            aspect(Body::Saturn, Body::Mars, 11),
        ];
        let scored = ScoredPlanet {
            transits: &transits,
            score: 46,
        };
        let kept: Vec<u32> = select_aspects(&scored, 6, 2).iter().map(|a| a.intensity).collect();
        assert_eq!(kept, vec![13, 11]);
        assert_eq!(select_aspects(&scored, 6, 10).len(), 3);
    }

    #[test]
    fn retrogrades_longest_first() {
        let mut transits = planet(Body::Mercury);
        transits.retrogrades = [(10, 30), (100, 124), (200, 221)]
            .iter()
            .map(|(s, e)| RetrogradationPeriod {
                planet: Body::Mercury,
                start: day(*s),
                end: day(*e),
                station_sign: Sign::Gemini,
                returns_to_previous_sign: false,
                span: WindowSpan::Contained,
            })
            .collect();
        let scored = ScoredPlanet {
            transits: &transits,
            score: 5,
        };
        let kept: Vec<i64> = select_retrogrades(&scored, 2)
            .iter()
            .map(|r| r.duration_days())
            .collect();
        assert_eq!(kept, vec![24, 21]);
    }

    #[test]
    fn sign_changes_soonest_first_skipping_indeterminate() {
        let events = vec![
            sign_change(Body::Saturn, Some(90)),
            sign_change(Body::Mars, None),
            sign_change(Body::Sun, Some(12)),
            sign_change(Body::Jupiter, Some(40)),
        ];
        let kept: Vec<Body> = select_sign_changes(&events, 2)
            .iter()
            .map(|e| e.planet)
            .collect();
        assert_eq!(kept, vec![Body::Sun, Body::Jupiter]);
        assert_eq!(select_sign_changes(&events, 10).len(), 3);
    }
}
