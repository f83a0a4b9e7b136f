//! Tracked bodies and name resolution.
//!
//! Input payloads name bodies in English or Portuguese, with or without
//! diacritics. Everything past the normalizer works with [`Body`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    NorthNode,
    Chiron,
    Ascendant,
    Midheaven,
}

impl Body {
    pub const ALL: [Body; 14] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
        Body::NorthNode,
        Body::Chiron,
        Body::Ascendant,
        Body::Midheaven,
    ];

    /// Chart angles are natal reference points, never transiting planets.
    pub fn is_angle(self) -> bool {
        matches!(self, Body::Ascendant | Body::Midheaven)
    }

    pub fn id(self) -> &'static str {
        match self {
            Body::Sun => "sun",
            Body::Moon => "moon",
            Body::Mercury => "mercury",
            Body::Venus => "venus",
            Body::Mars => "mars",
            Body::Jupiter => "jupiter",
            Body::Saturn => "saturn",
            Body::Uranus => "uranus",
            Body::Neptune => "neptune",
            Body::Pluto => "pluto",
            Body::NorthNode => "north_node",
            Body::Chiron => "chiron",
            Body::Ascendant => "ascendant",
            Body::Midheaven => "midheaven",
        }
    }

    /// Resolve a body from a payload name ("Júpiter", "jupiter", "Plutão", "asc", ...).
    pub fn from_name(name: &str) -> Option<Body> {
        let key = name.trim().to_lowercase();
        BODY_ALIASES.get(key.as_str()).copied()
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

lazy_static::lazy_static! {
    static ref BODY_ALIASES: HashMap<&'static str, Body> = {
        let table: &[(&[&str], Body)] = &[
            (&["sun", "sol"], Body::Sun),
            (&["moon", "lua"], Body::Moon),
            (&["mercury", "mercúrio", "mercurio"], Body::Mercury),
            (&["venus", "vênus", "vénus"], Body::Venus),
            (&["mars", "marte"], Body::Mars),
            (&["jupiter", "júpiter"], Body::Jupiter),
            (&["saturn", "saturno"], Body::Saturn),
            (&["uranus", "urano"], Body::Uranus),
            (&["neptune", "netuno"], Body::Neptune),
            (&["pluto", "plutão", "plutao"], Body::Pluto),
            (
                &["north_node", "north node", "true node", "nodo norte", "nódulo norte", "nodo_norte"],
                Body::NorthNode,
            ),
            (&["chiron", "quíron", "quiron"], Body::Chiron),
            (&["ascendant", "asc", "ascendente"], Body::Ascendant),
            (&["midheaven", "mc", "meio do céu", "meio do ceu"], Body::Midheaven),
        ];
        let mut aliases = HashMap::new();
        for (names, body) in table {
            for name in *names {
                aliases.insert(*name, *body);
            }
        }
        aliases
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_portuguese_and_english_names() {
        assert_eq!(Body::from_name("Júpiter"), Some(Body::Jupiter));
        assert_eq!(Body::from_name("jupiter"), Some(Body::Jupiter));
        assert_eq!(Body::from_name("Plutão"), Some(Body::Pluto));
        assert_eq!(Body::from_name("  Urano "), Some(Body::Uranus));
        assert_eq!(Body::from_name("Ascendente"), Some(Body::Ascendant));
        assert_eq!(Body::from_name("Vulcan"), None);
    }

    #[test]
    fn every_body_resolves_from_its_id() {
        for body in Body::ALL {
            assert_eq!(Body::from_name(body.id()), Some(body));
        }
    }

    #[test]
    fn angles_are_flagged() {
        assert!(Body::Ascendant.is_angle());
        assert!(Body::Midheaven.is_angle());
        assert!(!Body::Pluto.is_angle());
    }
}
