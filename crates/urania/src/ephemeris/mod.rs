//! Positional data as delivered by the external ephemeris.

pub mod types;

pub use types::PositionSample;
