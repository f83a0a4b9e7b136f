pub mod bodies;
pub mod zodiac;
pub mod ephemeris;
pub mod window;
pub mod config;
pub mod natal;
pub mod input;
pub mod aspects;
pub mod transits;
pub mod scoring;
pub mod reducer;
pub mod summary;
pub mod engine;
pub mod estimate;

pub use bodies::Body;
pub use config::{ConfigError, EngineConfig, ReductionCaps, WeightTable};
pub use engine::{EngineError, TransitEngine};
pub use estimate::{estimate_tokens, TokenEstimate};
pub use input::{AnalysisRequest, InputError, RawSnapshot};
pub use summary::{Fidelity, TransitSummary};
pub use zodiac::Sign;
