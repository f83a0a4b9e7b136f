//! Sample normalizer: validates raw request arrays into typed records.

pub mod normalizer;
pub mod types;

pub use normalizer::{normalize, parse_timestamp, InputError, NormalizedInput, Snapshot};
pub use types::{AnalysisRequest, RawSnapshot, REQUIRED_ELEMENTS};
