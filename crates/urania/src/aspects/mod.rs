pub mod calculator;
pub mod types;

pub use calculator::{angular_separation, AspectDetector};
pub use types::{Aspect, AspectKind};
