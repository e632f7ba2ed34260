pub mod classification;
pub mod error;
pub mod metar;
pub mod resolver;
pub mod runway;
pub mod safety;
pub mod util;
pub mod wind;

pub use classification::{CrosswindSide, HeadTailSense, RunwayClassification, WindStatus};
pub use error::{ResolverError, ResolverResult};
pub use resolver::{Resolution, SkipReason, SkippedRunwayEnd, resolve};
pub use runway::{RunwayEnd, RunwayStrip};
pub use safety::{SafetyBand, SafetyThresholds};
pub use wind::WindObservation;
