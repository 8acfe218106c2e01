pub mod bands;
pub mod bounds;
pub mod breakdown;
pub mod composite;
pub mod dispatch;
pub mod input;
pub mod pillars;
pub mod validation;
pub mod weights;

pub use bands::{default_percentile_bands, percentile_for, PercentileBand, RangeOp};
pub use breakdown::{CompositeIndex, Factor, Index, Pillar, PillarScore, Scale};
pub use composite::{compute_composites, CompositeInput, CompositeReport};
pub use dispatch::{score_document, DispatchError};
pub use pillars::*;
pub use validation::Validate;
pub use weights::EngineWeights;
