//! Generation unit declarations and their per-call cost and bounds model.

/// Effective operating envelope and marginal cost.
pub mod effective;
pub mod types;

pub use effective::EffectiveUnit;
pub use types::{Fuels, Unit, UnitKind};
