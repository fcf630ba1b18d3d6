//! Economic dispatch of a mixed thermal and wind fleet against a fixed load.

pub mod config;
/// Capacity check, merit order, allocation and grid rounding.
pub mod dispatch;
pub mod io;
pub mod plant;
pub mod telemetry;

#[cfg(feature = "api")]
pub mod api;

pub use config::ConfigError;
pub use dispatch::{DispatchError, DispatchRequest, PlanEntry, PlanSummary, compute_dispatch};
