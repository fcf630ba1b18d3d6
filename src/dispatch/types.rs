//! Core dispatch types: request, plan entries, and the typed failure taxonomy.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plant::{Fuels, Unit};

/// Absolute tolerance (MW) for comparisons on unrounded outputs.
pub const EPSILON: f64 = 1e-9;

/// Output granularity (MW). Plans are reported in multiples of this step.
pub const GRANULARITY_MW: f64 = 0.1;

/// Number of granularity steps per MW.
pub const STEPS_PER_MW: f64 = 1.0 / GRANULARITY_MW;

/// One dispatch call: target load, fuel table, and the fleet.
///
/// Field names follow the production-plan payload so the same type
/// deserializes from JSON request bodies and TOML scenario files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchRequest {
    /// Target load to be covered (MW).
    pub load: f64,
    /// Fuel prices and wind availability.
    pub fuels: Fuels,
    /// Fleet, in caller order.
    pub powerplants: Vec<Unit>,
}

impl DispatchRequest {
    /// Creates a dispatch request.
    pub fn new(load: f64, fuels: Fuels, powerplants: Vec<Unit>) -> Self {
        Self {
            load,
            fuels,
            powerplants,
        }
    }
}

/// Dispatched output of a single unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    /// Unit identifier.
    pub name: String,
    /// Output (MW), a multiple of [`GRANULARITY_MW`].
    pub p: f64,
}

impl fmt::Display for PlanEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<16} {:>9.1} MW", self.name, self.p)
    }
}

/// Reasons a dispatch call can fail. All are terminal for the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// The load exceeds the sum of effective maxima.
    #[error("load ({load:.1} MW) exceeds total available capacity ({capacity:.1} MW)")]
    InsufficientCapacity {
        /// Requested load (MW).
        load: f64,
        /// Sum of effective maxima (MW).
        capacity: f64,
    },
    /// Minimum output constraints leave no way to match the load exactly.
    #[error("infeasible under minimum output constraints: {0}")]
    InfeasiblePmin(String),
    /// The load is reachable at full precision but not on the 0.1 MW grid.
    #[error("cannot match load {target:.1} MW on the 0.1 MW grid (reached {reached:.1} MW)")]
    RoundingMismatch {
        /// Load rounded to the grid (MW).
        target: f64,
        /// Closest sum reached before running out of adjustable units (MW).
        reached: f64,
    },
}

impl DispatchError {
    /// Stable machine-readable identifier for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InsufficientCapacity { .. } => "insufficient_capacity",
            Self::InfeasiblePmin(_) => "infeasible_pmin",
            Self::RoundingMismatch { .. } => "rounding_mismatch",
        }
    }
}
