//! Capacity pre-check run before any allocation work.

use tracing::debug;

use super::types::{DispatchError, EPSILON};
use crate::plant::EffectiveUnit;

/// Sum of effective maxima across the fleet (MW).
pub fn total_capacity(units: &[EffectiveUnit]) -> f64 {
    units.iter().map(|u| u.pmax).sum()
}

/// Fails with [`DispatchError::InsufficientCapacity`] when `load` exceeds
/// the fleet's effective capacity.
///
/// A load exactly equal to the capacity passes.
///
/// # Errors
///
/// Returns `InsufficientCapacity` carrying the load and the capacity.
pub fn check_capacity(load: f64, units: &[EffectiveUnit]) -> Result<f64, DispatchError> {
    let capacity = total_capacity(units);
    debug!(load, capacity, "capacity check");
    if load > capacity + EPSILON {
        return Err(DispatchError::InsufficientCapacity { load, capacity });
    }
    Ok(capacity)
}
