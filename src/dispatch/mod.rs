//! Economic dispatch: capacity check, merit order, greedy allocation with
//! backward repair, and grid rounding.
//!
//! [`compute_dispatch`] is the single entry point. Every call is pure and
//! self-contained, so it can run concurrently from any number of callers.

/// Capacity pre-check.
pub mod capacity;
pub mod dispatcher;
/// Merit-order ranking.
pub mod merit_order;
pub mod rounding;
pub mod summary;
pub mod types;

use tracing::{info, instrument, warn};

pub use summary::PlanSummary;
pub use types::{DispatchError, DispatchRequest, GRANULARITY_MW, PlanEntry};

use crate::plant::{EffectiveUnit, Fuels, Unit};

/// Computes a production plan covering `load` with `units`.
///
/// Returns one entry per unit, in input order, with outputs in multiples of
/// [`GRANULARITY_MW`] summing to the load rounded to that granularity.
///
/// # Errors
///
/// * [`DispatchError::InsufficientCapacity`] - load exceeds the available capacity
/// * [`DispatchError::InfeasiblePmin`] - minimum outputs prevent an exact match
/// * [`DispatchError::RoundingMismatch`] - no exact match on the output grid
#[instrument(name = "dispatch", skip_all, fields(load = load, units = units.len()))]
pub fn compute_dispatch(
    load: f64,
    fuels: &Fuels,
    units: &[Unit],
) -> Result<Vec<PlanEntry>, DispatchError> {
    run(load, fuels, units)
        .inspect(|plan| info!(entries = plan.len(), "plan computed"))
        .inspect_err(|e| warn!(kind = e.kind(), "dispatch failed: {e}"))
}

fn run(load: f64, fuels: &Fuels, units: &[Unit]) -> Result<Vec<PlanEntry>, DispatchError> {
    let effective = EffectiveUnit::from_units(units, fuels);
    capacity::check_capacity(load, &effective)?;

    let ranked = merit_order::ranked(&effective);
    let allocation = dispatcher::dispatch(load, &ranked)?;
    let outputs = rounding::reconcile(load, &ranked, &allocation)?;

    let mut plan: Vec<PlanEntry> = units
        .iter()
        .map(|u| PlanEntry {
            name: u.name.clone(),
            p: 0.0,
        })
        .collect();
    for (unit, p) in ranked.iter().zip(outputs) {
        plan[unit.index].p = p;
    }
    Ok(plan)
}

impl DispatchRequest {
    /// Computes the production plan for this request.
    ///
    /// # Errors
    ///
    /// See [`compute_dispatch`].
    pub fn dispatch(&self) -> Result<Vec<PlanEntry>, DispatchError> {
        compute_dispatch(self.load, &self.fuels, &self.powerplants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fuels(wind_pct: f64) -> Fuels {
        Fuels::new(13.4, 50.8, 20.0, wind_pct)
    }

    fn reference_units() -> Vec<Unit> {
        vec![
            Unit::gas("gas1", 0.53, 100.0, 460.0),
            Unit::turbojet("jet1", 0.3, 0.0, 100.0),
            Unit::wind("wind1", 100.0),
        ]
    }

    fn as_pairs(plan: &[PlanEntry]) -> Vec<(&str, f64)> {
        plan.iter().map(|e| (e.name.as_str(), e.p)).collect()
    }

    #[test]
    fn plan_keeps_input_order() {
        let plan = compute_dispatch(480.0, &fuels(60.0), &reference_units()).unwrap();
        assert_eq!(
            as_pairs(&plan),
            [("gas1", 420.0), ("jet1", 0.0), ("wind1", 60.0)]
        );
    }

    #[test]
    fn full_wind_covers_first_hundred() {
        let plan = compute_dispatch(480.0, &fuels(100.0), &reference_units()).unwrap();
        assert_eq!(
            as_pairs(&plan),
            [("gas1", 380.0), ("jet1", 0.0), ("wind1", 100.0)]
        );
    }

    #[test]
    fn capacity_checked_before_dispatch() {
        let err = compute_dispatch(621.0, &fuels(60.0), &reference_units()).unwrap_err();
        assert_eq!(err.kind(), "insufficient_capacity");
    }

    #[test]
    fn request_dispatch_matches_free_function() {
        let req = DispatchRequest::new(300.0, fuels(30.0), reference_units());
        assert_eq!(
            req.dispatch(),
            compute_dispatch(300.0, &fuels(30.0), &reference_units())
        );
    }

    #[test]
    fn oversized_fleet_reports_mismatch_instead_of_overflowing() {
        let units = [
            Unit::gas("a", 0.5, 0.0, 1e18),
            Unit::gas("b", 0.4, 0.0, 1e18),
        ];
        let fuels = Fuels::new(10.0, 50.0, 0.0, 0.0);
        let err = compute_dispatch(1.5e18, &fuels, &units).unwrap_err();
        assert_eq!(err.kind(), "rounding_mismatch");
    }

    #[test]
    fn empty_fleet_with_zero_load_yields_empty_plan() {
        assert_eq!(compute_dispatch(0.0, &fuels(0.0), &[]), Ok(Vec::new()));
    }
}
