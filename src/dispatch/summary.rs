//! Post-hoc summary of a production plan.

use std::fmt;

use serde::Serialize;

use super::types::{DispatchRequest, PlanEntry};
use crate::plant::EffectiveUnit;

/// Aggregate figures derived from a completed plan.
///
/// Computed from the request and the plan after the fact so the summary can
/// never disagree with what was actually dispatched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanSummary {
    /// Requested load (MW).
    pub load_mw: f64,
    /// Sum of dispatched outputs (MW).
    pub total_mw: f64,
    /// Output from wind units (MW).
    pub wind_mw: f64,
    /// Output from thermal units (MW).
    pub thermal_mw: f64,
    /// Hourly fuel cost at the dispatched outputs (€/h).
    pub fuel_cost_per_hour: f64,
    /// Number of units with non-zero output.
    pub running_units: usize,
}

impl PlanSummary {
    /// Computes the summary of `plan`, which must be in request order.
    ///
    /// # Arguments
    ///
    /// * `request` - Request the plan was computed for
    /// * `plan` - Dispatched outputs, one per unit, in request order
    pub fn from_plan(request: &DispatchRequest, plan: &[PlanEntry]) -> Self {
        let units = EffectiveUnit::from_units(&request.powerplants, &request.fuels);

        let mut total = 0.0;
        let mut wind = 0.0;
        let mut thermal = 0.0;
        let mut cost = 0.0;
        let mut running = 0;

        for (unit, entry) in units.iter().zip(plan) {
            total += entry.p;
            if unit.is_thermal() {
                thermal += entry.p;
            } else {
                wind += entry.p;
            }
            cost += entry.p * unit.cost;
            if entry.p > 0.0 {
                running += 1;
            }
        }

        Self {
            load_mw: request.load,
            total_mw: total,
            wind_mw: wind,
            thermal_mw: thermal,
            fuel_cost_per_hour: cost,
            running_units: running,
        }
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Plan Summary ---")?;
        writeln!(f, "Load:            {:.1} MW", self.load_mw)?;
        writeln!(f, "Dispatched:      {:.1} MW", self.total_mw)?;
        writeln!(f, "Wind:            {:.1} MW", self.wind_mw)?;
        writeln!(f, "Thermal:         {:.1} MW", self.thermal_mw)?;
        writeln!(f, "Fuel cost:       {:.2} €/h", self.fuel_cost_per_hour)?;
        write!(f, "Running units:   {}", self.running_units)
    }
}
