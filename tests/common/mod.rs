//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use production_plan::dispatch::PlanEntry;
use production_plan::plant::{Fuels, Unit};

/// Reference fuel table (13.4 gas, 50.8 kerosine, 20 CO2) at the given wind.
pub fn reference_fuels(wind_pct: f64) -> Fuels {
    Fuels::new(13.4, 50.8, 20.0, wind_pct)
}

/// Flat fuel table: gas at 10 €/MWh, kerosine at 50 €/MWh, no CO2 price.
pub fn flat_fuels(wind_pct: f64) -> Fuels {
    Fuels::new(10.0, 50.0, 0.0, wind_pct)
}

/// One gas unit (100–460 MW), one turbojet (0–100 MW), one 100 MW wind unit.
pub fn reference_fleet() -> Vec<Unit> {
    vec![
        Unit::gas("gas1", 0.53, 100.0, 460.0),
        Unit::turbojet("jet1", 0.3, 0.0, 100.0),
        Unit::wind("wind1", 100.0),
    ]
}

/// Two large gas units, a smaller gas unit, a turbojet and two wind parks.
pub fn mixed_fleet() -> Vec<Unit> {
    vec![
        Unit::gas("gasfiredbig1", 0.53, 100.0, 460.0),
        Unit::gas("gasfiredbig2", 0.53, 100.0, 460.0),
        Unit::gas("gasfiredsomewhatsmaller", 0.37, 40.0, 210.0),
        Unit::turbojet("tj1", 0.3, 0.0, 16.0),
        Unit::wind("windpark1", 150.0),
        Unit::wind("windpark2", 36.0),
    ]
}

/// Output of the named unit, or `NaN` if the plan has no such entry.
pub fn output_of(plan: &[PlanEntry], name: &str) -> f64 {
    plan.iter()
        .find(|e| e.name == name)
        .map_or(f64::NAN, |e| e.p)
}

/// Plan total in whole grid steps, free of float summation drift.
pub fn total_steps(plan: &[PlanEntry]) -> i64 {
    plan.iter().map(|e| (e.p * 10.0).round() as i64).sum()
}

/// Load in whole grid steps.
pub fn load_steps(load: f64) -> i64 {
    (load * 10.0).round() as i64
}
