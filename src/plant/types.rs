//! Raw power plant and fuel market inputs, as they arrive on the wire.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of generation technologies.
///
/// Wire names follow the production-plan payload (`gasfired`, `turbojet`,
/// `windturbine`); the descriptive names are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Gas-fired thermal plant, burns gas.
    #[serde(rename = "gasfired", alias = "thermal-gas")]
    GasFired,
    /// Turbojet thermal plant, burns kerosine.
    #[serde(rename = "turbojet", alias = "thermal-turbojet")]
    Turbojet,
    /// Wind turbine; output limited by the current wind availability.
    #[serde(rename = "windturbine", alias = "variable-wind")]
    WindTurbine,
}

impl UnitKind {
    /// Returns `true` for fuel-burning kinds.
    pub fn is_thermal(self) -> bool {
        match self {
            Self::GasFired | Self::Turbojet => true,
            Self::WindTurbine => false,
        }
    }

    /// Wire name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GasFired => "gasfired",
            Self::Turbojet => "turbojet",
            Self::WindTurbine => "windturbine",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generation unit as declared by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Unit {
    /// Unique identifier, echoed back in the plan.
    pub name: String,
    /// Generation technology.
    #[serde(rename = "type")]
    pub kind: UnitKind,
    /// Fuel-to-power conversion efficiency (0.0, 1.0]; ignored for wind.
    #[serde(default = "default_efficiency")]
    pub efficiency: f64,
    /// Declared minimum output when running (MW).
    pub pmin: f64,
    /// Declared maximum output (MW).
    pub pmax: f64,
}

fn default_efficiency() -> f64 {
    1.0
}

impl Unit {
    /// Creates a unit declaration.
    pub fn new(
        name: impl Into<String>,
        kind: UnitKind,
        efficiency: f64,
        pmin: f64,
        pmax: f64,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            efficiency,
            pmin,
            pmax,
        }
    }

    /// Shorthand for a gas-fired unit.
    pub fn gas(name: impl Into<String>, efficiency: f64, pmin: f64, pmax: f64) -> Self {
        Self::new(name, UnitKind::GasFired, efficiency, pmin, pmax)
    }

    /// Shorthand for a turbojet unit.
    pub fn turbojet(name: impl Into<String>, efficiency: f64, pmin: f64, pmax: f64) -> Self {
        Self::new(name, UnitKind::Turbojet, efficiency, pmin, pmax)
    }

    /// Shorthand for a wind turbine; efficiency is irrelevant and set to 1.
    pub fn wind(name: impl Into<String>, pmax: f64) -> Self {
        Self::new(name, UnitKind::WindTurbine, 1.0, 0.0, pmax)
    }
}

/// Fuel prices and wind availability for one dispatch call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fuels {
    /// Gas price (€/MWh of fuel).
    #[serde(rename = "gas(euro/MWh)", alias = "gas_euro_per_mwh")]
    pub gas_euro_per_mwh: f64,
    /// Kerosine price (€/MWh of fuel).
    #[serde(rename = "kerosine(euro/MWh)", alias = "kerosine_euro_per_mwh")]
    pub kerosine_euro_per_mwh: f64,
    /// CO2 emission allowance price (€/ton). Carried through, not priced in.
    #[serde(rename = "co2(euro/ton)", alias = "co2_euro_per_ton", default)]
    pub co2_euro_per_ton: f64,
    /// Wind availability in percent, 0 to 100.
    #[serde(rename = "wind(%)", alias = "wind_pct")]
    pub wind_pct: f64,
}

impl Fuels {
    /// Creates a fuel table.
    pub fn new(
        gas_euro_per_mwh: f64,
        kerosine_euro_per_mwh: f64,
        co2_euro_per_ton: f64,
        wind_pct: f64,
    ) -> Self {
        Self {
            gas_euro_per_mwh,
            kerosine_euro_per_mwh,
            co2_euro_per_ton,
            wind_pct,
        }
    }

    /// Wind availability as a fraction in [0.0, 1.0].
    pub fn wind_fraction(&self) -> f64 {
        self.wind_pct / 100.0
    }
}
