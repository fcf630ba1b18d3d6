//! Cost and bounds model: effective operating envelope and marginal cost per unit.

use super::types::{Fuels, Unit, UnitKind};

/// A unit's operating envelope and marginal cost under the current fuel table.
///
/// Derived once per dispatch call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveUnit {
    /// Position of the unit in the caller's input list.
    pub index: usize,
    /// Unit identifier.
    pub name: String,
    /// Generation technology.
    pub kind: UnitKind,
    /// Declared efficiency, used as a ranking tie-break.
    pub efficiency: f64,
    /// Lowest output when running (MW). Always 0 for wind.
    pub pmin: f64,
    /// Highest reachable output (MW). Scaled by wind availability for wind.
    pub pmax: f64,
    /// Cost per MWh produced (€/MWh). Always 0 for wind.
    pub cost: f64,
}

impl EffectiveUnit {
    /// Computes the effective envelope and marginal cost of `unit`.
    ///
    /// Thermal units keep their declared bounds and pay the price of their
    /// own fuel divided by their efficiency. Wind units have no minimum,
    /// a maximum scaled by the wind availability, and no cost. The CO2
    /// price is not folded into the marginal cost.
    ///
    /// # Arguments
    ///
    /// * `index` - Position of the unit in the input list
    /// * `unit` - Declared unit
    /// * `fuels` - Fuel prices and wind availability for this call
    pub fn new(index: usize, unit: &Unit, fuels: &Fuels) -> Self {
        let (pmin, pmax, cost) = match unit.kind {
            UnitKind::GasFired => (
                unit.pmin,
                unit.pmax,
                fuels.gas_euro_per_mwh / unit.efficiency,
            ),
            UnitKind::Turbojet => (
                unit.pmin,
                unit.pmax,
                fuels.kerosine_euro_per_mwh / unit.efficiency,
            ),
            UnitKind::WindTurbine => (0.0, unit.pmax * fuels.wind_fraction(), 0.0),
        };
        Self {
            index,
            name: unit.name.clone(),
            kind: unit.kind,
            efficiency: unit.efficiency,
            pmin: pmin.max(0.0),
            pmax: pmax.max(0.0),
            cost,
        }
    }

    /// Derives effective units for a whole fleet, keeping input order.
    pub fn from_units(units: &[Unit], fuels: &Fuels) -> Vec<Self> {
        units
            .iter()
            .enumerate()
            .map(|(index, unit)| Self::new(index, unit, fuels))
            .collect()
    }

    /// Returns `true` for fuel-burning units.
    pub fn is_thermal(&self) -> bool {
        self.kind.is_thermal()
    }

    /// Efficiency used by the merit order; wind ranks as maximally efficient.
    pub fn ranking_efficiency(&self) -> f64 {
        match self.kind {
            UnitKind::WindTurbine => f64::INFINITY,
            UnitKind::GasFired | UnitKind::Turbojet => self.efficiency,
        }
    }
}
