//! Merit-order ranking shared by the dispatcher and the rounding reconciler.

use std::cmp::Ordering;

use crate::plant::EffectiveUnit;

/// Compares two units by merit: cheaper first, then more efficient, then
/// lower minimum output.
///
/// Wind ranks as maximally efficient, so it leads any tie on cost.
pub fn merit_cmp(a: &EffectiveUnit, b: &EffectiveUnit) -> Ordering {
    a.cost
        .total_cmp(&b.cost)
        .then_with(|| b.ranking_efficiency().total_cmp(&a.ranking_efficiency()))
        .then_with(|| a.pmin.total_cmp(&b.pmin))
}

/// Sorts units into merit order.
///
/// The sort is stable: units equal on every key keep their relative input
/// order, and sorting an already-ranked list leaves it unchanged.
pub fn rank(units: &mut [EffectiveUnit]) {
    units.sort_by(merit_cmp);
}

/// Returns the units in merit order without touching the input.
pub fn ranked(units: &[EffectiveUnit]) -> Vec<EffectiveUnit> {
    let mut out = units.to_vec();
    rank(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plant::{Fuels, Unit};

    fn names(units: &[EffectiveUnit]) -> Vec<&str> {
        units.iter().map(|u| u.name.as_str()).collect()
    }

    fn fleet(units: &[Unit]) -> Vec<EffectiveUnit> {
        EffectiveUnit::from_units(units, &Fuels::new(13.4, 50.8, 20.0, 60.0))
    }

    #[test]
    fn cheapest_first() {
        let units = fleet(&[
            Unit::turbojet("jet1", 0.3, 0.0, 16.0),
            Unit::gas("gas1", 0.53, 100.0, 460.0),
            Unit::wind("wind1", 150.0),
        ]);
        assert_eq!(names(&ranked(&units)), ["wind1", "gas1", "jet1"]);
    }

    #[test]
    fn equal_cost_prefers_higher_efficiency() {
        // Same fuel price over efficiency, different efficiency: only
        // possible across fuel kinds.
        let fuels = Fuels::new(10.0, 20.0, 0.0, 0.0);
        let units = EffectiveUnit::from_units(
            &[
                Unit::gas("gas_low", 0.25, 0.0, 10.0),
                Unit::turbojet("jet_high", 0.5, 0.0, 10.0),
            ],
            &fuels,
        );
        assert_eq!(units[0].cost, units[1].cost);
        assert_eq!(names(&ranked(&units)), ["jet_high", "gas_low"]);
    }

    #[test]
    fn equal_cost_and_efficiency_prefers_lower_minimum() {
        let units = fleet(&[
            Unit::gas("gas_big", 0.5, 80.0, 100.0),
            Unit::gas("gas_small", 0.5, 10.0, 100.0),
        ]);
        assert_eq!(names(&ranked(&units)), ["gas_small", "gas_big"]);
    }

    #[test]
    fn wind_leads_zero_cost_ties() {
        let free = Fuels::new(0.0, 0.0, 0.0, 100.0);
        let units = EffectiveUnit::from_units(
            &[Unit::gas("gas1", 0.9, 0.0, 10.0), Unit::wind("wind1", 10.0)],
            &free,
        );
        assert_eq!(names(&ranked(&units)), ["wind1", "gas1"]);
    }

    #[test]
    fn full_ties_keep_input_order() {
        let units = fleet(&[
            Unit::gas("b", 0.5, 10.0, 100.0),
            Unit::gas("a", 0.5, 10.0, 100.0),
            Unit::gas("c", 0.5, 10.0, 100.0),
        ]);
        assert_eq!(names(&ranked(&units)), ["b", "a", "c"]);
    }

    #[test]
    fn ranking_is_idempotent() {
        let units = fleet(&[
            Unit::gas("gas2", 0.53, 100.0, 460.0),
            Unit::turbojet("jet1", 0.3, 0.0, 16.0),
            Unit::gas("gas1", 0.53, 100.0, 460.0),
            Unit::wind("wind2", 36.0),
            Unit::gas("gas3", 0.37, 40.0, 210.0),
            Unit::wind("wind1", 150.0),
        ]);
        let once = ranked(&units);
        let twice = ranked(&once);
        assert_eq!(once, twice);
    }
}
