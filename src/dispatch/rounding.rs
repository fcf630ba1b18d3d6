//! Snaps a dispatched allocation onto the 0.1 MW grid and repairs the drift.
//!
//! All arithmetic here runs on integer grid steps so that repeated
//! corrections cannot accumulate floating-point error.

use tracing::debug;

use super::dispatcher::Allocation;
use super::types::{DispatchError, EPSILON, STEPS_PER_MW};
use crate::plant::EffectiveUnit;

/// Slack (in grid steps) when mapping unrounded bounds onto the grid.
const GRID_SLACK: f64 = 1e-6;

/// Largest step count an `f64` still holds exactly (2^53).
const MAX_STEPS: f64 = 9_007_199_254_740_992.0;

/// Converts MW to the nearest whole number of grid steps.
pub fn to_steps(mw: f64) -> i64 {
    (mw * STEPS_PER_MW).round() as i64
}

/// Converts grid steps back to MW.
pub fn from_steps(steps: i64) -> f64 {
    steps as f64 / STEPS_PER_MW
}

/// Rounds MW to the nearest grid value.
pub fn round_to_grid(mw: f64) -> f64 {
    from_steps(to_steps(mw))
}

/// Converts MW to grid steps, or `None` when the value is off the
/// exactly representable range.
fn checked_steps(mw: f64) -> Option<i64> {
    let steps = (mw * STEPS_PER_MW).round();
    (steps.is_finite() && steps.abs() <= MAX_STEPS).then_some(steps as i64)
}

/// Grid points a unit may occupy while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GridBounds {
    /// Lowest running output, rounded up onto the grid.
    min: i64,
    /// Highest output, rounded down onto the grid.
    max: i64,
}

impl GridBounds {
    fn of(unit: &EffectiveUnit) -> Self {
        Self {
            min: (unit.pmin * STEPS_PER_MW - GRID_SLACK).ceil() as i64,
            max: (unit.pmax * STEPS_PER_MW + GRID_SLACK).floor() as i64,
        }
    }

    fn is_empty(self) -> bool {
        self.min > self.max
    }
}

/// Rounding state: snapped outputs in grid steps, merit order.
struct Reconciler {
    steps: Vec<i64>,
    bounds: Vec<GridBounds>,
}

impl Reconciler {
    /// A unit can step down if it stays at or above its minimum.
    fn can_decrease(&self, pos: usize) -> bool {
        self.steps[pos] > self.bounds[pos].min && self.steps[pos] > 0
    }

    /// A unit can step up if it has headroom and one step reaches its minimum.
    fn can_increase(&self, pos: usize) -> bool {
        self.steps[pos] < self.bounds[pos].max && self.steps[pos] + 1 >= self.bounds[pos].min
    }

    fn total(&self) -> Option<i64> {
        self.steps
            .iter()
            .try_fold(0_i64, |acc, &steps| acc.checked_add(steps))
    }
}

/// Mismatch reported when outputs are too large to count in grid steps.
fn out_of_range(load: f64, allocation: &Allocation) -> DispatchError {
    DispatchError::RoundingMismatch {
        target: round_to_grid(load),
        reached: round_to_grid(allocation.total()),
    }
}

/// Rounds every output to the grid and moves single steps until the total
/// matches the load rounded to the grid.
///
/// When the rounded total is too high, the most expensive unit above its
/// minimum gives up one step; when too low, the cheapest unit below its
/// maximum takes one. Among equal marginal costs the merit order decides:
/// increases go to the earliest eligible unit, decreases to the latest.
///
/// `units` must be in merit order, matching `allocation`. Returns outputs
/// in MW in the same order.
///
/// # Errors
///
/// Returns [`DispatchError::RoundingMismatch`] when a running unit's bounds
/// contain no grid point, when the load or an output is too large to count
/// in grid steps, or when no unit can absorb the next correction.
pub fn reconcile(
    load: f64,
    units: &[EffectiveUnit],
    allocation: &Allocation,
) -> Result<Vec<f64>, DispatchError> {
    let target = checked_steps(load).ok_or_else(|| out_of_range(load, allocation))?;
    let bounds: Vec<GridBounds> = units.iter().map(GridBounds::of).collect();

    let mut steps = Vec::with_capacity(units.len());
    for (pos, unit) in units.iter().enumerate() {
        let p = allocation.output[pos];
        let running = allocation.activated[pos] && p > EPSILON;
        if !running {
            steps.push(0);
            continue;
        }
        let grid = bounds[pos];
        if grid.is_empty() {
            debug!(
                unit = %unit.name,
                pmin = unit.pmin,
                pmax = unit.pmax,
                "no grid point within bounds"
            );
            return Err(DispatchError::RoundingMismatch {
                target: from_steps(target),
                reached: round_to_grid(allocation.total()),
            });
        }
        let snapped = checked_steps(p).ok_or_else(|| out_of_range(load, allocation))?;
        steps.push(snapped.clamp(grid.min, grid.max));
    }

    let mut reconciler = Reconciler { steps, bounds };
    loop {
        let Some((total, delta)) = reconciler
            .total()
            .and_then(|total| Some((total, total.checked_sub(target)?)))
        else {
            return Err(out_of_range(load, allocation));
        };
        let pick = match delta.signum() {
            0 => break,
            1 => (0..units.len()).rev().find(|&pos| reconciler.can_decrease(pos)),
            _ => (0..units.len()).find(|&pos| reconciler.can_increase(pos)),
        };
        let Some(pos) = pick else {
            return Err(DispatchError::RoundingMismatch {
                target: from_steps(target),
                reached: from_steps(total),
            });
        };
        reconciler.steps[pos] -= delta.signum();
        debug!(
            unit = %units[pos].name,
            output = from_steps(reconciler.steps[pos]),
            delta = from_steps(delta),
            "rounding correction"
        );
    }

    Ok(reconciler.steps.into_iter().map(from_steps).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::dispatcher::dispatch;
    use crate::dispatch::merit_order::ranked;
    use crate::plant::{Fuels, Unit};

    fn fuels() -> Fuels {
        Fuels::new(10.0, 50.0, 0.0, 100.0)
    }

    fn run(load: f64, units: &[Unit]) -> (Vec<EffectiveUnit>, Result<Vec<f64>, DispatchError>) {
        let ranked = ranked(&EffectiveUnit::from_units(units, &fuels()));
        let result = dispatch(load, &ranked).and_then(|alloc| reconcile(load, &ranked, &alloc));
        (ranked, result)
    }

    #[test]
    fn step_conversion() {
        assert_eq!(to_steps(380.04), 3800);
        assert_eq!(to_steps(380.06), 3801);
        assert_eq!(from_steps(3801), 380.1);
        assert_eq!(round_to_grid(59.99999999999999), 60.0);
    }

    #[test]
    fn grid_bounds_round_inwards() {
        let u = EffectiveUnit::new(0, &Unit::gas("g", 0.5, 10.04, 20.06), &fuels());
        assert_eq!(GridBounds::of(&u), GridBounds { min: 101, max: 200 });
        let exact = EffectiveUnit::new(0, &Unit::gas("g", 0.5, 10.0, 20.0), &fuels());
        assert_eq!(GridBounds::of(&exact), GridBounds { min: 100, max: 200 });
    }

    #[test]
    fn grid_exact_allocation_passes_through() {
        let (_, result) = run(
            250.5,
            &[Unit::gas("a", 0.5, 0.0, 200.0), Unit::gas("b", 0.4, 0.0, 100.0)],
        );
        assert_eq!(result.unwrap(), vec![200.0, 50.5]);
    }

    #[test]
    fn shortfall_goes_to_cheapest_unit_with_headroom() {
        // a is pinned at 100.04 (grid max 100.0), b absorbs the step.
        let (_, result) = run(
            120.08,
            &[Unit::gas("a", 0.5, 0.0, 100.04), Unit::gas("b", 0.4, 0.0, 50.0)],
        );
        assert_eq!(result.unwrap(), vec![100.0, 20.1]);
    }

    #[test]
    fn surplus_comes_from_most_expensive_unit_above_minimum() {
        // b is clamped up to its 10.1 grid minimum; a gives a step back.
        let (_, result) = run(
            110.04,
            &[Unit::gas("a", 0.5, 0.0, 100.0), Unit::gas("b", 0.4, 10.04, 100.0)],
        );
        assert_eq!(result.unwrap(), vec![99.9, 10.1]);
    }

    #[test]
    fn surplus_prefers_expensive_unit() {
        let ranked = ranked(&EffectiveUnit::from_units(
            &[Unit::gas("a", 0.5, 0.0, 100.0), Unit::gas("b", 0.4, 0.0, 100.0)],
            &fuels(),
        ));
        let alloc = Allocation {
            output: vec![50.0, 50.06],
            activated: vec![true, true],
        };
        // 50.0 + 50.1 = 100.1 against a 100.0 target.
        assert_eq!(reconcile(100.0, &ranked, &alloc).unwrap(), vec![50.0, 50.0]);
    }

    #[test]
    fn equal_costs_fall_back_to_merit_order() {
        let ranked = ranked(&EffectiveUnit::from_units(
            &[Unit::gas("first", 0.5, 0.0, 100.0), Unit::gas("second", 0.5, 0.0, 100.0)],
            &fuels(),
        ));
        let down = Allocation {
            output: vec![50.06, 50.0],
            activated: vec![true, true],
        };
        assert_eq!(reconcile(100.0, &ranked, &down).unwrap(), vec![50.1, 49.9]);

        let up = Allocation {
            output: vec![50.04, 50.04],
            activated: vec![true, true],
        };
        assert_eq!(reconcile(100.1, &ranked, &up).unwrap(), vec![50.1, 50.0]);
    }

    #[test]
    fn idle_unit_with_high_minimum_is_not_nudged() {
        let ranked = ranked(&EffectiveUnit::from_units(
            &[Unit::gas("a", 0.5, 0.0, 50.04), Unit::gas("b", 0.4, 20.0, 100.0)],
            &fuels(),
        ));
        let alloc = Allocation {
            output: vec![50.04, 0.0],
            activated: vec![true, false],
        };
        let err = reconcile(50.1, &ranked, &alloc).unwrap_err();
        assert_eq!(err.kind(), "rounding_mismatch");
    }

    #[test]
    fn pinned_units_off_grid_fail() {
        let (_, result) = run(
            20.08,
            &[Unit::gas("a", 0.5, 0.0, 10.04), Unit::gas("b", 0.4, 0.0, 10.04)],
        );
        assert_eq!(
            result.unwrap_err(),
            DispatchError::RoundingMismatch {
                target: 20.1,
                reached: 20.0
            }
        );
    }

    #[test]
    fn running_unit_without_grid_point_fails() {
        let (_, result) = run(50.04, &[Unit::gas("a", 0.5, 50.04, 50.04)]);
        assert!(matches!(result, Err(DispatchError::RoundingMismatch { .. })));
    }

    #[test]
    fn outputs_beyond_step_range_fail_without_overflow() {
        let (_, result) = run(
            1.5e18,
            &[Unit::gas("a", 0.5, 0.0, 1e18), Unit::gas("b", 0.4, 0.0, 1e18)],
        );
        assert!(matches!(result, Err(DispatchError::RoundingMismatch { .. })));
    }

    #[test]
    fn step_range_edges() {
        assert_eq!(checked_steps(380.04), Some(3800));
        assert_eq!(checked_steps(9e14), Some(9_000_000_000_000_000));
        assert_eq!(checked_steps(1e15), None);
        assert_eq!(checked_steps(f64::INFINITY), None);
        assert_eq!(checked_steps(f64::NAN), None);
    }

    #[test]
    fn outputs_stay_within_grid_bounds() {
        let units = [
            Unit::wind("w", 33.33),
            Unit::gas("a", 0.53, 12.34, 45.67),
            Unit::gas("b", 0.47, 8.88, 77.77),
            Unit::turbojet("j", 0.3, 0.0, 16.16),
        ];
        for tenth in 0..=1729_i64 {
            let load = tenth as f64 / 10.0;
            let (ranked, result) = run(load, &units);
            let Ok(outputs) = result else {
                continue;
            };
            let total: i64 = outputs.iter().map(|&p| to_steps(p)).sum();
            assert_eq!(total, tenth, "total off at load {load}");
            for (unit, &p) in ranked.iter().zip(&outputs) {
                assert!(p <= unit.pmax + EPSILON, "{} above max at {load}", unit.name);
                assert!(
                    p == 0.0 || p >= unit.pmin - EPSILON,
                    "{} below min at {load}",
                    unit.name
                );
            }
        }
    }
}
