//! Greedy merit-order dispatcher with backward feasibility repair.
//!
//! Runs three phases over units already sorted into merit order:
//! wind first, thermal units cheapest first (repairing minimum-output
//! overshoots by trimming earlier, more expensive units), then a fine-fill
//! top-up for any residue.

use tracing::debug;

use super::types::{DispatchError, EPSILON};
use crate::plant::EffectiveUnit;

/// Working assignment of a dispatch pass, indexed by merit-order position.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    /// Assigned output per unit (MW).
    pub output: Vec<f64>,
    /// Whether the unit has been started (given at least its minimum).
    pub activated: Vec<bool>,
}

impl Allocation {
    /// All units idle at zero.
    pub fn idle(len: usize) -> Self {
        Self {
            output: vec![0.0; len],
            activated: vec![false; len],
        }
    }

    /// Sum of assigned outputs (MW).
    pub fn total(&self) -> f64 {
        self.output.iter().sum()
    }
}

/// Dispatch state machine for one call.
struct Dispatcher<'a> {
    units: &'a [EffectiveUnit],
    allocation: Allocation,
    remaining: f64,
}

impl<'a> Dispatcher<'a> {
    fn new(load: f64, units: &'a [EffectiveUnit]) -> Self {
        Self {
            units,
            allocation: Allocation::idle(units.len()),
            remaining: load,
        }
    }

    /// Phase A: wind takes as much of the load as it can; it has no minimum.
    fn wind_first(&mut self) {
        for (pos, unit) in self.units.iter().enumerate() {
            if unit.is_thermal() {
                continue;
            }
            let take = unit.pmax.min(self.remaining.max(0.0));
            self.allocation.output[pos] = take;
            self.allocation.activated[pos] = take > EPSILON;
            self.remaining -= take;
            debug!(unit = %unit.name, take, remaining = self.remaining, "wind");
        }
    }

    /// Phase B: thermal units in merit order.
    fn merit_pass(&mut self) -> Result<(), DispatchError> {
        let units = self.units;
        for (pos, unit) in units.iter().enumerate() {
            if !unit.is_thermal() {
                continue;
            }
            if self.remaining <= EPSILON {
                debug!(unit = %unit.name, "load covered, unit stays idle");
                continue;
            }
            if self.remaining >= unit.pmin - EPSILON {
                let take = unit.pmax.min(self.remaining).max(unit.pmin);
                self.allocation.output[pos] = take;
                self.allocation.activated[pos] = true;
                self.remaining -= take;
                debug!(unit = %unit.name, take, remaining = self.remaining, "thermal");
            } else {
                self.backward_reduce(pos)?;
            }
        }
        Ok(())
    }

    /// Starts the unit at `pos` at its minimum and gives the overshoot back
    /// by trimming earlier thermal units, most expensive first, each no
    /// lower than its own minimum. Among equal costs the unit ranked first
    /// is trimmed first.
    fn backward_reduce(&mut self, pos: usize) -> Result<(), DispatchError> {
        let unit = &self.units[pos];
        let overshoot = unit.pmin - self.remaining;
        self.allocation.output[pos] = unit.pmin;
        self.allocation.activated[pos] = true;
        debug!(
            unit = %unit.name,
            pmin = unit.pmin,
            remaining = self.remaining,
            overshoot,
            "minimum exceeds remaining load, reducing earlier units"
        );

        let units = self.units;
        let mut candidates: Vec<usize> = (0..pos)
            .filter(|&prev| units[prev].is_thermal() && self.allocation.activated[prev])
            .collect();
        // Stable, so equal costs keep merit order.
        candidates.sort_by(|&a, &b| units[b].cost.total_cmp(&units[a].cost));

        let mut reduced = 0.0;
        for prev in candidates {
            if reduced >= overshoot - EPSILON {
                break;
            }
            let earlier = &units[prev];
            let room = self.allocation.output[prev] - earlier.pmin;
            if room <= EPSILON {
                continue;
            }
            let give_back = room.min(overshoot - reduced);
            self.allocation.output[prev] -= give_back;
            reduced += give_back;
            debug!(unit = %earlier.name, give_back, "reduced");
        }

        if reduced < overshoot - EPSILON {
            return Err(DispatchError::InfeasiblePmin(format!(
                "starting `{}` at its {:.1} MW minimum overshoots the remaining {:.1} MW \
                 by {:.1} MW, earlier units can only give back {:.1} MW",
                unit.name, unit.pmin, self.remaining, overshoot, reduced
            )));
        }
        self.remaining = 0.0;
        Ok(())
    }

    /// Phase C: tops up units with headroom, cheapest first, until the load
    /// is met. Idle units only take a top-up that reaches their minimum.
    fn fine_fill(&mut self) -> Result<(), DispatchError> {
        if self.remaining <= EPSILON {
            return Ok(());
        }
        for (pos, unit) in self.units.iter().enumerate() {
            if self.remaining <= EPSILON {
                break;
            }
            let current = self.allocation.output[pos];
            let headroom = unit.pmax - current;
            if headroom <= EPSILON {
                continue;
            }
            let add = headroom.min(self.remaining);
            if !self.allocation.activated[pos] && current + add < unit.pmin - EPSILON {
                continue;
            }
            self.allocation.output[pos] = current + add;
            self.allocation.activated[pos] = true;
            self.remaining -= add;
            debug!(unit = %unit.name, add, remaining = self.remaining, "fine fill");
        }

        if self.remaining > EPSILON {
            return Err(DispatchError::InfeasiblePmin(format!(
                "{:.1} MW left unserved after fine fill",
                self.remaining
            )));
        }
        Ok(())
    }
}

/// Allocates `load` across `units`, which must already be in merit order.
///
/// # Errors
///
/// Returns [`DispatchError::InfeasiblePmin`] when a minimum output overshoot
/// cannot be given back by earlier units, or when demand is left unserved.
pub fn dispatch(load: f64, units: &[EffectiveUnit]) -> Result<Allocation, DispatchError> {
    let mut dispatcher = Dispatcher::new(load, units);
    dispatcher.wind_first();
    dispatcher.merit_pass()?;
    dispatcher.fine_fill()?;
    Ok(dispatcher.allocation)
}
