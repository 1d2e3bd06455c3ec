// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! The offered-load schedule followed by every search.

use crate::types::SweepError;

/// Loads closer than this are considered equal when checking the upper bound.
const LOAD_TOLERANCE: f64 = 1e-9;

/// Highest offered load any schedule may reach (flits/node/cycle).
pub const MAX_OFFERED_LOAD: f64 = 1.0;

/// Offered load starts at `start` and rises by `step` per probe, never
/// passing `max_offered_load`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoadSchedule {
    start: f64,
    step: f64,
    max_offered_load: f64,
}

impl Default for LoadSchedule {
    fn default() -> Self {
        Self {
            start: 0.02,
            step: 0.02,
            max_offered_load: 1.0,
        }
    }
}

impl LoadSchedule {
    pub fn new(start: f64, step: f64, max_offered_load: f64) -> Result<Self, SweepError> {
        if !(start > 0.0 && start.is_finite()) {
            return Err(SweepError::InvalidConfig(format!(
                "start load must be positive, got {start}"
            )));
        }
        if !(step > 0.0 && step.is_finite()) {
            return Err(SweepError::InvalidConfig(format!(
                "load step must be positive, got {step}"
            )));
        }
        if !(max_offered_load <= MAX_OFFERED_LOAD + LOAD_TOLERANCE) {
            return Err(SweepError::InvalidConfig(format!(
                "maximum offered load must not exceed {MAX_OFFERED_LOAD}, got {max_offered_load}"
            )));
        }
        if start > max_offered_load + LOAD_TOLERANCE {
            return Err(SweepError::InvalidConfig(format!(
                "start load {start} is above the maximum offered load {max_offered_load}"
            )));
        }
        Ok(Self {
            start,
            step,
            max_offered_load,
        })
    }

    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[must_use]
    pub fn max_offered_load(&self) -> f64 {
        self.max_offered_load
    }

    /// Offered load of the probe at position `probe_idx`.
    ///
    /// Computed from the index rather than accumulated so that rounding
    /// errors cannot build up over a long search.
    #[must_use]
    pub fn load_at(&self, probe_idx: usize) -> f64 {
        self.start + self.step * probe_idx as f64
    }

    /// Number of probes that fit below the upper bound.
    #[must_use]
    pub fn num_probes(&self) -> usize {
        let steps = ((self.max_offered_load - self.start) / self.step + LOAD_TOLERANCE).floor();
        (steps as usize).saturating_add(1)
    }

    /// Iterate over every load in the schedule.
    pub fn loads(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        (0..self.num_probes()).map(|i| (i, self.load_at(i)))
    }
}
