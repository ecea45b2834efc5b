//! Best-of-cycle selection.
//!
//! Folds pool observations in probe completion order and keeps the
//! running best. The comparison is `>=` on purpose: an observation that
//! ties the current best replaces it, so ties resolve to the most
//! recently completed probe, not to registry order.

use crate::types::{CycleResult, PoolObservation};

/// Accumulator for one cycle's observations. Created fresh per cycle,
/// never reused.
#[derive(Debug, Default)]
pub struct Selection {
    best: Option<PoolObservation>,
    observed: usize,
    failed: usize,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in a successful observation, in completion order.
    pub fn observe(&mut self, obs: PoolObservation) {
        self.observed += 1;
        let replaces = match &self.best {
            Some(best) => obs.apy >= best.apy,
            None => true,
        };
        if replaces {
            self.best = Some(obs);
        }
    }

    /// Record a probe that errored or timed out; it takes no part in
    /// the selection.
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    pub fn observed(&self) -> usize {
        self.observed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Close the cycle. Returns `None` if fewer than `min_observations`
    /// probes succeeded, in which case no decision should be made.
    pub fn finish(self, min_observations: usize) -> Option<CycleResult> {
        if self.observed < min_observations {
            return None;
        }
        self.best.map(|best| CycleResult {
            best,
            observed: self.observed,
            failed: self.failed,
        })
    }
}
