//! Hysteresis gate.
//!
//! Pure decision function between a cycle's winner and the long-lived
//! controller state. Reallocation requires the winner to beat the
//! current APY by at least the configured margin; the boundary case
//! (delta exactly equal to the margin) reallocates. The gate never
//! keys on pool identity — a cycle can re-select the currently active
//! pool if its own APY climbed enough.

use tracing::debug;

use crate::types::{ControllerState, CycleResult, Decision};

/// Decide whether a cycle's winner justifies reallocating.
pub fn evaluate(state: &ControllerState, result: &CycleResult, margin: f64) -> Decision {
    let best = &result.best;

    if best.apy >= state.current_apy + margin {
        Decision::Reallocate {
            pool: best.descriptor.address,
            apy: best.apy,
        }
    } else {
        debug!(
            best_apy = best.apy,
            current_apy = state.current_apy,
            margin,
            "Margin not met"
        );
        Decision::Hold {
            best_apy: best.apy,
            current_apy: state.current_apy,
        }
    }
}
