//! Shared types for the ROTOR controller.
//!
//! These types form the data model used across all modules: the static
//! pool descriptors, the per-cycle observations and results, and the
//! long-lived controller state that the hysteresis gate mutates.

use alloy::primitives::{Address, TxHash};
use std::fmt;

// ---------------------------------------------------------------------------
// Pool descriptors and observations
// ---------------------------------------------------------------------------

/// A yield-bearing pool the controller watches.
///
/// Fixed at process start; never mutated. The `symbol` is what the
/// strategist contract's `reinvest` call expects for this pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolDescriptor {
    pub address: Address,
    /// Token in which the pool pays rewards.
    pub reward_asset: Address,
    pub symbol: String,
}

impl fmt::Display for PoolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.symbol, self.address)
    }
}

/// One successful APY reading for one pool, scoped to a single cycle.
///
/// Observations are folded into the selection as probes complete and
/// discarded once the cycle's decision is made.
#[derive(Debug, Clone)]
pub struct PoolObservation {
    pub descriptor: PoolDescriptor,
    /// Annualized yield in percent, e.g. `5.04` for 5.04% APY.
    pub apy: f64,
}

// ---------------------------------------------------------------------------
// Cycle results and decisions
// ---------------------------------------------------------------------------

/// The winner of one cycle, computed fresh from that cycle's observations.
///
/// Never carried across cycles: the controller folds it into
/// [`ControllerState`] through the hysteresis gate and drops it.
#[derive(Debug, Clone)]
pub struct CycleResult {
    pub best: PoolObservation,
    /// Successful observations this cycle.
    pub observed: usize,
    /// Probes that errored or timed out this cycle.
    pub failed: usize,
}

/// Outcome of the hysteresis gate for one cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Margin met: move the position into `pool`. The reinvest symbol is
    /// resolved from the registry at dispatch time.
    Reallocate { pool: Address, apy: f64 },
    /// Margin not met (or nothing to compare): keep the current pool.
    Hold { best_apy: f64, current_apy: f64 },
}

/// Summary of one completed cycle, for logging by the main loop.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle_number: u64,
    pub observed: usize,
    pub failed: usize,
    pub decision: Option<Decision>,
    /// Hash of the submitted reinvest transaction, if one was sent.
    pub tx_hash: Option<TxHash>,
}

// ---------------------------------------------------------------------------
// Controller state
// ---------------------------------------------------------------------------

/// Process-wide state, mutated once per cycle at most.
///
/// `current_apy` is monotone non-decreasing: it only moves when a cycle's
/// winner clears the hysteresis margin, and `current_pool` moves in
/// lock-step with it.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerState {
    pub current_pool: Option<Address>,
    pub current_apy: f64,
}

impl ControllerState {
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    /// Start with no active pool but a configured floor APY; the first
    /// winner must beat this by the hysteresis margin.
    pub fn starting_at(initial_apy: f64) -> Self {
        Self {
            current_pool: None,
            current_apy: initial_apy,
        }
    }

    /// Fold an accepted cycle winner into the state.
    ///
    /// Only the hysteresis gate path calls this, and only after the
    /// reinvest submission was acknowledged.
    pub fn apply(&mut self, pool: Address, apy: f64) {
        debug_assert!(apy >= self.current_apy, "current_apy must not decrease");
        self.current_pool = Some(pool);
        self.current_apy = apy;
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for ROTOR.
#[derive(Debug, thiserror::Error)]
pub enum RotorError {
    /// Keystore decryption or password failure. Fatal at startup.
    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Probe error for pool {pool}: {message}")]
    Probe { pool: Address, message: String },

    #[error("Probe timed out for pool {pool}")]
    ProbeTimeout { pool: Address },

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
