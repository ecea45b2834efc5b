//! Cycle controller — the probe → select → decide → reallocate loop.
//!
//! One `run_cycle` call is one full cycle: staggered probe fan-out over
//! the registry, aggregation in completion order, hysteresis-gated
//! decision, and (if accepted) reinvest submission. Cycles are
//! single-flight: the caller awaits `run_cycle` before letting the next
//! interval tick start a new one, so `ControllerState` is never touched
//! by two cycles at once.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::config::ControllerConfig;
use crate::engine::executor::Reallocator;
use crate::engine::{gate, selection::Selection};
use crate::probe::YieldProbe;
use crate::registry::PoolRegistry;
use crate::types::{
    ControllerState, CycleReport, Decision, PoolDescriptor, PoolObservation, RotorError,
};

/// Timing and threshold knobs for the decision loop.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// Delay between consecutive probe invocations within a cycle.
    pub stagger: Duration,
    /// Per-probe deadline; a probe that misses it is excluded from the
    /// cycle's selection.
    pub probe_timeout: Duration,
    /// Minimum APY improvement (absolute) before reallocating.
    pub hysteresis_margin: f64,
    /// APY the controller starts from before any reallocation.
    pub initial_apy: f64,
    /// Abort the cycle's decision if fewer probes than this succeed.
    pub min_observations: usize,
}

impl ControllerSettings {
    pub fn from_config(cfg: &ControllerConfig) -> Self {
        Self {
            stagger: Duration::from_secs(cfg.stagger_secs),
            probe_timeout: Duration::from_secs(cfg.probe_timeout_secs),
            hysteresis_margin: cfg.hysteresis_margin,
            initial_apy: cfg.initial_apy,
            min_observations: cfg.min_observations,
        }
    }
}

/// Drives the decision loop over a fixed pool registry.
pub struct Controller {
    registry: Arc<PoolRegistry>,
    probe: Arc<dyn YieldProbe>,
    reallocator: Arc<dyn Reallocator>,
    settings: ControllerSettings,
    state: ControllerState,
    cycle_count: u64,
}

impl Controller {
    pub fn new(
        registry: Arc<PoolRegistry>,
        probe: Arc<dyn YieldProbe>,
        reallocator: Arc<dyn Reallocator>,
        settings: ControllerSettings,
    ) -> Self {
        let state = ControllerState::starting_at(settings.initial_apy);
        Self {
            registry,
            probe,
            reallocator,
            settings,
            state,
            cycle_count: 0,
        }
    }

    /// The active pool and APY as of the last accepted reallocation.
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn cycles_run(&self) -> u64 {
        self.cycle_count
    }

    /// Run one full probe → select → decide cycle.
    ///
    /// A probe error or timeout drops that pool from the selection; the
    /// cycle still decides on the remaining observations. A reinvest
    /// submission failure propagates as the cycle's error and leaves
    /// the state untouched.
    pub async fn run_cycle(&mut self) -> Result<CycleReport> {
        self.cycle_count += 1;
        let cycle = self.cycle_count;
        info!(cycle, pools = self.registry.len(), "Starting cycle");

        let mut tasks = self.spawn_probes();

        // Drain in completion order — the selection's `>=` tie-break
        // depends on it.
        let mut selection = Selection::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((pool, Ok(apy))) => {
                    info!(pool = %pool, apy, "APY observed");
                    selection.observe(PoolObservation {
                        descriptor: pool,
                        apy,
                    });
                }
                Ok((pool, Err(e))) => {
                    warn!(pool = %pool, error = %e, "Probe failed, excluded from selection");
                    selection.record_failure();
                }
                Err(e) => {
                    warn!(error = %e, "Probe task aborted");
                    selection.record_failure();
                }
            }
        }

        let observed = selection.observed();
        let failed = selection.failed();

        let Some(result) = selection.finish(self.settings.min_observations) else {
            warn!(
                cycle,
                observed,
                failed,
                min = self.settings.min_observations,
                "Too few observations, skipping decision"
            );
            return Ok(CycleReport {
                cycle_number: cycle,
                observed,
                failed,
                decision: None,
                tx_hash: None,
            });
        };

        info!(
            best_pool = %result.best.descriptor.address,
            best_apy = result.best.apy,
            "Cycle winner"
        );

        let decision = gate::evaluate(&self.state, &result, self.settings.hysteresis_margin);

        let tx_hash = match &decision {
            Decision::Reallocate { pool, apy } => {
                let symbol = self.registry.symbol_of(*pool).ok_or_else(|| {
                    RotorError::Config(format!("No symbol registered for pool {pool}"))
                })?;
                let hash = self.reallocator.reinvest(symbol).await?;
                // State moves only once the submission was acknowledged.
                self.state.apply(*pool, *apy);
                info!(pool = %pool, apy, symbol, "Reallocated");
                Some(hash)
            }
            Decision::Hold {
                best_apy,
                current_apy,
            } => {
                info!(best_apy, current_apy, "Holding current pool");
                None
            }
        };

        Ok(CycleReport {
            cycle_number: cycle,
            observed,
            failed,
            decision: Some(decision),
            tx_hash,
        })
    }

    /// Fan out one probe task per registry entry. The i-th pool waits
    /// `i * stagger` before invoking the probe — serialization via
    /// delay, to spare the upstream RPC endpoint.
    fn spawn_probes(&self) -> JoinSet<(PoolDescriptor, Result<f64>)> {
        let mut tasks = JoinSet::new();

        for (i, pool) in self.registry.pools().iter().cloned().enumerate() {
            let probe = Arc::clone(&self.probe);
            let delay = self.settings.stagger * i as u32;
            let deadline = self.settings.probe_timeout;

            tasks.spawn(async move {
                tokio::time::sleep(delay).await;
                let outcome = match tokio::time::timeout(
                    deadline,
                    probe.probe(pool.address, pool.reward_asset),
                )
                .await
                {
                    Ok(res) => res,
                    Err(_) => Err(RotorError::ProbeTimeout { pool: pool.address }.into()),
                };
                (pool, outcome)
            });
        }

        tasks
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
