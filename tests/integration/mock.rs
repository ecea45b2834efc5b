//! Mock probe and reallocator for integration testing.
//!
//! Provides deterministic `YieldProbe` and `Reallocator` implementations
//! with scripted per-cycle readings and recorded submissions, all
//! in-memory with no external dependencies.

use alloy::primitives::{Address, TxHash};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use rotor::engine::executor::Reallocator;
use rotor::probe::YieldProbe;

/// A probe that replays a scripted sequence of APY readings per pool.
///
/// Each call pops the next reading for that pool, so successive cycles
/// see successive values. Running off the end of a pool's script is a
/// probe error.
pub struct ScriptedProbe {
    script: Mutex<HashMap<Address, VecDeque<f64>>>,
}

impl ScriptedProbe {
    pub fn new(script: impl IntoIterator<Item = (Address, Vec<f64>)>) -> Self {
        Self {
            script: Mutex::new(
                script
                    .into_iter()
                    .map(|(addr, readings)| (addr, readings.into()))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl YieldProbe for ScriptedProbe {
    async fn probe(&self, pool: Address, _reward_asset: Address) -> Result<f64> {
        self.script
            .lock()
            .unwrap()
            .get_mut(&pool)
            .and_then(|readings| readings.pop_front())
            .ok_or_else(|| anyhow!("No scripted reading left for pool {pool}"))
    }
}

/// Records reinvest submissions; operations can be forced to fail.
#[derive(Default)]
pub struct RecordingReallocator {
    submitted: Mutex<Vec<String>>,
    force_error: Mutex<Option<String>>,
}

impl RecordingReallocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// All symbols submitted so far, in order.
    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }

    /// Force all subsequent submissions to return an error.
    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    /// Clear any forced error.
    pub fn clear_error(&self) {
        *self.force_error.lock().unwrap() = None;
    }
}

#[async_trait]
impl Reallocator for RecordingReallocator {
    async fn reinvest(&self, symbol: &str) -> Result<TxHash> {
        if let Some(msg) = self.force_error.lock().unwrap().clone() {
            return Err(anyhow!(msg));
        }
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(symbol.to_string());
        Ok(TxHash::repeat_byte(submitted.len() as u8))
    }
}
