//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Secrets (the keystore password) are referenced by env-var name in the
//! config and resolved at runtime via `std::env::var`.

use alloy::primitives::Address;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

use crate::types::RotorError;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub controller: ControllerConfig,
    pub chain: ChainConfig,
    pub pools: Vec<PoolConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ControllerConfig {
    /// Seconds between cycle starts.
    #[serde(default = "default_cycle_interval")]
    pub cycle_interval_secs: u64,
    /// Delay between consecutive probe invocations within a cycle.
    #[serde(default = "default_stagger")]
    pub stagger_secs: u64,
    /// Minimum APY improvement (absolute, in percent) before reallocating.
    #[serde(default = "default_margin")]
    pub hysteresis_margin: f64,
    /// APY the controller starts from before any reallocation; the first
    /// winner must beat this by the margin.
    #[serde(default = "default_initial_apy")]
    pub initial_apy: f64,
    /// Per-probe deadline; a slower probe is dropped from the cycle.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
    /// Abort the cycle's decision if fewer probes than this succeed.
    #[serde(default = "default_min_observations")]
    pub min_observations: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChainConfig {
    pub rpc_url: String,
    /// Strategy contract the reinvest call is sent to.
    pub strategist_address: Address,
    /// Lens contract the probe reads pool APYs from.
    pub lens_address: Address,
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
    pub keystore_path: String,
    /// Name of the env var holding the keystore password.
    pub keystore_password_env: String,
}

/// One watched pool. List order defines probe stagger order.
#[derive(Debug, Deserialize, Clone)]
pub struct PoolConfig {
    pub address: Address,
    pub reward_asset: Address,
    /// Symbol the strategist contract expects for this pool.
    pub symbol: String,
}

fn default_cycle_interval() -> u64 {
    3600
}
fn default_stagger() -> u64 {
    1
}
fn default_margin() -> f64 {
    0.05
}
fn default_initial_apy() -> f64 {
    0.0
}
fn default_probe_timeout() -> u64 {
    30
}
fn default_min_observations() -> usize {
    1
}
fn default_gas_limit() -> u64 {
    100_000
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the controller cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.pools.is_empty() {
            return Err(invalid("at least one [[pools]] entry is required"));
        }
        if self.controller.cycle_interval_secs == 0 {
            return Err(invalid("cycle_interval_secs must be > 0"));
        }
        if self.controller.hysteresis_margin < 0.0 {
            return Err(invalid("hysteresis_margin must be >= 0"));
        }
        if self.controller.initial_apy < 0.0 {
            return Err(invalid("initial_apy must be >= 0"));
        }
        if self.controller.min_observations > self.pools.len() {
            return Err(invalid(&format!(
                "min_observations ({}) exceeds pool count ({})",
                self.controller.min_observations,
                self.pools.len()
            )));
        }
        Ok(())
    }

    /// Resolve an environment variable name to its value.
    /// Useful for loading secrets referenced in the config.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}

fn invalid(msg: &str) -> anyhow::Error {
    RotorError::Config(msg.to_string()).into()
}
