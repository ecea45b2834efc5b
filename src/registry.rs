//! Static pool registry.
//!
//! An ordered, read-only table of the pools the controller watches.
//! Registry order defines the probe stagger order within a cycle. The
//! address→symbol mapping the strategist contract needs lives here too.

use alloy::primitives::Address;
use anyhow::Result;

use crate::config::PoolConfig;
use crate::types::PoolDescriptor;

/// Ordered, immutable set of watched pools.
#[derive(Debug, Clone)]
pub struct PoolRegistry {
    pools: Vec<PoolDescriptor>,
}

impl PoolRegistry {
    /// Build the registry from configuration, preserving list order.
    pub fn from_config(pools: &[PoolConfig]) -> Result<Self> {
        if pools.is_empty() {
            anyhow::bail!("Pool registry cannot be empty");
        }
        for (i, a) in pools.iter().enumerate() {
            for b in &pools[i + 1..] {
                if a.address == b.address {
                    anyhow::bail!("Duplicate pool address in registry: {}", a.address);
                }
            }
        }

        Ok(Self {
            pools: pools
                .iter()
                .map(|p| PoolDescriptor {
                    address: p.address,
                    reward_asset: p.reward_asset,
                    symbol: p.symbol.clone(),
                })
                .collect(),
        })
    }

    /// All pools, in stagger order.
    pub fn pools(&self) -> &[PoolDescriptor] {
        &self.pools
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Symbol the strategist contract expects for a pool address.
    pub fn symbol_of(&self, pool: Address) -> Option<&str> {
        self.pools
            .iter()
            .find(|p| p.address == pool)
            .map(|p| p.symbol.as_str())
    }
}
