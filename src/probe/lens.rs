//! On-chain APY lens probe.
//!
//! Reads a pool's annualized yield from a deployed lens contract. The
//! lens does the actual rate math on-chain and returns a fixed-point
//! percentage scaled by 1e6 (5_040_000 → 5.04% APY).

use alloy::primitives::{Address, U256};
use alloy::providers::DynProvider;
use alloy::sol;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::YieldProbe;
use crate::types::RotorError;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract IApyLens {
        function poolApy(address pool, address rewardAsset) external view returns (uint256);
    }
}

/// Fixed-point scale of the lens return value.
const APY_SCALE: f64 = 1_000_000.0;

/// `YieldProbe` backed by the APY lens contract.
#[derive(Clone)]
pub struct LensProbe {
    provider: DynProvider,
    lens: Address,
}

impl LensProbe {
    pub fn new(provider: DynProvider, lens: Address) -> Self {
        Self { provider, lens }
    }

    fn to_percent(raw: U256) -> Result<f64> {
        let raw: u128 = raw
            .try_into()
            .map_err(|_| anyhow::anyhow!("Lens APY value out of range: {raw}"))?;
        Ok(raw as f64 / APY_SCALE)
    }
}

#[async_trait]
impl YieldProbe for LensProbe {
    async fn probe(&self, pool: Address, reward_asset: Address) -> Result<f64> {
        let lens = IApyLens::new(self.lens, self.provider.clone());

        let raw = lens
            .poolApy(pool, reward_asset)
            .call()
            .await
            .map_err(|e| RotorError::Probe {
                pool,
                message: e.to_string(),
            })
            .with_context(|| format!("Lens read failed for pool {pool}"))?;

        let apy = Self::to_percent(raw)?;
        debug!(%pool, apy, "Lens probe returned");
        Ok(apy)
    }
}
