//! Reallocation executor.
//!
//! Submits the `reinvest(symbol)` call to the strategist contract from
//! the configured account with a fixed gas budget. Submission is
//! fire-and-forget: the executor returns once the node acknowledges the
//! transaction and hands back its hash; it does not wait for on-chain
//! confirmation.

use alloy::primitives::{Address, TxHash};
use alloy::providers::DynProvider;
use alloy::sol;
use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::types::RotorError;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract IStrategist {
        function reinvest(string calldata symbol) external;
    }
}

/// Abstraction over the reallocation venue, so the decision loop can be
/// exercised without a chain.
#[async_trait]
pub trait Reallocator: Send + Sync {
    /// Submit a reinvest for `symbol`. Returns the transaction hash on
    /// submission acknowledgment.
    async fn reinvest(&self, symbol: &str) -> Result<TxHash>;
}

/// `Reallocator` backed by the on-chain strategist contract.
#[derive(Clone)]
pub struct StrategistExecutor {
    provider: DynProvider,
    strategist: Address,
    from: Address,
    gas_limit: u64,
}

impl StrategistExecutor {
    pub fn new(provider: DynProvider, strategist: Address, from: Address, gas_limit: u64) -> Self {
        Self {
            provider,
            strategist,
            from,
            gas_limit,
        }
    }
}

#[async_trait]
impl Reallocator for StrategistExecutor {
    async fn reinvest(&self, symbol: &str) -> Result<TxHash> {
        let strategist = IStrategist::new(self.strategist, self.provider.clone());

        let pending = strategist
            .reinvest(symbol.to_string())
            .from(self.from)
            .gas(self.gas_limit)
            .send()
            .await
            .map_err(|e| RotorError::Transaction(e.to_string()))?;

        let hash = *pending.tx_hash();
        info!(%hash, symbol, "Reinvest submitted");
        Ok(hash)
    }
}
