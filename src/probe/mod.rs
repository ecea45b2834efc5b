//! Yield probes.
//!
//! Defines the `YieldProbe` trait and the on-chain lens implementation.
//! The controller never computes an APY itself; it asks a probe for a
//! single reading per pool per cycle.

pub mod lens;

use alloy::primitives::Address;
use anyhow::Result;
use async_trait::async_trait;

/// Abstraction over APY data sources.
///
/// A probe returns one annualized yield reading (in percent) for a pool
/// and its reward asset. Implementations are expected to be slow and
/// fallible; the controller wraps every call in a deadline and treats
/// errors as a missing observation for that pool.
#[async_trait]
pub trait YieldProbe: Send + Sync {
    async fn probe(&self, pool: Address, reward_asset: Address) -> Result<f64>;
}
