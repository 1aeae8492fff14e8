use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use everlend_strategies::{
    error::{StrategyError, StrategyResult},
    pool::PoolProvider,
    state::PoolAccount,
};
use solana_program::pubkey::Pubkey;

use super::unavailable;

/// In-memory pool market
#[derive(Default)]
pub struct TestPools {
    pub pools: Vec<PoolAccount>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl TestPools {
    pub fn new(pools: Vec<PoolAccount>) -> Self {
        Self {
            pools,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PoolProvider for TestPools {
    async fn find_pools(&self, pool_market: &Pubkey) -> StrategyResult<Vec<PoolAccount>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(unavailable("rpc unavailable"));
        }

        Ok(self
            .pools
            .iter()
            .filter(|pool| pool.data.pool_market == *pool_market)
            .cloned()
            .collect())
    }

    async fn get_pool(&self, pool: &Pubkey) -> StrategyResult<PoolAccount> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(unavailable("rpc unavailable"));
        }

        self.pools
            .iter()
            .find(|account| account.pubkey == *pool)
            .cloned()
            .ok_or(StrategyError::InvalidPoolAccount(*pool))
    }
}
