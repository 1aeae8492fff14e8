//! General pool queries

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_config::RpcProgramAccountsConfig,
    rpc_filter::{Memcmp, RpcFilterType},
};
use solana_program::pubkey::Pubkey;

use crate::{
    error::StrategyResult,
    general_pool,
    state::{Pool, PoolAccount},
};

/// Source of general pool accounts
#[async_trait]
pub trait PoolProvider: Send + Sync {
    /// All pools of `pool_market`
    async fn find_pools(&self, pool_market: &Pubkey) -> StrategyResult<Vec<PoolAccount>>;

    /// A single pool by address
    async fn get_pool(&self, pool: &Pubkey) -> StrategyResult<PoolAccount>;
}

/// Reads pools from a cluster over JSON RPC
pub struct RpcPoolProvider {
    rpc_client: Arc<RpcClient>,
    program_id: Pubkey,
}

impl RpcPoolProvider {
    /// Provider for the deployed general pool program
    pub fn new(rpc_client: Arc<RpcClient>) -> Self {
        Self::with_program_id(rpc_client, general_pool::id())
    }

    /// Provider for a general pool program deployed at `program_id`
    pub fn with_program_id(rpc_client: Arc<RpcClient>, program_id: Pubkey) -> Self {
        Self {
            rpc_client,
            program_id,
        }
    }
}

/// `getProgramAccounts` config selecting the pools of `pool_market`
pub fn pool_market_config(pool_market: &Pubkey) -> RpcProgramAccountsConfig {
    RpcProgramAccountsConfig {
        filters: Some(vec![
            RpcFilterType::DataSize(Pool::LEN as u64),
            RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
                Pool::POOL_MARKET_OFFSET,
                pool_market.as_ref(),
            )),
        ]),
        ..RpcProgramAccountsConfig::default()
    }
}

#[async_trait]
impl PoolProvider for RpcPoolProvider {
    async fn find_pools(&self, pool_market: &Pubkey) -> StrategyResult<Vec<PoolAccount>> {
        let config = pool_market_config(pool_market);
        let accounts = self
            .rpc_client
            .get_program_accounts_with_config(&self.program_id, config)
            .await?;
        debug!("Found {} pools in market {}", accounts.len(), pool_market);

        accounts
            .into_iter()
            .map(|(pubkey, account)| -> StrategyResult<PoolAccount> {
                Ok(PoolAccount {
                    pubkey,
                    data: Pool::unpack(&pubkey, &account.data)?,
                })
            })
            .collect()
    }

    async fn get_pool(&self, pool: &Pubkey) -> StrategyResult<PoolAccount> {
        let data = self.rpc_client.get_account_data(pool).await?;

        Ok(PoolAccount {
            pubkey: *pool,
            data: Pool::unpack(pool, &data)?,
        })
    }
}
