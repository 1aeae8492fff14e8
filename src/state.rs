//! General pool account state
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::error::{StrategyError, StrategyResult};

/// General pool program account type
#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshDeserialize, BorshSerialize)]
pub enum AccountType {
    /// Zeroed account
    Uninitialized,
    /// Pool market
    PoolMarket,
    /// Pool
    Pool,
    /// Withdrawal requests queue
    WithdrawRequests,
    /// Single withdrawal request
    WithdrawRequest,
}

impl Default for AccountType {
    fn default() -> Self {
        AccountType::Uninitialized
    }
}

/// General pool
#[derive(Clone, Debug, PartialEq, Eq, BorshDeserialize, BorshSerialize, Default)]
pub struct Pool {
    /// Account type
    pub account_type: AccountType,
    /// Pool market
    pub pool_market: Pubkey,
    /// Underlying token mint
    pub token_mint: Pubkey,
    /// Token account holding pool liquidity
    pub token_account: Pubkey,
    /// Mint of the share token depositors receive
    pub pool_mint: Pubkey,
    /// Amount currently lent out to money markets
    pub total_amount_borrowed: u64,
}

impl Pool {
    // 1 + 32 + 32 + 32 + 32 + 8
    /// LEN
    pub const LEN: usize = 137;

    /// Offset of `pool_market` inside the serialized account
    pub const POOL_MARKET_OFFSET: usize = 1;

    /// Decode account data, rejecting anything that is not an initialized pool
    pub fn unpack(pubkey: &Pubkey, data: &[u8]) -> StrategyResult<Self> {
        let pool = Self::try_from_slice(data.get(..Self::LEN).unwrap_or(data))
            .map_err(|_| StrategyError::InvalidPoolAccount(*pubkey))?;
        if pool.account_type != AccountType::Pool {
            return Err(StrategyError::InvalidPoolAccount(*pubkey));
        }

        Ok(pool)
    }
}

/// Pool data together with its address
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolAccount {
    /// Pool address
    pub pubkey: Pubkey,
    /// Decoded pool data
    pub data: Pool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_len_matches_layout() {
        let pool = Pool {
            account_type: AccountType::Pool,
            ..Default::default()
        };
        assert_eq!(borsh::to_vec(&pool).unwrap().len(), Pool::LEN);
    }

    #[test]
    fn pool_market_offset() {
        let market = Pubkey::new_unique();
        let pool = Pool {
            account_type: AccountType::Pool,
            pool_market: market,
            ..Default::default()
        };
        let data = borsh::to_vec(&pool).unwrap();
        assert_eq!(
            &data[Pool::POOL_MARKET_OFFSET..Pool::POOL_MARKET_OFFSET + 32],
            market.as_ref()
        );
    }

    #[test]
    fn unpack_rejects_other_accounts() {
        let pubkey = Pubkey::new_unique();
        let data = borsh::to_vec(&Pool::default()).unwrap();
        assert!(matches!(
            Pool::unpack(&pubkey, &data),
            Err(StrategyError::InvalidPoolAccount(key)) if key == pubkey
        ));
        assert!(Pool::unpack(&pubkey, &[1, 2, 3]).is_err());
    }
}
