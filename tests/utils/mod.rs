#![allow(dead_code)]

use std::{io, sync::Mutex};

use async_trait::async_trait;
use everlend_strategies::{
    apy::{ApyProvider, ApyRecord},
    error::{StrategyError, StrategyResult},
    governance::{
        get_proposal_address, AssetAccount, GovernanceAccount, GovernanceConfig, ProposalCreator,
        ProposalRequest,
    },
    state::{AccountType, Pool, PoolAccount},
    token::{TokenInfo, TokenList},
};
use solana_program::pubkey::Pubkey;

pub mod pools;

pub use pools::TestPools;

pub const HOLD_UP_TIME: u32 = 86_400;

pub fn unavailable(what: &str) -> StrategyError {
    StrategyError::Io(io::Error::new(io::ErrorKind::Other, what.to_string()))
}

pub fn pool_account(pool_market: &Pubkey, token_mint: &Pubkey) -> PoolAccount {
    PoolAccount {
        pubkey: Pubkey::new_unique(),
        data: Pool {
            account_type: AccountType::Pool,
            pool_market: *pool_market,
            token_mint: *token_mint,
            token_account: Pubkey::new_unique(),
            pool_mint: Pubkey::new_unique(),
            total_amount_borrowed: 0,
        },
    }
}

pub fn token(mint: &Pubkey, symbol: &str) -> TokenInfo {
    TokenInfo {
        address: mint.to_string(),
        symbol: symbol.to_string(),
        name: symbol.to_string(),
        logo_uri: Some(format!("https://example.com/{}.png", symbol)),
    }
}

pub fn token_list(tokens: Vec<TokenInfo>) -> TokenList {
    TokenList::from_tokens(tokens)
}

pub fn sol_treasury() -> AssetAccount {
    AssetAccount {
        pubkey: Pubkey::new_unique(),
        is_sol: true,
        governance: Some(GovernanceAccount {
            pubkey: Pubkey::new_unique(),
            config: Some(GovernanceConfig {
                min_instruction_hold_up_time: HOLD_UP_TIME,
            }),
        }),
        token_account_owner: None,
    }
}

pub fn token_treasury(owner: &Pubkey) -> AssetAccount {
    AssetAccount {
        is_sol: false,
        token_account_owner: Some(*owner),
        ..sol_treasury()
    }
}

/// Fixed APY response
#[derive(Default)]
pub struct StaticApys {
    pub records: Vec<ApyRecord>,
    pub fail: bool,
}

impl StaticApys {
    pub fn new(records: &[(&str, Option<f64>)]) -> Self {
        Self {
            records: records
                .iter()
                .map(|(token, supply_apy)| ApyRecord {
                    token: token.to_string(),
                    supply_apy: *supply_apy,
                })
                .collect(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl ApyProvider for StaticApys {
    async fn fetch_apys(&self) -> StrategyResult<Vec<ApyRecord>> {
        if self.fail {
            return Err(unavailable("apy endpoint down"));
        }
        Ok(self.records.clone())
    }
}

/// Records proposal requests and answers with the derived proposal address
#[derive(Default)]
pub struct RecordingProposalCreator {
    pub governance_program: Pubkey,
    pub requests: Mutex<Vec<ProposalRequest>>,
    pub fail: bool,
}

impl RecordingProposalCreator {
    pub fn new() -> Self {
        Self {
            governance_program: Pubkey::new_unique(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn requests(&self) -> Vec<ProposalRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProposalCreator for RecordingProposalCreator {
    async fn create_proposal(&self, request: ProposalRequest) -> StrategyResult<Pubkey> {
        if self.fail {
            return Err(StrategyError::Proposal("rejected".to_string()));
        }

        let address = get_proposal_address(
            &self.governance_program,
            &request.governance,
            &request.governing_token_mint,
            request.proposal_index,
        );
        self.requests.lock().unwrap().push(request);
        Ok(address)
    }
}
