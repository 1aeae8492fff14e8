//! General pool instruction types

use crate::general_pool::{
    find_program_address, find_transit_program_address, find_withdrawal_request_program_address,
    find_withdrawal_requests_program_address,
};
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program, sysvar,
};

/// Instructions of the general pool program, in program order.
///
/// The Borsh tag of each variant is its position, so variants this crate never
/// builds are still listed.
#[derive(BorshSerialize, BorshDeserialize, PartialEq, Debug, Clone)]
pub enum GeneralPoolInstruction {
    /// Initialize a pool market
    InitPoolMarket,

    /// Create a pool for a token mint
    CreatePool,

    /// Allow a borrower to take a share of the pool
    CreatePoolBorrowAuthority {
        /// Share in basis points
        share_allowed: u16,
    },

    /// Change a borrower's share of the pool
    UpdatePoolBorrowAuthority {
        /// Share in basis points
        share_allowed: u16,
    },

    /// Remove a borrower
    DeletePoolBorrowAuthority,

    /// Deposit liquidity into a pool and mint pool tokens
    ///
    /// Accounts:
    /// [R] Registry
    /// [R] Pool market
    /// [R] Pool
    /// [W] Source account (for token mint)
    /// [W] Destination account (for pool mint)
    /// [W] Pool token account
    /// [W] Pool mint
    /// [R] Pool market authority
    /// [RS] User transfer authority
    /// [R] Token program id
    Deposit {
        /// Amount of liquidity to deposit
        amount: u64,
    },

    /// Settle a queued withdrawal request
    Withdraw,

    /// Queue a withdrawal, moving pool tokens into transit
    ///
    /// Accounts:
    /// [R] Registry
    /// [R] Pool market
    /// [R] Pool
    /// [W] Pool mint
    /// [W] Withdrawal requests
    /// [W] Withdrawal request
    /// [W] Source account (for pool mint)
    /// [W] Destination account (for token mint)
    /// [R] Pool token account
    /// [W] Collateral transit
    /// [WS] User transfer authority
    /// [R] Rent sysvar
    /// [R] System program
    /// [R] Token program id
    WithdrawRequest {
        /// Amount of pool tokens to redeem
        collateral_amount: u64,
    },

    /// Cancel a queued withdrawal request
    CancelWithdrawRequest,

    /// Borrow liquidity as a registered borrower
    Borrow {
        /// Amount to borrow
        amount: u64,
    },

    /// Repay borrowed liquidity
    Repay {
        /// Principal repaid
        amount: u64,
        /// Interest repaid
        interest_amount: u64,
    },
}

/// Create `Deposit` instruction
#[allow(clippy::too_many_arguments)]
pub fn deposit(
    program_id: &Pubkey,
    registry: &Pubkey,
    pool_market: &Pubkey,
    pool: &Pubkey,
    source: &Pubkey,
    destination: &Pubkey,
    token_account: &Pubkey,
    pool_mint: &Pubkey,
    user_transfer_authority: &Pubkey,
    amount: u64,
) -> Result<Instruction, ProgramError> {
    let init_data = GeneralPoolInstruction::Deposit { amount };
    let data =
        borsh::to_vec(&init_data).map_err(|e| ProgramError::BorshIoError(e.to_string()))?;
    let (pool_market_authority, _) = find_program_address(program_id, pool_market);

    let accounts = vec![
        AccountMeta::new_readonly(*registry, false),
        AccountMeta::new_readonly(*pool_market, false),
        AccountMeta::new_readonly(*pool, false),
        AccountMeta::new(*source, false),
        AccountMeta::new(*destination, false),
        AccountMeta::new(*token_account, false),
        AccountMeta::new(*pool_mint, false),
        AccountMeta::new_readonly(pool_market_authority, false),
        AccountMeta::new_readonly(*user_transfer_authority, true),
        AccountMeta::new_readonly(spl_token::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create `WithdrawRequest` instruction
#[allow(clippy::too_many_arguments)]
pub fn withdraw_request(
    program_id: &Pubkey,
    registry: &Pubkey,
    pool_market: &Pubkey,
    pool: &Pubkey,
    pool_mint: &Pubkey,
    token_mint: &Pubkey,
    source: &Pubkey,
    destination: &Pubkey,
    token_account: &Pubkey,
    user_transfer_authority: &Pubkey,
    collateral_amount: u64,
) -> Result<Instruction, ProgramError> {
    let init_data = GeneralPoolInstruction::WithdrawRequest { collateral_amount };
    let data =
        borsh::to_vec(&init_data).map_err(|e| ProgramError::BorshIoError(e.to_string()))?;
    let (withdrawal_requests, _) =
        find_withdrawal_requests_program_address(program_id, pool_market, token_mint);
    let (withdrawal_request, _) = find_withdrawal_request_program_address(
        program_id,
        &withdrawal_requests,
        user_transfer_authority,
    );
    let (collateral_transit, _) = find_transit_program_address(program_id, pool_market, pool_mint);

    let accounts = vec![
        AccountMeta::new_readonly(*registry, false),
        AccountMeta::new_readonly(*pool_market, false),
        AccountMeta::new_readonly(*pool, false),
        AccountMeta::new(*pool_mint, false),
        AccountMeta::new(withdrawal_requests, false),
        AccountMeta::new(withdrawal_request, false),
        AccountMeta::new(*source, false),
        AccountMeta::new(*destination, false),
        AccountMeta::new_readonly(*token_account, false),
        AccountMeta::new(collateral_transit, false),
        AccountMeta::new(*user_transfer_authority, true),
        AccountMeta::new_readonly(sysvar::rent::id(), false),
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new_readonly(spl_token::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}
