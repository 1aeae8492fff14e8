//! General pool transaction builders
//!
//! Each builder returns the ordered instructions of one user transaction. The
//! owner is both fee payer and transfer authority, so the instructions can be
//! executed by a governance treasury as well as by a wallet.

use crate::{general_pool, instruction, state::PoolAccount};
use solana_program::{instruction::Instruction, pubkey::Pubkey, system_instruction};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account_idempotent,
};

use crate::error::StrategyResult;

/// Deposit `amount` of the pool token from `source`. Pool tokens are minted to the
/// owner's associated account for the pool mint, which is created when missing.
pub fn prepare_deposit_tx(
    owner: &Pubkey,
    pool: &PoolAccount,
    registry: &Pubkey,
    amount: u64,
    source: &Pubkey,
) -> StrategyResult<Vec<Instruction>> {
    let destination = get_associated_token_address(owner, &pool.data.pool_mint);

    Ok(vec![
        create_associated_token_account_idempotent(
            owner,
            owner,
            &pool.data.pool_mint,
            &spl_token::id(),
        ),
        instruction::deposit(
            &general_pool::id(),
            registry,
            &pool.data.pool_market,
            &pool.pubkey,
            source,
            &destination,
            &pool.data.token_account,
            &pool.data.pool_mint,
            owner,
            amount,
        )?,
    ])
}

/// Deposit `amount` lamports held directly by the owner. The lamports are wrapped
/// into `source` (the owner's wrapped SOL associated account) before depositing,
/// and pool tokens land in `destination`.
pub fn prepare_sol_deposit_tx(
    owner: &Pubkey,
    pool: &PoolAccount,
    registry: &Pubkey,
    amount: u64,
    source: &Pubkey,
    destination: &Pubkey,
) -> StrategyResult<Vec<Instruction>> {
    Ok(vec![
        create_associated_token_account_idempotent(
            owner,
            owner,
            &spl_token::native_mint::id(),
            &spl_token::id(),
        ),
        system_instruction::transfer(owner, source, amount),
        spl_token::instruction::sync_native(&spl_token::id(), source)?,
        create_associated_token_account_idempotent(
            owner,
            owner,
            &pool.data.pool_mint,
            &spl_token::id(),
        ),
        instruction::deposit(
            &general_pool::id(),
            registry,
            &pool.data.pool_market,
            &pool.pubkey,
            source,
            destination,
            &pool.data.token_account,
            &pool.data.pool_mint,
            owner,
            amount,
        )?,
    ])
}

/// Request withdrawal of `collateral_amount` pool tokens held in `source`.
///
/// Underlying tokens are paid to `destination` as given, or to the owner's
/// associated account for the token mint when no destination is given.
pub fn prepare_withdrawal_request_tx(
    owner: &Pubkey,
    pool: &PoolAccount,
    registry: &Pubkey,
    collateral_amount: u64,
    source: &Pubkey,
    destination: Option<&Pubkey>,
) -> StrategyResult<Vec<Instruction>> {
    let destination = match destination {
        Some(wallet) => *wallet,
        None => get_associated_token_address(owner, &pool.data.token_mint),
    };

    Ok(vec![instruction::withdraw_request(
        &general_pool::id(),
        registry,
        &pool.data.pool_market,
        &pool.pubkey,
        &pool.data.pool_mint,
        &pool.data.token_mint,
        source,
        &destination,
        &pool.data.token_account,
        owner,
        collateral_amount,
    )?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AccountType, Pool};

    fn pool() -> PoolAccount {
        PoolAccount {
            pubkey: Pubkey::new_unique(),
            data: Pool {
                account_type: AccountType::Pool,
                pool_market: Pubkey::new_unique(),
                token_mint: spl_token::native_mint::id(),
                token_account: Pubkey::new_unique(),
                pool_mint: Pubkey::new_unique(),
                total_amount_borrowed: 0,
            },
        }
    }

    #[test]
    fn deposit_ends_with_pool_deposit() {
        let owner = Pubkey::new_unique();
        let pool = pool();
        let source = get_associated_token_address(&owner, &pool.data.token_mint);
        let ixs = prepare_deposit_tx(&owner, &pool, &Pubkey::new_unique(), 10, &source).unwrap();

        assert_eq!(ixs.len(), 2);
        assert_eq!(ixs[0].program_id, spl_associated_token_account::id());
        assert_eq!(ixs[1].program_id, general_pool::id());
    }

    #[test]
    fn sol_deposit_wraps_before_depositing() {
        let owner = Pubkey::new_unique();
        let pool = pool();
        let source = get_associated_token_address(&owner, &pool.data.token_mint);
        let destination = get_associated_token_address(&owner, &pool.data.pool_mint);
        let ixs = prepare_sol_deposit_tx(
            &owner,
            &pool,
            &Pubkey::new_unique(),
            1_000,
            &source,
            &destination,
        )
        .unwrap();

        let programs: Vec<_> = ixs.iter().map(|ix| ix.program_id).collect();
        assert_eq!(
            programs,
            vec![
                spl_associated_token_account::id(),
                solana_program::system_program::id(),
                spl_token::id(),
                spl_associated_token_account::id(),
                general_pool::id(),
            ]
        );
        assert_eq!(ixs[1].accounts[1].pubkey, source);
    }

    #[test]
    fn withdrawal_destination_defaults_to_owner_token_account() {
        let owner = Pubkey::new_unique();
        let pool = pool();
        let source = get_associated_token_address(&owner, &pool.data.pool_mint);
        let expected = get_associated_token_address(&owner, &pool.data.token_mint);

        let ixs =
            prepare_withdrawal_request_tx(&owner, &pool, &Pubkey::new_unique(), 5, &source, None)
                .unwrap();
        assert_eq!(ixs.len(), 1);
        assert_eq!(ixs[0].accounts[7].pubkey, expected);

        let other = Pubkey::new_unique();
        let ixs = prepare_withdrawal_request_tx(
            &owner,
            &pool,
            &Pubkey::new_unique(),
            5,
            &source,
            Some(&other),
        )
        .unwrap();
        assert_eq!(ixs[0].accounts[7].pubkey, other);
        assert_ne!(ixs[0].accounts[7].pubkey, expected);
    }
}
