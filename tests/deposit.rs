mod utils;

use borsh::BorshDeserialize;
use everlend_strategies::{
    action::build_proposal_instructions,
    error::StrategyError,
    general_pool,
    governance::{AssetAccount, ValidatedTreasury},
    handle_everlend_action,
    instruction::GeneralPoolInstruction,
    state::PoolAccount,
    Action, ActionForm, Network, ProposalContext,
};
use solana_program::{instruction::Instruction, pubkey::Pubkey};
use spl_associated_token_account::get_associated_token_address;
use std::convert::TryFrom;
use utils::*;

fn form(pool: &PoolAccount, amount: u64) -> ActionForm {
    ActionForm {
        action: Action::Deposit,
        title: "Deposit into Everlend".to_string(),
        description: "Put idle treasury funds to work".to_string(),
        amount,
        pool_pub_key: pool.pubkey,
        token_mint: pool.data.token_mint,
        pool_mint: pool.data.pool_mint,
    }
}

fn context() -> ProposalContext {
    ProposalContext {
        realm: Pubkey::new_unique(),
        token_owner_record: Pubkey::new_unique(),
        governing_token_mint: Pubkey::new_unique(),
        proposal_index: 7,
        is_draft: false,
        voter_weight_record: None,
    }
}

#[tokio::test]
async fn success_sol() {
    let pool = pool_account(&Network::Dev.pool_market(), &spl_token::native_mint::id());
    let pools = TestPools::new(vec![pool.clone()]);
    let proposals = RecordingProposalCreator::new();
    let treasury = sol_treasury();
    let context = context();

    let address = handle_everlend_action(
        Network::Dev,
        &form(&pool, 1_000_000),
        &treasury,
        &context,
        &pools,
        &proposals,
    )
    .await
    .unwrap();

    let requests = proposals.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    let governance = treasury.governance.as_ref().unwrap().pubkey;
    assert_eq!(request.realm, context.realm);
    assert_eq!(request.governance, governance);
    assert_eq!(request.token_owner_record, context.token_owner_record);
    assert_eq!(request.governing_token_mint, context.governing_token_mint);
    assert_eq!(request.proposal_index, 7);
    assert_eq!(request.title, "Deposit into Everlend");
    assert!(!request.is_draft);
    assert_eq!(
        address,
        everlend_strategies::governance::get_proposal_address(
            &proposals.governance_program,
            &governance,
            &context.governing_token_mint,
            7
        )
    );

    assert!(!request.instructions.is_empty());
    for ix in &request.instructions {
        assert_eq!(ix.hold_up_time, HOLD_UP_TIME);
        assert!(ix.prerequisite_instructions.is_empty());
        assert!(!ix.chunk_split_by_default);
    }

    // Lamports are wrapped into the treasury's wSOL account before the deposit
    let owner = treasury.pubkey;
    let wsol = get_associated_token_address(&owner, &spl_token::native_mint::id());
    let pool_tokens = get_associated_token_address(&owner, &pool.data.pool_mint);
    let instructions: Vec<Instruction> = request
        .instructions
        .iter()
        .map(|ix| ix.data.clone().into())
        .collect();
    assert!(instructions
        .iter()
        .any(|ix| ix.program_id == solana_program::system_program::id()
            && ix.accounts[0].pubkey == owner
            && ix.accounts[1].pubkey == wsol));

    let deposit = instructions.last().unwrap();
    assert_eq!(deposit.program_id, general_pool::id());
    assert_eq!(
        GeneralPoolInstruction::try_from_slice(&deposit.data).unwrap(),
        GeneralPoolInstruction::Deposit { amount: 1_000_000 }
    );
    assert_eq!(deposit.accounts[0].pubkey, Network::Dev.registry());
    assert_eq!(deposit.accounts[3].pubkey, wsol);
    assert_eq!(deposit.accounts[4].pubkey, pool_tokens);
}

#[tokio::test]
async fn success_token() {
    let usdc = Pubkey::new_unique();
    let pool = pool_account(&Network::Mainnet.pool_market(), &usdc);
    let owner = Pubkey::new_unique();
    let treasury = token_treasury(&owner);
    let validated = ValidatedTreasury::try_from(&treasury).unwrap();

    let instructions =
        build_proposal_instructions(Network::Mainnet, &form(&pool, 250), &validated, &pool)
            .unwrap();
    assert!(instructions.setup.is_empty());
    assert!(instructions.cleanup.is_empty());

    let action: Vec<Instruction> = instructions
        .action
        .iter()
        .map(|ix| ix.data.clone().into())
        .collect();
    assert_eq!(action.len(), 2);
    assert_eq!(action[0].program_id, spl_associated_token_account::id());

    let deposit = &action[1];
    assert_eq!(deposit.accounts[0].pubkey, Network::Mainnet.registry());
    assert_eq!(
        deposit.accounts[3].pubkey,
        get_associated_token_address(&owner, &usdc)
    );
    assert_eq!(
        deposit.accounts[4].pubkey,
        get_associated_token_address(&owner, &pool.data.pool_mint)
    );
    assert!(deposit
        .accounts
        .iter()
        .any(|meta| meta.pubkey == owner && meta.is_signer));
    assert!(!action
        .iter()
        .any(|ix| ix.program_id == solana_program::system_program::id()));
}

#[tokio::test]
async fn fail_invalid_treasury_before_any_request() {
    let pool = pool_account(&Network::Dev.pool_market(), &Pubkey::new_unique());
    let pools = TestPools::new(vec![pool.clone()]);
    let proposals = RecordingProposalCreator::new();
    let treasury = AssetAccount {
        is_sol: false,
        token_account_owner: None,
        ..sol_treasury()
    };

    let err = handle_everlend_action(
        Network::Dev,
        &form(&pool, 10),
        &treasury,
        &context(),
        &pools,
        &proposals,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, StrategyError::InvalidTreasuryConfiguration(_)));
    assert_eq!(pools.calls(), 0);
    assert!(proposals.requests().is_empty());
}

#[tokio::test]
async fn fail_pool_lookup_submits_nothing() {
    let pool = pool_account(&Network::Dev.pool_market(), &Pubkey::new_unique());
    let pools = TestPools::new(vec![]);
    let proposals = RecordingProposalCreator::new();

    let err = handle_everlend_action(
        Network::Dev,
        &form(&pool, 10),
        &sol_treasury(),
        &context(),
        &pools,
        &proposals,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, StrategyError::InvalidPoolAccount(key) if key == pool.pubkey));
    assert!(proposals.requests().is_empty());
}

#[tokio::test]
async fn fail_proposal_creation_propagates() {
    let pool = pool_account(&Network::Dev.pool_market(), &spl_token::native_mint::id());
    let pools = TestPools::new(vec![pool.clone()]);
    let proposals = RecordingProposalCreator::failing();

    let err = handle_everlend_action(
        Network::Dev,
        &form(&pool, 10),
        &sol_treasury(),
        &context(),
        &pools,
        &proposals,
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "Proposal creation failed: rejected");
}
