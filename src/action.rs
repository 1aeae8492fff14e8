//! Deposit and withdrawal proposals

use std::convert::TryFrom;

use log::{debug, info};
use solana_program::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address;

use crate::{
    error::{StrategyError, StrategyResult},
    governance::{
        AssetAccount, InstructionDataWithHoldUpTime, ProposalCreator, ProposalRequest,
        ValidatedTreasury,
    },
    network::Network,
    pool::PoolProvider,
    state::PoolAccount,
    transaction::{prepare_deposit_tx, prepare_sol_deposit_tx, prepare_withdrawal_request_tx},
};

/// Pool action requested by the user
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Move treasury funds into the pool
    Deposit,
    /// Request pool tokens to be redeemed
    Withdraw,
}

/// Submitted strategy form
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionForm {
    /// Requested action
    pub action: Action,
    /// Proposal title
    pub title: String,
    /// Proposal description
    pub description: String,
    /// Amount in base units: underlying tokens for deposits, pool tokens for withdrawals
    pub amount: u64,
    /// Pool address
    pub pool_pub_key: Pubkey,
    /// Underlying token mint
    pub token_mint: Pubkey,
    /// Pool share mint
    pub pool_mint: Pubkey,
}

/// Proposal fields that do not come from the form
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProposalContext {
    /// Realm
    pub realm: Pubkey,
    /// Proposer's token owner record
    pub token_owner_record: Pubkey,
    /// Governing token mint
    pub governing_token_mint: Pubkey,
    /// Index of the new proposal
    pub proposal_index: u32,
    /// Leave the proposal in draft
    pub is_draft: bool,
    /// Voter weight record supplied by a voting plugin
    pub voter_weight_record: Option<Pubkey>,
}

/// Proposal instructions grouped by execution phase
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProposalInstructions {
    /// Runs before the action
    pub setup: Vec<InstructionDataWithHoldUpTime>,
    /// The pool action itself
    pub action: Vec<InstructionDataWithHoldUpTime>,
    /// Runs after the action
    pub cleanup: Vec<InstructionDataWithHoldUpTime>,
}

impl ProposalInstructions {
    /// Instructions in execution order: setup, action, cleanup
    pub fn into_ordered(self) -> Vec<InstructionDataWithHoldUpTime> {
        let mut instructions = self.setup;
        instructions.extend(self.action);
        instructions.extend(self.cleanup);
        instructions
    }
}

/// Check that `form` was filled from `pool` and that a native treasury only
/// targets the wrapped SOL pool
fn check_form(
    form: &ActionForm,
    treasury: &ValidatedTreasury,
    pool: &PoolAccount,
) -> StrategyResult<()> {
    if form.pool_pub_key != pool.pubkey {
        return Err(StrategyError::InvalidActionForm(format!(
            "form pool {} is not pool {}",
            form.pool_pub_key, pool.pubkey
        )));
    }
    if form.token_mint != pool.data.token_mint || form.pool_mint != pool.data.pool_mint {
        return Err(StrategyError::InvalidActionForm(format!(
            "form mints {}/{} do not match pool {} mints {}/{}",
            form.token_mint,
            form.pool_mint,
            pool.pubkey,
            pool.data.token_mint,
            pool.data.pool_mint
        )));
    }
    if treasury.is_sol && pool.data.token_mint != spl_token::native_mint::id() {
        return Err(StrategyError::InvalidActionForm(format!(
            "native treasury {} cannot use pool {} of mint {}",
            treasury.owner, pool.pubkey, pool.data.token_mint
        )));
    }

    Ok(())
}

/// Build the proposal instructions for `form` without touching the network
pub fn build_proposal_instructions(
    network: Network,
    form: &ActionForm,
    treasury: &ValidatedTreasury,
    pool: &PoolAccount,
) -> StrategyResult<ProposalInstructions> {
    check_form(form, treasury, pool)?;

    let registry = network.registry();
    let owner = treasury.owner;
    let hold_up_time = treasury.hold_up_time;

    let token_account = get_associated_token_address(&owner, &pool.data.token_mint);
    let pool_token_account = get_associated_token_address(&owner, &pool.data.pool_mint);
    debug!(
        "Owner {}: token account {}, pool token account {}",
        owner, token_account, pool_token_account
    );

    let mut instructions = ProposalInstructions::default();

    match form.action {
        Action::Deposit => {
            let tx = if treasury.is_sol {
                prepare_sol_deposit_tx(
                    &owner,
                    pool,
                    &registry,
                    form.amount,
                    &token_account,
                    &pool_token_account,
                )?
            } else {
                prepare_deposit_tx(&owner, pool, &registry, form.amount, &token_account)?
            };

            instructions.action.extend(
                tx.into_iter()
                    .map(|ix| InstructionDataWithHoldUpTime::new(ix, hold_up_time, false)),
            );
        }
        Action::Withdraw => {
            let destination = if treasury.is_sol { Some(&owner) } else { None };
            let tx = prepare_withdrawal_request_tx(
                &owner,
                pool,
                &registry,
                form.amount,
                &pool_token_account,
                destination,
            )?;

            instructions.action.extend(
                tx.into_iter()
                    .map(|ix| InstructionDataWithHoldUpTime::new(ix, hold_up_time, true)),
            );

            if treasury.is_sol {
                let close_wsol_account = spl_token::instruction::close_account(
                    &spl_token::id(),
                    &token_account,
                    &owner,
                    &owner,
                    &[],
                )?;
                instructions.cleanup.push(InstructionDataWithHoldUpTime::new(
                    close_wsol_account,
                    hold_up_time,
                    true,
                ));
            }
        }
    }

    Ok(instructions)
}

/// Build the proposal for `form` and submit it, returning the proposal address.
///
/// The treasury is validated before any request is made. Nothing is retried: the
/// first failing call aborts, and the proposal creator is only called once every
/// instruction has been built.
pub async fn handle_everlend_action(
    network: Network,
    form: &ActionForm,
    treasury: &AssetAccount,
    context: &ProposalContext,
    pools: &dyn PoolProvider,
    proposals: &dyn ProposalCreator,
) -> StrategyResult<Pubkey> {
    let validated = ValidatedTreasury::try_from(treasury)?;

    let pool = pools.get_pool(&form.pool_pub_key).await?;
    submit_everlend_action(network, form, &validated, &pool, context, proposals).await
}

/// [`handle_everlend_action`] for a pool the caller already fetched
pub async fn submit_everlend_action(
    network: Network,
    form: &ActionForm,
    treasury: &ValidatedTreasury,
    pool: &PoolAccount,
    context: &ProposalContext,
    proposals: &dyn ProposalCreator,
) -> StrategyResult<Pubkey> {
    let instructions = build_proposal_instructions(network, form, treasury, pool)?;

    let proposal_address = proposals
        .create_proposal(ProposalRequest {
            realm: context.realm,
            governance: treasury.governance,
            token_owner_record: context.token_owner_record,
            title: form.title.clone(),
            description: form.description.clone(),
            governing_token_mint: context.governing_token_mint,
            proposal_index: context.proposal_index,
            instructions: instructions.into_ordered(),
            is_draft: context.is_draft,
            voter_weight_record: context.voter_weight_record,
        })
        .await?;
    info!(
        "Created {:?} proposal {} for pool {}",
        form.action, proposal_address, form.pool_pub_key
    );

    Ok(proposal_address)
}
