//! Governance instruction format, treasury accounts and proposal submission

use std::convert::TryFrom;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use crate::error::{StrategyError, StrategyResult};

/// Seed prefix of every governance program address
pub const PROGRAM_AUTHORITY_SEED: &[u8] = b"governance";

/// Account meta as stored by the governance program
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct AccountMetaData {
    /// Account address
    pub pubkey: Pubkey,
    /// Must sign the instruction
    pub is_signer: bool,
    /// Written by the instruction
    pub is_writable: bool,
}

/// Instruction as stored in a proposal transaction
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct InstructionData {
    /// Program to invoke
    pub program_id: Pubkey,
    /// Accounts passed to the program
    pub accounts: Vec<AccountMetaData>,
    /// Instruction data
    pub data: Vec<u8>,
}

impl From<Instruction> for InstructionData {
    fn from(instruction: Instruction) -> Self {
        InstructionData {
            program_id: instruction.program_id,
            accounts: instruction
                .accounts
                .into_iter()
                .map(|a| AccountMetaData {
                    pubkey: a.pubkey,
                    is_signer: a.is_signer,
                    is_writable: a.is_writable,
                })
                .collect(),
            data: instruction.data,
        }
    }
}

impl From<InstructionData> for Instruction {
    fn from(instruction: InstructionData) -> Self {
        Instruction {
            program_id: instruction.program_id,
            accounts: instruction
                .accounts
                .into_iter()
                .map(|a| AccountMeta {
                    pubkey: a.pubkey,
                    is_signer: a.is_signer,
                    is_writable: a.is_writable,
                })
                .collect(),
            data: instruction.data,
        }
    }
}

/// Encode an instruction the way proposal transactions carry it
pub fn serialize_instruction_to_base64(instruction: &Instruction) -> StrategyResult<String> {
    let data = InstructionData::from(instruction.clone());
    Ok(STANDARD.encode(borsh::to_vec(&data)?))
}

/// Decode an instruction produced by [`serialize_instruction_to_base64`]
pub fn instruction_data_from_base64(encoded: &str) -> StrategyResult<InstructionData> {
    let bytes = STANDARD.decode(encoded)?;
    Ok(InstructionData::try_from_slice(&bytes)?)
}

/// Proposal instruction with its execution constraints
#[derive(Clone, Debug, PartialEq)]
pub struct InstructionDataWithHoldUpTime {
    /// Serialized instruction
    pub data: InstructionData,
    /// Seconds between proposal approval and execution
    pub hold_up_time: u32,
    /// Instructions that must execute before this one
    pub prerequisite_instructions: Vec<Instruction>,
    /// UI hint that the instruction may be split across approval chunks
    pub chunk_split_by_default: bool,
}

impl InstructionDataWithHoldUpTime {
    /// Wrap an instruction with no prerequisites
    pub fn new(instruction: Instruction, hold_up_time: u32, chunk_split_by_default: bool) -> Self {
        Self {
            data: instruction.into(),
            hold_up_time,
            prerequisite_instructions: vec![],
            chunk_split_by_default,
        }
    }
}

/// Governance config fields this crate reads
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GovernanceConfig {
    /// Minimum hold up time for proposal instructions, in seconds
    pub min_instruction_hold_up_time: u32,
}

/// Governance owning a treasury
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GovernanceAccount {
    /// Governance address
    pub pubkey: Pubkey,
    /// Loaded config, if the account data was fetched
    pub config: Option<GovernanceConfig>,
}

/// Treasury asset as loaded by the UI
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetAccount {
    /// Treasury address
    pub pubkey: Pubkey,
    /// Holds native SOL directly
    pub is_sol: bool,
    /// Owning governance
    pub governance: Option<GovernanceAccount>,
    /// Owner of the token account, for token treasuries
    pub token_account_owner: Option<Pubkey>,
}

/// Treasury with every field the action builder needs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidatedTreasury {
    /// Address that owns the funds and signs pool instructions
    pub owner: Pubkey,
    /// Holds native SOL directly
    pub is_sol: bool,
    /// Owning governance
    pub governance: Pubkey,
    /// Hold up time applied to every proposal instruction
    pub hold_up_time: u32,
}

impl TryFrom<&AssetAccount> for ValidatedTreasury {
    type Error = StrategyError;

    fn try_from(treasury: &AssetAccount) -> Result<Self, Self::Error> {
        let governance = treasury.governance.as_ref().ok_or_else(|| {
            StrategyError::InvalidTreasuryConfiguration(format!(
                "treasury {} has no governance",
                treasury.pubkey
            ))
        })?;
        let config = governance.config.ok_or_else(|| {
            StrategyError::InvalidTreasuryConfiguration(format!(
                "governance {} config is not loaded",
                governance.pubkey
            ))
        })?;
        let owner = if treasury.is_sol {
            treasury.pubkey
        } else {
            treasury.token_account_owner.ok_or_else(|| {
                StrategyError::InvalidTreasuryConfiguration(format!(
                    "token treasury {} has no token account owner",
                    treasury.pubkey
                ))
            })?
        };

        Ok(ValidatedTreasury {
            owner,
            is_sol: treasury.is_sol,
            governance: governance.pubkey,
            hold_up_time: config.min_instruction_hold_up_time,
        })
    }
}

/// Everything needed to create a proposal
#[derive(Clone, Debug, PartialEq)]
pub struct ProposalRequest {
    /// Realm
    pub realm: Pubkey,
    /// Governance the proposal is created under
    pub governance: Pubkey,
    /// Proposer's token owner record
    pub token_owner_record: Pubkey,
    /// Proposal name
    pub title: String,
    /// Proposal description
    pub description: String,
    /// Mint of the governing token used to vote
    pub governing_token_mint: Pubkey,
    /// Index of the new proposal within the governance
    pub proposal_index: u32,
    /// Ordered proposal instructions
    pub instructions: Vec<InstructionDataWithHoldUpTime>,
    /// Leave the proposal in draft instead of signing it off
    pub is_draft: bool,
    /// Voter weight record supplied by a voting plugin
    pub voter_weight_record: Option<Pubkey>,
}

/// Creates proposals on chain
#[async_trait]
pub trait ProposalCreator: Send + Sync {
    /// Create a proposal and return its address
    async fn create_proposal(&self, request: ProposalRequest) -> StrategyResult<Pubkey>;
}

/// Proposal address for a governance, governing mint and proposal index
pub fn get_proposal_address(
    program_id: &Pubkey,
    governance: &Pubkey,
    governing_token_mint: &Pubkey,
    proposal_index: u32,
) -> Pubkey {
    Pubkey::find_program_address(
        &[
            PROGRAM_AUTHORITY_SEED,
            governance.as_ref(),
            governing_token_mint.as_ref(),
            &proposal_index.to_le_bytes(),
        ],
        program_id,
    )
    .0
}
