//! Error types

use solana_client::client_error::ClientError;
use solana_program::{program_error::ProgramError, pubkey::Pubkey};
use thiserror::Error;

/// Errors that may be returned while listing strategies or building proposals.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// Treasury account is missing data required to act on it
    #[error("Invalid treasury configuration: {0}")]
    InvalidTreasuryConfiguration(String),

    /// Strategy form does not match the pool it names
    #[error("Invalid action form: {0}")]
    InvalidActionForm(String),

    /// RPC request failed
    #[error("RPC error: {0}")]
    Rpc(#[from] ClientError),

    /// Everlend REST API request failed
    #[error("Everlend API error: {0}")]
    Api(#[from] reqwest::Error),

    /// Instruction construction failed
    #[error("Program error: {0}")]
    Program(#[from] ProgramError),

    /// Borsh (de)serialization failed
    #[error("Serialization error: {0}")]
    Io(#[from] std::io::Error),

    /// Account data could not be decoded as a general pool
    #[error("Invalid pool account: {0}")]
    InvalidPoolAccount(Pubkey),

    /// Base64 instruction payload could not be decoded
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Proposal creation failed
    #[error("Proposal creation failed: {0}")]
    Proposal(String),
}

/// Result alias used across the crate
pub type StrategyResult<T> = Result<T, StrategyError>;
