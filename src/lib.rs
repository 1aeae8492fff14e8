#![deny(missing_docs)]

//! Everlend treasury strategies
//!
//! Lists Everlend general pool deposit strategies and builds the governance
//! proposal instructions that move DAO treasury funds in and out of them.

pub mod action;
pub mod apy;
pub mod error;
pub mod general_pool;
pub mod governance;
pub mod instruction;
pub mod network;
pub mod pool;
pub mod state;
pub mod strategy;
pub mod token;
pub mod transaction;

// Export current sdk types for downstream users building with a different sdk version
pub use solana_program;

pub use action::{
    handle_everlend_action, submit_everlend_action, Action, ActionForm, ProposalContext,
};
pub use error::{StrategyError, StrategyResult};
pub use network::Network;
pub use strategy::{get_everlend_strategies, list_strategies, Strategy};

/// Protocol name shown in the UI
pub const EVERLEND: &str = "Everlend";
