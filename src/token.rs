//! Token metadata lookup

use std::{collections::HashMap, fs::File, io::BufReader, path::Path};

use serde::Deserialize;
use solana_program::pubkey::Pubkey;

use crate::error::StrategyResult;

/// Display metadata of a token
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TokenInfo {
    /// Mint address, base58
    pub address: String,
    /// Ticker symbol
    pub symbol: String,
    /// Human readable name
    #[serde(default)]
    pub name: String,
    /// Logo url
    #[serde(rename = "logoURI", default)]
    pub logo_uri: Option<String>,
}

/// Looks up token metadata by mint
pub trait TokenInfoProvider: Send + Sync {
    /// Metadata for `mint`, if known
    fn token_info(&self, mint: &Pubkey) -> Option<TokenInfo>;
}

#[derive(Deserialize)]
struct TokenListFile {
    tokens: Vec<TokenInfo>,
}

/// In-memory token list keyed by mint address
#[derive(Clone, Debug, Default)]
pub struct TokenList {
    tokens: HashMap<String, TokenInfo>,
}

impl TokenList {
    /// Build from a list of tokens. Later entries win on duplicate mints.
    pub fn from_tokens<I: IntoIterator<Item = TokenInfo>>(tokens: I) -> Self {
        Self {
            tokens: tokens
                .into_iter()
                .map(|token| (token.address.clone(), token))
                .collect(),
        }
    }

    /// Parse a Solana token-list JSON document
    pub fn from_json(json: &str) -> StrategyResult<Self> {
        let file: TokenListFile =
            serde_json::from_str(json).map_err(std::io::Error::from)?;
        Ok(Self::from_tokens(file.tokens))
    }

    /// Load a Solana token-list JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> StrategyResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        let file: TokenListFile =
            serde_json::from_reader(reader).map_err(std::io::Error::from)?;
        Ok(Self::from_tokens(file.tokens))
    }

    /// Number of known tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// No tokens loaded
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl TokenInfoProvider for TokenList {
    fn token_info(&self, mint: &Pubkey) -> Option<TokenInfo> {
        self.tokens.get(&mint.to_string()).cloned()
    }
}
