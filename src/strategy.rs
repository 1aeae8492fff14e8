//! Strategy listing

use log::{debug, error, warn};
use serde::Serialize;
use solana_program::pubkey::Pubkey;

use crate::{
    action::{handle_everlend_action, ActionForm, ProposalContext},
    apy::{find_apy_percentage, format_apy, ApyProvider, ApyRecord},
    error::StrategyResult,
    governance::{AssetAccount, ProposalCreator},
    network::Network,
    pool::PoolProvider,
    state::PoolAccount,
    token::TokenInfoProvider,
    EVERLEND,
};

/// Protocol logo shown next to every Everlend strategy
pub const PROTOCOL_LOGO_SRC: &str = "/realms/Everlend/img/logo.png";

/// Protocol symbol
pub const PROTOCOL_SYMBOL: &str = "evd";

/// Action builder that turns a strategy form into a proposal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ProtocolHandler {
    /// [`handle_everlend_action`]
    Everlend,
}

impl ProtocolHandler {
    /// Build and submit the proposal for `form`
    pub async fn create_proposal(
        &self,
        network: Network,
        form: &ActionForm,
        treasury: &AssetAccount,
        context: &ProposalContext,
        pools: &dyn PoolProvider,
        proposals: &dyn ProposalCreator,
    ) -> StrategyResult<Pubkey> {
        match self {
            ProtocolHandler::Everlend => {
                handle_everlend_action(network, form, treasury, context, pools, proposals).await
            }
        }
    }
}

/// Deposit strategy offered to a treasury
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    /// Underlying token mint
    pub handled_mint: String,
    /// Action builder for this strategy
    pub handler: ProtocolHandler,
    /// Protocol logo
    pub protocol_logo_src: String,
    /// Protocol name
    pub protocol_name: String,
    /// Protocol symbol
    pub protocol_symbol: String,
    /// Strategy is not tied to a protocol
    pub is_generic_item: bool,
    /// Pool share mint
    pub pool_mint: String,
    /// Pool address
    pub pool_pub_key: String,
    /// Strategy description
    pub strategy_description: String,
    /// Strategy name
    pub strategy_name: String,
    /// Underlying token symbol, if known
    pub handled_token_symbol: Option<String>,
    /// Underlying token logo, if known
    pub handled_token_img_src: Option<String>,
    /// Supply APY, e.g. `4.32%`
    pub apy: String,
}

impl Strategy {
    /// Strategy for `pool`. Unknown metadata or rates leave the display fields empty
    /// and the APY at `0.00%`; the pool is never dropped.
    pub fn from_pool(
        pool: &PoolAccount,
        apys: &[ApyRecord],
        tokens: &dyn TokenInfoProvider,
    ) -> Self {
        let token_info = tokens.token_info(&pool.data.token_mint);
        let symbol = token_info.as_ref().map(|info| info.symbol.as_str());
        let apy = find_apy_percentage(apys, symbol).unwrap_or_else(|| {
            warn!("No APY for pool {} ({:?})", pool.pubkey, symbol);
            0.0
        });

        Strategy {
            handled_mint: pool.data.token_mint.to_string(),
            handler: ProtocolHandler::Everlend,
            protocol_logo_src: PROTOCOL_LOGO_SRC.to_string(),
            protocol_name: EVERLEND.to_string(),
            protocol_symbol: PROTOCOL_SYMBOL.to_string(),
            is_generic_item: false,
            pool_mint: pool.data.pool_mint.to_string(),
            pool_pub_key: pool.pubkey.to_string(),
            strategy_description: String::new(),
            strategy_name: "Deposit".to_string(),
            handled_token_symbol: token_info.as_ref().map(|info| info.symbol.clone()),
            handled_token_img_src: token_info.and_then(|info| info.logo_uri),
            apy: format_apy(apy),
        }
    }
}

/// List one strategy per pool in the network's pool market.
///
/// `Ok` with an empty list means the market has no pools; query failures are
/// returned as errors.
pub async fn list_strategies(
    network: Network,
    pools: &dyn PoolProvider,
    apys: &dyn ApyProvider,
    tokens: &dyn TokenInfoProvider,
) -> StrategyResult<Vec<Strategy>> {
    let pool_market = network.pool_market();

    let pools = pools.find_pools(&pool_market).await?;
    let apys = apys.fetch_apys().await?;
    debug!(
        "Joining {} pools with {} APY records",
        pools.len(),
        apys.len()
    );

    Ok(pools
        .iter()
        .map(|pool| Strategy::from_pool(pool, &apys, tokens))
        .collect())
}

/// [`list_strategies`] that logs failures and returns `None` instead
pub async fn get_everlend_strategies(
    network: Network,
    pools: &dyn PoolProvider,
    apys: &dyn ApyProvider,
    tokens: &dyn TokenInfoProvider,
) -> Option<Vec<Strategy>> {
    match list_strategies(network, pools, apys, tokens).await {
        Ok(strategies) => Some(strategies),
        Err(err) => {
            error!("Failed to list Everlend strategies: {}", err);
            None
        }
    }
}
