//! Everlend REST API supply rates

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::StrategyResult;

/// Everlend API base url
pub const EVERLEND_API_URL: &str = "https://api.everlend.finance/api/v1/";

/// Timeout for API requests
pub const API_TIMEOUT: Duration = Duration::from_secs(30);

/// Supply rate of one token
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApyRecord {
    /// Token symbol
    pub token: String,
    /// Supply APY as a fraction (0.05 is 5%)
    pub supply_apy: Option<f64>,
}

/// Source of current supply rates
#[async_trait]
pub trait ApyProvider: Send + Sync {
    /// Fetch all supply rates
    async fn fetch_apys(&self) -> StrategyResult<Vec<ApyRecord>>;
}

/// HTTP client for the Everlend API
#[derive(Clone, Debug)]
pub struct EverlendApi {
    client: reqwest::Client,
    base_url: String,
}

impl EverlendApi {
    /// Client for `base_url`, with [`API_TIMEOUT`] applied to every request
    pub fn new(base_url: &str) -> StrategyResult<Self> {
        let client = reqwest::Client::builder().timeout(API_TIMEOUT).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Client for `base_url` sending requests through `client`
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        Self { client, base_url }
    }

    /// Url of the APY endpoint
    pub fn apy_url(&self) -> String {
        format!("{}apy", self.base_url)
    }
}

#[async_trait]
impl ApyProvider for EverlendApi {
    async fn fetch_apys(&self) -> StrategyResult<Vec<ApyRecord>> {
        let url = self.apy_url();
        debug!("Fetching APYs from {}", url);

        let records = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<ApyRecord>>()
            .await?;

        Ok(records)
    }
}

/// Supply APY in percent for `symbol`, if the symbol has a finite rate
pub fn find_apy_percentage(records: &[ApyRecord], symbol: Option<&str>) -> Option<f64> {
    symbol
        .and_then(|symbol| records.iter().find(|record| record.token == symbol))
        .and_then(|record| record.supply_apy)
        .map(|apy| apy * 100.0)
        .filter(|apy| apy.is_finite())
}

/// Supply APY in percent for `symbol`, or 0 when the symbol or its rate is unknown
pub fn apy_percentage(records: &[ApyRecord], symbol: Option<&str>) -> f64 {
    find_apy_percentage(records, symbol).unwrap_or(0.0)
}

/// Two decimal percentage string, e.g. `4.32%`
pub fn format_apy(apy: f64) -> String {
    format!("{:.2}%", apy)
}
