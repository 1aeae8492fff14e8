//! Network selection

use solana_program::{pubkey, pubkey::Pubkey};

/// Cluster the pool market and registry addresses are resolved for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Network {
    /// Mainnet beta
    Mainnet,
    /// Any other cluster (devnet, testnet, localnet)
    Dev,
}

/// Static Everlend addresses of one network
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkAddresses {
    /// General pool market
    pub pool_market: Pubkey,
    /// Everlend registry
    pub registry: Pubkey,
}

const MAINNET: NetworkAddresses = NetworkAddresses {
    pool_market: pubkey!("DzGDoJHdzUANM7P7V25t5nxqbvzRcHDmdhY51V6WNiXC"),
    registry: pubkey!("UaqUGgMvVzUZLthLHC9uuuBzgw5Ldesich94Wu5pMJg"),
};

const DEV: NetworkAddresses = NetworkAddresses {
    pool_market: pubkey!("4yC3cUWXQmoyyybfnENpxo33hiNxUNa1YAmmuxz93WAJ"),
    registry: pubkey!("6KCHtgSGR2WDE3aqrqSJppHRGVPgy9fHDX5XD8VZgb61"),
};

impl Network {
    /// Map a cluster name to a network. Only `mainnet` selects mainnet addresses.
    pub fn from_cluster(cluster: &str) -> Self {
        match cluster {
            "mainnet" => Network::Mainnet,
            _ => Network::Dev,
        }
    }

    /// Address pair for this network
    pub fn addresses(&self) -> NetworkAddresses {
        match self {
            Network::Mainnet => MAINNET,
            Network::Dev => DEV,
        }
    }

    /// General pool market
    pub fn pool_market(&self) -> Pubkey {
        self.addresses().pool_market
    }

    /// Everlend registry
    pub fn registry(&self) -> Pubkey {
        self.addresses().registry
    }
}
