//! Static compiler, network and explorer definitions

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::config::{CompilerProfile, ConfigError, ForkingProfile, NetworkProfile};
use crate::explorer::{ApiKey, CustomChain, ExplorerProfile};
use crate::secrets::Secrets;

pub const SOLC_VERSION: &str = "0.8.18";
pub const OPTIMIZER_RUNS: u32 = 1_000_000;

pub const DEFAULT_NETWORK: KnownNetwork = KnownNetwork::OnusMainnet;
pub const TEST_TIMEOUT_MS: u64 = 60_000;

pub const INFURA_MAINNET_BASE: &str = "https://mainnet.infura.io/v3/";
pub const FORK_BLOCK_NUMBER: u64 = 15_360_000;

/// Endpoint of the in-process development node
pub const LOCAL_RPC_URL: &str = "http://127.0.0.1:8545";

/// Networks the build tool can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownNetwork {
    /// opBNB Testnet
    OpBnbTestnet,
    /// BNB Smart Chain Testnet
    BscTestnet,
    /// BNB Smart Chain Mainnet
    BscMainnet,
    /// ONUS Chain Testnet
    OnusTestnet,
    /// ONUS Chain Mainnet - signs with the mainnet-specific key
    OnusMainnet,
    /// Local development network forked from Ethereum mainnet
    Hardhat,
}

impl KnownNetwork {
    pub const ALL: [KnownNetwork; 6] = [
        KnownNetwork::OpBnbTestnet,
        KnownNetwork::BscTestnet,
        KnownNetwork::BscMainnet,
        KnownNetwork::OnusTestnet,
        KnownNetwork::OnusMainnet,
        KnownNetwork::Hardhat,
    ];

    /// Profile key used by the build tool
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownNetwork::OpBnbTestnet => "opBnbTestnet",
            KnownNetwork::BscTestnet => "bscTestnet",
            KnownNetwork::BscMainnet => "bscMainnet",
            KnownNetwork::OnusTestnet => "onusTestnet",
            KnownNetwork::OnusMainnet => "onusMainnet",
            KnownNetwork::Hardhat => "hardhat",
        }
    }

    pub fn rpc_url(&self) -> &'static str {
        match self {
            KnownNetwork::OpBnbTestnet => "https://opbnb-testnet-rpc.bnbchain.org",
            KnownNetwork::BscTestnet => "https://data-seed-prebsc-1-s1.bnbchain.org:8545",
            KnownNetwork::BscMainnet => "https://bsc-dataseed1.binance.org",
            KnownNetwork::OnusTestnet => "https://rpc-testnet.onuschain.io",
            KnownNetwork::OnusMainnet => "https://rpc.onuschain.io",
            KnownNetwork::Hardhat => LOCAL_RPC_URL,
        }
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            KnownNetwork::OpBnbTestnet => 5611,
            KnownNetwork::BscTestnet => 97,
            KnownNetwork::BscMainnet => 56,
            KnownNetwork::OnusTestnet => 1945,
            KnownNetwork::OnusMainnet => 1975,
            KnownNetwork::Hardhat => 1,
        }
    }

    /// Signing keys for this network. The local network uses the tool's
    /// built-in development accounts.
    fn accounts(&self, secrets: &Secrets) -> Vec<String> {
        match self {
            KnownNetwork::Hardhat => Vec::new(),
            // onusMainnet reads the same variable as the general key.
            _ => vec![secrets.private_key().to_string()],
        }
    }

    fn forking(&self, secrets: &Secrets) -> Option<ForkingProfile> {
        match self {
            KnownNetwork::Hardhat => Some(ForkingProfile {
                rpc_url: infura_fork_url(secrets.infura_api_key()),
                block_number: FORK_BLOCK_NUMBER,
            }),
            _ => None,
        }
    }

    pub fn profile(&self, secrets: &Secrets) -> NetworkProfile {
        NetworkProfile {
            name: self.as_str().to_string(),
            rpc_url: self.rpc_url().to_string(),
            chain_id: self.chain_id(),
            accounts: self.accounts(secrets),
            forking: self.forking(secrets),
            allow_unlimited_contract_size: false,
        }
    }
}

impl FromStr for KnownNetwork {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KnownNetwork::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownNetwork(s.to_string()))
    }
}

impl fmt::Display for KnownNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn infura_fork_url(api_key: &str) -> String {
    format!("{INFURA_MAINNET_BASE}{api_key}")
}

pub fn default_compiler() -> CompilerProfile {
    CompilerProfile {
        version: SOLC_VERSION.to_string(),
        via_ir: true,
        optimizer_enabled: true,
        optimizer_runs: OPTIMIZER_RUNS,
    }
}

pub fn default_networks(secrets: &Secrets) -> BTreeMap<String, NetworkProfile> {
    KnownNetwork::ALL
        .iter()
        .map(|n| (n.as_str().to_string(), n.profile(secrets)))
        .collect()
}

pub fn default_explorer() -> ExplorerProfile {
    let api_keys = [
        (KnownNetwork::BscTestnet, ApiKey::key("PU3J9UJCQZWI8TPS4KICA8ISPEEZ7DV53K")),
        (KnownNetwork::BscMainnet, ApiKey::key("F9EDC142ACR97453R1F1DATAZBUABR2RAK")),
        (KnownNetwork::OnusTestnet, ApiKey::NotRequired),
        (KnownNetwork::OnusMainnet, ApiKey::NotRequired),
    ]
    .into_iter()
    .map(|(n, key)| (n.as_str().to_string(), key))
    .collect();

    let custom_chains = vec![
        CustomChain::new(
            KnownNetwork::OpBnbTestnet.as_str(),
            5611,
            "https://api-opbnb-testnet.bscscan.com/api",
            "https://opbnb-testnet.bscscan.com",
        ),
        CustomChain::new(
            KnownNetwork::OnusTestnet.as_str(),
            1945,
            "https://explorer-testnet.onuschain.io/api",
            "https://explorer-testnet.onuschain.io",
        ),
        CustomChain::new(
            KnownNetwork::OnusMainnet.as_str(),
            1975,
            "https://explorer.onuschain.io/api",
            "https://explorer.onuschain.io",
        ),
        CustomChain::new(
            KnownNetwork::BscMainnet.as_str(),
            56,
            "https://api.bscscan.com/api",
            "https://bscscan.com",
        ),
    ];

    ExplorerProfile {
        api_keys,
        custom_chains,
    }
}
