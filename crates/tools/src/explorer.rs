//! Block-explorer verification settings

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Sentinel API key for explorers that verify without a key.
pub const NO_KEY_SENTINEL: &str = "NONEED";

/// Explorer API key for a single network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApiKey {
    /// Real key issued by the explorer
    Key(String),
    /// No key is needed for this chain
    NotRequired,
}

impl ApiKey {
    pub fn key(value: impl Into<String>) -> Self {
        ApiKey::Key(value.into())
    }

    pub fn is_required(&self) -> bool {
        matches!(self, ApiKey::Key(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            ApiKey::Key(k) => k,
            ApiKey::NotRequired => NO_KEY_SENTINEL,
        }
    }

    /// Copy with the key material masked. The sentinel is left as is.
    pub fn redacted(&self) -> Self {
        match self {
            ApiKey::Key(k) => ApiKey::Key(crate::config::mask(k)),
            ApiKey::NotRequired => ApiKey::NotRequired,
        }
    }
}

impl From<String> for ApiKey {
    fn from(value: String) -> Self {
        if value.is_empty() || value == NO_KEY_SENTINEL {
            ApiKey::NotRequired
        } else {
            ApiKey::Key(value)
        }
    }
}

impl From<ApiKey> for String {
    fn from(key: ApiKey) -> Self {
        key.as_str().to_string()
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Explorer endpoints for a chain the verification tooling does not know natively
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomChain {
    pub network: String,
    pub chain_id: u64,
    #[serde(rename = "apiURL")]
    pub api_url: String,
    #[serde(rename = "browserURL")]
    pub browser_url: String,
}

impl CustomChain {
    pub fn new(network: &str, chain_id: u64, api_url: &str, browser_url: &str) -> Self {
        Self {
            network: network.to_string(),
            chain_id,
            api_url: api_url.to_string(),
            browser_url: browser_url.to_string(),
        }
    }
}

/// Verification settings shared by every network
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerProfile {
    #[serde(rename = "apiKey")]
    pub api_keys: BTreeMap<String, ApiKey>,
    pub custom_chains: Vec<CustomChain>,
}

impl ExplorerProfile {
    /// API key for `network`. Networks without an entry skip verification.
    pub fn api_key_for(&self, network: &str) -> ApiKey {
        self.api_keys
            .get(network)
            .cloned()
            .unwrap_or(ApiKey::NotRequired)
    }

    pub fn custom_chain_for(&self, network: &str) -> Option<&CustomChain> {
        self.custom_chains.iter().find(|c| c.network == network)
    }

    pub fn redacted(&self) -> Self {
        Self {
            api_keys: self
                .api_keys
                .iter()
                .map(|(network, key)| (network.clone(), key.redacted()))
                .collect(),
            custom_chains: self.custom_chains.clone(),
        }
    }
}
