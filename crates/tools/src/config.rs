//! Typed build configuration for the contract toolchain
//!
//! The configuration is assembled once from static profiles plus a snapshot
//! of secret environment variables, validated, and then only read:
//!
//! 1. Snapshot secrets (`PRIVATE_KEY_MAINNET`, `INFURA_API_KEY`, `.env` honoured)
//! 2. Apply the secret policy (defer empty keys, or fail eagerly)
//! 3. Assemble compiler, network and explorer profiles
//! 4. Validate invariants
//!
//! # Examples
//!
//! ```rust,no_run
//! use contract_tools::config::{build_configuration, load_secrets};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = build_configuration(&load_secrets())?;
//! println!("Default network: {}", config.default_network);
//! println!("RPC URL: {}", config.default_profile()?.rpc_url);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use url::Url;

use crate::explorer::ExplorerProfile;
use crate::profiles::{self, INFURA_MAINNET_BASE};
use crate::secrets::{SecretPolicy, Secrets};

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required secret: {0} is unset or empty")]
    MissingSecret(String),

    #[error("Default network '{0}' is not a configured network")]
    UnknownDefaultNetwork(String),

    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    #[error("No compiler profiles configured")]
    NoCompilers,

    #[error("Unsupported compiler version: {0}. Must be a 0.4.x - 0.8.x release")]
    UnsupportedCompiler(String),

    #[error("Optimizer runs for compiler {0} must be positive")]
    InvalidOptimizerRuns(String),

    #[error("Invalid RPC URL for network '{network}': {reason}")]
    InvalidRpcUrl { network: String, reason: String },

    #[error("Chain ID for network '{0}' must be positive")]
    InvalidChainId(String),

    #[error("Fork block number for network '{0}' must be positive")]
    InvalidForkBlock(String),

    #[error("Explorer custom chain references unknown network '{0}'")]
    UnknownExplorerNetwork(String),

    #[error("Network profile keyed '{key}' is named '{name}'")]
    NetworkNameMismatch { key: String, name: String },

    #[error(
        "Explorer custom chain for '{network}' has chain ID {explorer}, network has {configured}"
    )]
    ExplorerChainMismatch {
        network: String,
        explorer: u64,
        configured: u64,
    },

    #[error("Test timeout must be positive")]
    InvalidTestTimeout,

    #[error("Env file error: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Solidity compiler settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerProfile {
    pub version: String,
    #[serde(rename = "viaIR")]
    pub via_ir: bool,
    pub optimizer_enabled: bool,
    pub optimizer_runs: u32,
}

/// Live network mirrored by a local development network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForkingProfile {
    pub rpc_url: String,
    pub block_number: u64,
}

/// A network the build tool can deploy to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    pub name: String,
    pub rpc_url: String,
    pub chain_id: u64,
    /// Signing keys, in the order the tool uses them
    pub accounts: Vec<String>,
    #[serde(default)]
    pub allow_unlimited_contract_size: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forking: Option<ForkingProfile>,
}

impl NetworkProfile {
    /// Whether transactions on this network are signed with configured keys
    pub fn is_signing(&self) -> bool {
        !self.accounts.is_empty()
    }

    pub fn redacted(&self) -> Self {
        Self {
            accounts: self.accounts.iter().map(|a| mask(a)).collect(),
            forking: self.forking.as_ref().map(|f| ForkingProfile {
                rpc_url: redact_fork_url(&f.rpc_url),
                block_number: f.block_number,
            }),
            ..self.clone()
        }
    }
}

/// Resolved build configuration
///
/// Never mutated after construction; overrides produce a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfiguration {
    pub default_network: String,
    pub test_timeout_ms: u64,
    pub compilers: Vec<CompilerProfile>,
    pub networks: BTreeMap<String, NetworkProfile>,
    pub explorer: ExplorerProfile,
}

/// Snapshot the secret environment variables once, at process start.
pub fn load_secrets() -> Secrets {
    Secrets::from_env()
}

/// Assemble the configuration with the deferred secret policy.
pub fn build_configuration(secrets: &Secrets) -> Result<BuildConfiguration, ConfigError> {
    BuildConfiguration::build(secrets, SecretPolicy::Deferred)
}

/// Check every configuration invariant
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - No compiler is configured, a version is unsupported or optimizer runs are zero
/// - A network's `name` differs from its key in `networks`
/// - A network has an unusable RPC URL, a zero chain ID or a zero fork block
/// - The default network is not configured
/// - An explorer custom chain names an unknown network or a different chain ID
/// - The test timeout is zero
pub fn validate(config: &BuildConfiguration) -> Result<(), ConfigError> {
    if config.compilers.is_empty() {
        return Err(ConfigError::NoCompilers);
    }

    for compiler in &config.compilers {
        if !is_supported_compiler(&compiler.version) {
            return Err(ConfigError::UnsupportedCompiler(compiler.version.clone()));
        }
        if compiler.optimizer_runs == 0 {
            return Err(ConfigError::InvalidOptimizerRuns(compiler.version.clone()));
        }
    }

    let mut seen_chains: HashMap<u64, &str> = HashMap::new();
    for (name, network) in &config.networks {
        if network.name != *name {
            return Err(ConfigError::NetworkNameMismatch {
                key: name.clone(),
                name: network.name.clone(),
            });
        }

        validate_rpc_url(name, &network.rpc_url)?;

        if network.chain_id == 0 {
            return Err(ConfigError::InvalidChainId(name.clone()));
        }

        if let Some(forking) = &network.forking {
            validate_rpc_url(name, &forking.rpc_url)?;
            if forking.block_number == 0 {
                return Err(ConfigError::InvalidForkBlock(name.clone()));
            }
        }

        if let Some(other) = seen_chains.insert(network.chain_id, name) {
            tracing::warn!(
                chain_id = network.chain_id,
                first = other,
                second = %name,
                "chain ID shared by two networks"
            );
        }
    }

    if !config.networks.contains_key(&config.default_network) {
        return Err(ConfigError::UnknownDefaultNetwork(
            config.default_network.clone(),
        ));
    }

    for chain in &config.explorer.custom_chains {
        let network = config
            .networks
            .get(&chain.network)
            .ok_or_else(|| ConfigError::UnknownExplorerNetwork(chain.network.clone()))?;
        if network.chain_id != chain.chain_id {
            return Err(ConfigError::ExplorerChainMismatch {
                network: chain.network.clone(),
                explorer: chain.chain_id,
                configured: network.chain_id,
            });
        }
    }

    if config.test_timeout_ms == 0 {
        return Err(ConfigError::InvalidTestTimeout);
    }

    Ok(())
}

impl BuildConfiguration {
    /// Load from the process environment and validate
    pub fn load(policy: SecretPolicy) -> Result<Self, ConfigError> {
        Self::build(&load_secrets(), policy)
    }

    /// Assemble the static profiles around `secrets` and validate the result
    pub fn build(secrets: &Secrets, policy: SecretPolicy) -> Result<Self, ConfigError> {
        secrets.enforce(policy)?;

        let config = BuildConfiguration {
            default_network: profiles::DEFAULT_NETWORK.as_str().to_string(),
            test_timeout_ms: profiles::TEST_TIMEOUT_MS,
            compilers: vec![profiles::default_compiler()],
            networks: profiles::default_networks(secrets),
            explorer: profiles::default_explorer(),
        };

        validate(&config)?;
        tracing::debug!(
            networks = config.networks.len(),
            default_network = %config.default_network,
            "build configuration resolved"
        );
        Ok(config)
    }

    pub fn network(&self, name: &str) -> Result<&NetworkProfile, ConfigError> {
        self.networks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownNetwork(name.to_string()))
    }

    /// Profile of the default network
    pub fn default_profile(&self) -> Result<&NetworkProfile, ConfigError> {
        self.network(&self.default_network)
    }

    /// Copy with a different default network, as selected on the command line
    pub fn with_default_network(&self, name: &str) -> Result<Self, ConfigError> {
        if !self.networks.contains_key(name) {
            return Err(ConfigError::UnknownNetwork(name.to_string()));
        }
        let config = Self {
            default_network: name.to_string(),
            ..self.clone()
        };
        validate(&config)?;
        Ok(config)
    }

    /// Copy with account keys and explorer API keys masked
    pub fn redacted(&self) -> Self {
        Self {
            networks: self
                .networks
                .iter()
                .map(|(name, n)| (name.clone(), n.redacted()))
                .collect(),
            explorer: self.explorer.redacted(),
            ..self.clone()
        }
    }

    /// Get configuration as JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Get configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Print the resolved configuration
    pub fn print_summary(&self) {
        println!("╔════════════════════════════════════════════════════════════════╗");
        println!("║          CONTRACT BUILD CONFIGURATION RESOLVED                 ║");
        println!("╚════════════════════════════════════════════════════════════════╝");
        println!("  Default Network:     {}", self.default_network);
        println!("  Test Timeout:        {}ms", self.test_timeout_ms);

        for compiler in &self.compilers {
            println!(
                "  Compiler:            solc {} (viaIR: {}, optimizer: {}, runs: {})",
                compiler.version,
                compiler.via_ir,
                compiler.optimizer_enabled,
                compiler.optimizer_runs
            );
        }

        println!("  Networks:");
        for (name, network) in &self.networks {
            let marker = if *name == self.default_network { "*" } else { " " };
            println!(
                "   {} {:<14} chain {:<6} {}",
                marker, network.name, network.chain_id, network.rpc_url
            );
            if let Some(ref forking) = network.forking {
                println!(
                    "       forking {} @ block {}",
                    forking.rpc_url, forking.block_number
                );
            }
            if !network.is_signing() {
                println!("       accounts: (tool default)");
            } else if network.accounts.iter().any(String::is_empty) {
                println!("       accounts: (empty key - signing will fail)");
            }
        }

        println!("  Explorer:");
        for chain in &self.explorer.custom_chains {
            println!(
                "     {:<14} api {} | key {}",
                chain.network,
                chain.api_url,
                self.explorer.api_key_for(&chain.network)
            );
        }

        println!("╚════════════════════════════════════════════════════════════════╝");
    }
}

/// Accepts `MAJOR.MINOR.PATCH` in the 0.4 - 0.8 release lines.
fn is_supported_compiler(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() != 3 {
        return false;
    }
    let Ok(numbers) = parts
        .iter()
        .map(|p| p.parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
    else {
        return false;
    };
    numbers[0] == 0 && (4..=8).contains(&numbers[1])
}

fn validate_rpc_url(network: &str, rpc_url: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidRpcUrl {
        network: network.to_string(),
        reason,
    };

    if rpc_url.is_empty() {
        return Err(invalid("URL is empty".to_string()));
    }

    let parsed = Url::parse(rpc_url).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!(
            "scheme must be http or https, got '{}'",
            other
        ))),
    }
}

/// Mask a secret, keeping only its last four characters when it is long
/// enough. Empty values stay empty so unset keys remain visible.
pub(crate) fn mask(secret: &str) -> String {
    let len = secret.chars().count();
    if len == 0 {
        String::new()
    } else if len <= 8 {
        "****".to_string()
    } else {
        let tail: String = secret.chars().skip(len - 4).collect();
        format!("****{}", tail)
    }
}

fn redact_fork_url(rpc_url: &str) -> String {
    match rpc_url.strip_prefix(INFURA_MAINNET_BASE) {
        Some(key) => format!("{}{}", INFURA_MAINNET_BASE, mask(key)),
        None => rpc_url.to_string(),
    }
}
