use pretty_assertions::assert_eq;

use contract_tools::{
    build_configuration, validate, ApiKey, BuildConfiguration, ConfigError, KnownNetwork,
    SecretPolicy, Secrets,
};

fn full_secrets() -> Secrets {
    Secrets::from_map([
        ("PRIVATE_KEY_MAINNET", "0xABC1234567890"),
        ("INFURA_API_KEY", "xyz"),
    ])
}

#[test]
fn every_network_has_its_documented_chain_id() {
    let config = build_configuration(&full_secrets()).unwrap();
    let expected = [
        ("opBnbTestnet", 5611),
        ("bscTestnet", 97),
        ("bscMainnet", 56),
        ("onusTestnet", 1945),
        ("onusMainnet", 1975),
        ("hardhat", 1),
    ];
    for (name, chain_id) in expected {
        let matching: Vec<_> = config
            .networks
            .values()
            .filter(|n| n.name == name)
            .collect();
        assert_eq!(matching.len(), 1, "{name}");
        assert_eq!(matching[0].chain_id, chain_id, "{name}");
    }
}

#[test]
fn default_network_is_configured() {
    let config = build_configuration(&full_secrets()).unwrap();
    assert!(config.networks.contains_key(&config.default_network));
    assert_eq!(config.default_profile().unwrap().name, "onusMainnet");
}

#[test]
fn empty_private_key_is_carried_under_deferred_policy() {
    let secrets = Secrets::from_map([("PRIVATE_KEY_MAINNET", "")]);
    let config = build_configuration(&secrets).unwrap();

    for network in KnownNetwork::ALL {
        let profile = config.network(network.as_str()).unwrap();
        if network == KnownNetwork::Hardhat {
            assert!(!profile.is_signing());
        } else {
            assert_eq!(profile.accounts, vec![String::new()]);
        }
    }
}

#[test]
fn eager_policy_rejects_missing_private_key() {
    let secrets = Secrets::from_map([("PRIVATE_KEY_MAINNET", ""), ("INFURA_API_KEY", "xyz")]);
    let err = BuildConfiguration::build(&secrets, SecretPolicy::Eager).unwrap_err();
    assert!(matches!(err, ConfigError::MissingSecret(ref name) if name == "PRIVATE_KEY_MAINNET"));
}

#[test]
fn eager_policy_accepts_complete_secrets() {
    let config = BuildConfiguration::build(&full_secrets(), SecretPolicy::Eager).unwrap();
    assert_eq!(config, build_configuration(&full_secrets()).unwrap());
}

#[test]
fn fork_url_interpolates_infura_key() {
    let config = build_configuration(&full_secrets()).unwrap();
    let forking = config.networks["hardhat"].forking.as_ref().unwrap();
    assert_eq!(forking.rpc_url, "https://mainnet.infura.io/v3/xyz");
    assert_eq!(forking.block_number, 15_360_000);
}

#[test]
fn build_is_idempotent() {
    let secrets = full_secrets();
    let first = build_configuration(&secrets).unwrap();
    let second = build_configuration(&secrets).unwrap();
    assert_eq!(first, second);
}

#[test]
fn optimizer_defaults_and_zero_runs_rejected() {
    let mut config = build_configuration(&full_secrets()).unwrap();
    assert_eq!(config.compilers[0].optimizer_runs, 1_000_000);
    assert!(config.compilers[0].optimizer_enabled);

    config.compilers[0].optimizer_runs = 0;
    assert!(matches!(
        validate(&config),
        Err(ConfigError::InvalidOptimizerRuns(_))
    ));
}

#[test]
fn explorer_custom_chains_reference_configured_networks() {
    let config = build_configuration(&full_secrets()).unwrap();
    assert_eq!(config.explorer.custom_chains.len(), 4);
    for chain in &config.explorer.custom_chains {
        let network = config.network(&chain.network).unwrap();
        assert_eq!(network.chain_id, chain.chain_id);
    }
}

#[test]
fn explorer_keys_default_to_no_verification() {
    let config = build_configuration(&full_secrets()).unwrap();
    assert_eq!(config.explorer.api_key_for("onusTestnet"), ApiKey::NotRequired);
    assert_eq!(config.explorer.api_key_for("hardhat"), ApiKey::NotRequired);
    assert!(config.explorer.api_key_for("bscMainnet").is_required());
}

#[test]
fn redacted_json_never_contains_private_key() {
    let config = build_configuration(&full_secrets()).unwrap();
    let json = config.redacted().to_json().unwrap();
    assert!(!json.contains("0xABC1234567890"));
    assert!(config.to_json().unwrap().contains("0xABC1234567890"));
}
