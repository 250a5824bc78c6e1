use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use contract_tools::{load_secrets, BuildConfiguration, KnownNetwork, SecretPolicy};

#[derive(Parser)]
#[command(name = "contract-tools")]
#[command(about = "Inspect and validate the contract build configuration")]
struct Cli {
    /// Override the default network
    #[arg(short, long, global = true)]
    network: Option<String>,

    /// Fail when PRIVATE_KEY_MAINNET or INFURA_API_KEY is unset
    #[arg(long, global = true)]
    strict_secrets: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved configuration
    Show {
        /// Output as TOML (ignored with --json)
        #[arg(long)]
        toml: bool,
        /// Print account and API keys unmasked
        #[arg(long)]
        reveal_secrets: bool,
    },
    /// Load and validate the configuration
    Validate,
    /// List configured networks
    Networks,
    /// Show a single network profile and its explorer settings
    Network {
        /// Network name (e.g. bscMainnet)
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let policy = if cli.strict_secrets {
        SecretPolicy::Eager
    } else {
        SecretPolicy::Deferred
    };

    let secrets = load_secrets();
    tracing::debug!(?secrets, ?policy, "secrets loaded");

    let mut config = BuildConfiguration::build(&secrets, policy)
        .context("Failed to load build configuration")?;
    if let Some(ref network) = cli.network {
        let known: KnownNetwork = network.parse()?;
        config = config
            .with_default_network(known.as_str())
            .with_context(|| format!("Cannot select network '{}'", network))?;
    }
    let json = cli.json;

    match cli.command {
        Commands::Show {
            toml,
            reveal_secrets,
        } => {
            let view = if reveal_secrets {
                config
            } else {
                config.redacted()
            };
            if json {
                println!("{}", view.to_json()?);
            } else if toml {
                println!("{}", view.to_toml()?);
            } else {
                view.print_summary();
            }
            Ok(())
        }
        Commands::Validate => {
            println!(
                "configuration OK ({} networks, default: {})",
                config.networks.len(),
                config.default_network
            );
            Ok(())
        }
        Commands::Networks => {
            if json {
                let list: Vec<_> = config
                    .networks
                    .iter()
                    .map(|(name, network)| {
                        serde_json::json!({
                            "name": name,
                            "chainId": network.chain_id,
                            "rpcUrl": network.rpc_url,
                            "default": *name == config.default_network,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&list)?);
                return Ok(());
            }

            for (name, network) in &config.networks {
                let marker = if *name == config.default_network {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{} {:<14} {:>6}  {}",
                    marker, name, network.chain_id, network.rpc_url
                );
            }
            Ok(())
        }
        Commands::Network { name } => {
            let known: KnownNetwork = name.parse()?;
            let name = known.as_str();
            let profile = config.network(name)?.redacted();
            let api_key = config.explorer.api_key_for(name).redacted();
            let custom_chain = config.explorer.custom_chain_for(name);

            if json {
                let value = serde_json::json!({
                    "network": profile,
                    "apiKey": api_key,
                    "customChain": custom_chain,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
                return Ok(());
            }

            println!("  Network:             {}", profile.name);
            println!("  RPC URL:             {}", profile.rpc_url);
            println!("  Chain ID:            {}", profile.chain_id);
            if profile.is_signing() {
                println!("  Accounts:            {}", profile.accounts.join(", "));
            } else {
                println!("  Accounts:            (tool default)");
            }
            if let Some(ref forking) = profile.forking {
                println!(
                    "  Forking:             {} @ block {}",
                    forking.rpc_url, forking.block_number
                );
            }
            println!("  Explorer API Key:    {}", api_key);
            match custom_chain {
                Some(chain) => {
                    println!("  Explorer API:        {}", chain.api_url);
                    println!("  Explorer Browser:    {}", chain.browser_url);
                }
                None => println!("  Explorer:            (built-in)"),
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_json_flag_is_global() {
        let cli = Cli::try_parse_from(["contract-tools", "networks", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Networks));

        let cli =
            Cli::try_parse_from(["contract-tools", "--json", "network", "bscMainnet"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Network { ref name } if name == "bscMainnet"));
    }

    #[test]
    fn test_network_names_resolve_exactly() {
        assert_eq!("bscMainnet".parse::<KnownNetwork>().unwrap(), KnownNetwork::BscMainnet);
        assert!("BSCMAINNET".parse::<KnownNetwork>().is_err());
    }
}
