//! Contract build tools library
//!
//! Provides the typed compiler, network and block-explorer configuration
//! consumed by the contract build/deploy toolchain.

pub mod config;
pub mod explorer;
pub mod profiles;
pub mod secrets;

pub use config::{
    build_configuration, load_secrets, validate, BuildConfiguration, CompilerProfile,
    ConfigError, ForkingProfile, NetworkProfile,
};
pub use explorer::{ApiKey, CustomChain, ExplorerProfile};
pub use profiles::KnownNetwork;
pub use secrets::{SecretPolicy, Secrets};
