//! Environment secrets snapshot
//!
//! Secrets are read once at process start and threaded through the loader as
//! an explicit value. Nothing downstream touches the process environment.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::config::ConfigError;

/// Hex-encoded signing key used for every live network.
pub const PRIVATE_KEY_MAINNET: &str = "PRIVATE_KEY_MAINNET";

/// Infura project key interpolated into the fork URL of the local network.
pub const INFURA_API_KEY: &str = "INFURA_API_KEY";

/// Every environment variable the loader reads.
pub const SECRET_NAMES: [&str; 2] = [PRIVATE_KEY_MAINNET, INFURA_API_KEY];

/// How the loader treats secrets that are unset or empty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SecretPolicy {
    /// Carry empty strings into the profiles; signing fails later at point of use.
    #[default]
    Deferred,
    /// Refuse to build a configuration while any secret is missing.
    Eager,
}

/// Immutable snapshot of secret environment variables
///
/// Missing variables resolve to the empty string.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secrets {
    values: BTreeMap<String, String>,
}

impl Secrets {
    /// Snapshot the process environment, loading `.env` first if present.
    pub fn from_env() -> Self {
        // Load .env file if it exists (non-fatal)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Snapshot the known secrets through an arbitrary lookup.
    pub fn from_lookup<F>(mut lookup: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let values = SECRET_NAMES
            .iter()
            .filter_map(|name| lookup(name).map(|value| (name.to_string(), value)))
            .collect();
        Self { values }
    }

    /// Build a snapshot from explicit name/value pairs.
    pub fn from_map<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { values }
    }

    /// Read a dotenv-formatted file without touching the process environment.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut values = BTreeMap::new();
        for item in dotenvy::from_path_iter(path.as_ref())? {
            let (key, value) = item?;
            values.insert(key, value);
        }
        Ok(Self { values })
    }

    /// Value of a secret, or the empty string when it was never set.
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn private_key(&self) -> &str {
        self.get(PRIVATE_KEY_MAINNET)
    }

    pub fn infura_api_key(&self) -> &str {
        self.get(INFURA_API_KEY)
    }

    /// Names of known secrets that are unset or empty, in declaration order.
    pub fn missing(&self) -> Vec<&'static str> {
        SECRET_NAMES
            .iter()
            .copied()
            .filter(|name| self.get(name).is_empty())
            .collect()
    }

    /// Apply `policy` to this snapshot.
    ///
    /// Under [`SecretPolicy::Eager`] the first missing secret is an error.
    /// Under [`SecretPolicy::Deferred`] missing secrets are only logged.
    pub fn enforce(&self, policy: SecretPolicy) -> Result<(), ConfigError> {
        let missing = self.missing();
        match (policy, missing.first()) {
            (_, None) => Ok(()),
            (SecretPolicy::Eager, Some(name)) => {
                Err(ConfigError::MissingSecret(name.to_string()))
            }
            (SecretPolicy::Deferred, Some(_)) => {
                for name in missing {
                    tracing::warn!(
                        secret = name,
                        "secret is unset; dependent operations will fail at use"
                    );
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in &self.values {
            let state = if value.is_empty() { "<empty>" } else { "<set>" };
            map.entry(name, &state);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;

    #[test]
    fn test_missing_resolves_to_empty() {
        let secrets = Secrets::from_map([(INFURA_API_KEY, "xyz")]);
        assert_eq!(secrets.private_key(), "");
        assert_eq!(secrets.infura_api_key(), "xyz");
        assert_eq!(secrets.missing(), vec![PRIVATE_KEY_MAINNET]);
    }

    #[test]
    fn test_lookup_only_reads_known_names() {
        let mut asked = Vec::new();
        let secrets = Secrets::from_lookup(|name| {
            asked.push(name.to_string());
            Some(format!("{name}-value"))
        });
        assert_eq!(asked, vec![PRIVATE_KEY_MAINNET, INFURA_API_KEY]);
        assert_eq!(secrets.private_key(), "PRIVATE_KEY_MAINNET-value");
    }

    #[test]
    fn test_eager_policy_names_first_missing() {
        let secrets = Secrets::from_map([(PRIVATE_KEY_MAINNET, "")]);
        let err = secrets.enforce(SecretPolicy::Eager).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret(ref name) if name == PRIVATE_KEY_MAINNET));
    }

    #[test]
    fn test_deferred_policy_tolerates_missing() {
        let secrets = Secrets::default();
        assert!(secrets.enforce(SecretPolicy::Deferred).is_ok());
    }

    #[test]
    fn test_debug_hides_values() {
        let secrets =
            Secrets::from_map([(PRIVATE_KEY_MAINNET, "0xdeadbeef"), (INFURA_API_KEY, "")]);
        let rendered = format!("{secrets:?}");
        assert!(!rendered.contains("deadbeef"));
        assert!(rendered.contains("<set>"));
        assert!(rendered.contains("<empty>"));
    }

    #[test]
    fn test_load_secrets_reads_process_env() {
        env::set_var(PRIVATE_KEY_MAINNET, "0xfeed");
        env::set_var(INFURA_API_KEY, "proj");
        let secrets = crate::config::load_secrets();
        env::remove_var(PRIVATE_KEY_MAINNET);
        env::remove_var(INFURA_API_KEY);

        assert_eq!(secrets.private_key(), "0xfeed");
        assert_eq!(secrets.infura_api_key(), "proj");
        assert!(secrets.missing().is_empty());
    }

    #[test]
    fn test_from_env_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "PRIVATE_KEY_MAINNET=0xabc").unwrap();
        writeln!(file, "INFURA_API_KEY=\"xyz\"").unwrap();
        let secrets = Secrets::from_env_file(file.path()).unwrap();
        assert_eq!(secrets.private_key(), "0xabc");
        assert_eq!(secrets.infura_api_key(), "xyz");
    }

    #[test]
    fn test_from_env_file_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Secrets::from_env_file(dir.path().join("absent.env")).is_err());
    }
}
