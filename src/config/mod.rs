//! Relay client configuration
//!
//! Supports three sources:
//! 1. Environment variables (`FLASHBOTS_RELAY_URL`, `FLASHBOTS_SIGNING_KEY`,
//!    `FLASHBOTS_AUTH_MODE`, `FLASHBOTS_TIMEOUT_MS`)
//! 2. A JSON file
//! 3. [`RelayConfig::new`] plus builder setters
//!
//! # Examples
//!
//! ```bash
//! export FLASHBOTS_RELAY_URL="https://relay.flashbots.net"
//! export FLASHBOTS_SIGNING_KEY="0x..."
//! # Send unsigned requests instead of failing without a key
//! export FLASHBOTS_AUTH_MODE="disabled"
//! ```

use crate::auth::RequestSigner;
use crate::transport::DEFAULT_TIMEOUT_MS;
use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Public Flashbots relay on mainnet
pub const DEFAULT_RELAY_URL: &str = "https://relay.flashbots.net";

/// Environment variable names
pub mod env_vars {
    pub const RELAY_URL: &str = "FLASHBOTS_RELAY_URL";
    pub const SIGNING_KEY: &str = "FLASHBOTS_SIGNING_KEY";
    pub const AUTH_MODE: &str = "FLASHBOTS_AUTH_MODE";
    pub const TIMEOUT_MS: &str = "FLASHBOTS_TIMEOUT_MS";
}

/// Whether outgoing requests are signed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Sign every request. Without a key every call fails.
    #[default]
    Required,
    /// Send requests unsigned. Only methods that need no reputation work.
    Disabled,
}

impl FromStr for AuthMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "required" => Ok(AuthMode::Required),
            "disabled" => Ok(AuthMode::Disabled),
            other => Err(Error::Config(format!(
                "unknown auth mode {:?}, expected \"required\" or \"disabled\"",
                other
            ))),
        }
    }
}

/// Settings needed to build a [`RelayClient`](crate::RelayClient).
#[derive(Debug)]
pub struct RelayConfig {
    /// Relay JSON-RPC endpoint
    pub endpoint: String,
    /// Hex private key used to sign requests. Never logged.
    signing_key: Option<SecretString>,
    pub auth: AuthMode,
    /// Per-request timeout (milliseconds)
    pub timeout_ms: u64,
}

/// On-disk shape of a config file. Every field is optional.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    endpoint: Option<String>,
    #[serde(default)]
    signing_key: Option<SecretString>,
    #[serde(default)]
    auth: AuthMode,
    #[serde(default)]
    timeout_ms: Option<u64>,
}

impl RelayConfig {
    /// Config for `endpoint` with signing required and no key yet
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            signing_key: None,
            auth: AuthMode::Required,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_signing_key(mut self, key: impl Into<String>) -> Self {
        self.signing_key = Some(SecretString::from(key.into()));
        self
    }

    pub fn with_auth_mode(mut self, auth: AuthMode) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from any variable source. Unset or empty variables fall back to
    /// the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let endpoint = match get(env_vars::RELAY_URL) {
            Some(url) => {
                tracing::debug!("Using {} for relay endpoint", env_vars::RELAY_URL);
                url
            }
            None => DEFAULT_RELAY_URL.to_string(),
        };
        let mut config = Self::new(endpoint);

        if let Some(key) = get(env_vars::SIGNING_KEY) {
            config.signing_key = Some(SecretString::from(key));
        }
        if let Some(mode) = get(env_vars::AUTH_MODE) {
            config.auth = mode.parse()?;
        }
        if let Some(timeout) = get(env_vars::TIMEOUT_MS) {
            config.timeout_ms = timeout.trim().parse().map_err(|e| {
                Error::Config(format!("invalid {}: {}", env_vars::TIMEOUT_MS, e))
            })?;
        }

        Ok(config)
    }

    /// Load from a JSON file
    ///
    /// # Arguments
    /// * `path` - File with any of `endpoint`, `signing_key`, `auth`
    ///   (`"required"` or `"disabled"`) and `timeout_ms`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let file: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config {}: {}", path.display(), e)))?;

        Ok(Self {
            endpoint: file
                .endpoint
                .unwrap_or_else(|| DEFAULT_RELAY_URL.to_string()),
            signing_key: file.signing_key,
            auth: file.auth,
            timeout_ms: file.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
        })
    }

    pub fn has_signing_key(&self) -> bool {
        self.signing_key.is_some()
    }

    /// Parse the configured key, if any
    pub fn signer(&self) -> Result<Option<RequestSigner>> {
        self.signing_key
            .as_ref()
            .map(|key| RequestSigner::from_hex(key.expose_secret()))
            .transpose()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_RELAY_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tokio_test::assert_ok;

    const TEST_KEY: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = RelayConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.endpoint, DEFAULT_RELAY_URL);
        assert_eq!(config.auth, AuthMode::Required);
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert!(!config.has_signing_key());
        assert!(config.signer().unwrap().is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = RelayConfig::from_lookup(lookup(&[
            (env_vars::RELAY_URL, "https://relay-sepolia.flashbots.net"),
            (env_vars::SIGNING_KEY, TEST_KEY),
            (env_vars::AUTH_MODE, "Disabled"),
            (env_vars::TIMEOUT_MS, "1500"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint, "https://relay-sepolia.flashbots.net");
        assert_eq!(config.auth, AuthMode::Disabled);
        assert_eq!(config.timeout(), Duration::from_millis(1500));
        let signer = config.signer().unwrap().unwrap();
        assert_eq!(
            signer.address().to_checksum(None),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
    }

    #[test]
    fn test_empty_values_fall_back() {
        let config = RelayConfig::from_lookup(lookup(&[
            (env_vars::RELAY_URL, ""),
            (env_vars::SIGNING_KEY, "  "),
        ]))
        .unwrap();

        assert_eq!(config.endpoint, DEFAULT_RELAY_URL);
        assert!(!config.has_signing_key());
    }

    #[test]
    fn test_invalid_env_values() {
        let err = RelayConfig::from_lookup(lookup(&[(env_vars::AUTH_MODE, "sometimes")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = RelayConfig::from_lookup(lookup(&[(env_vars::TIMEOUT_MS, "soon")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_key_surfaces_on_signer() {
        let config = RelayConfig::new(DEFAULT_RELAY_URL).with_signing_key("0xnot-a-key");
        assert!(matches!(config.signer(), Err(Error::Signing(_))));
    }

    #[test]
    fn test_debug_hides_key() {
        let config = RelayConfig::default().with_signing_key(TEST_KEY);
        let debug = format!("{:?}", config);
        assert!(!debug.contains(&TEST_KEY[2..]));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"endpoint": "http://127.0.0.1:8545", "signing_key": "{}", "auth": "disabled"}}"#,
            TEST_KEY
        )
        .unwrap();

        let config = assert_ok!(RelayConfig::from_file(file.path()));

        assert_eq!(config.endpoint, "http://127.0.0.1:8545");
        assert_eq!(config.auth, AuthMode::Disabled);
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert!(config.has_signing_key());
    }

    #[test]
    fn test_from_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("relay.json");
        assert!(matches!(
            RelayConfig::from_file(&missing),
            Err(Error::Config(_))
        ));

        std::fs::write(&missing, "not json").unwrap();
        assert!(matches!(
            RelayConfig::from_file(&missing),
            Err(Error::Config(_))
        ));
    }
}
