//! Client configuration.
//!
//! # Environment Variables
//!
//! - `SIGNREQ_SERVER_URL` - ledger server URL
//! - `SIGNREQ_NETWORK` - `public`, `testnet`, or a network passphrase
//! - `SIGNREQ_ENV` - when set to `production` and no network is given,
//!   selects the public network instead of testnet
//!
//! # Example
//!
//! ```rust
//! use signreq_lib::config::ClientConfig;
//! use signreq_lib::ledger::Network;
//!
//! let config = ClientConfig::new("http://localhost:8000").with_network(Network::Public);
//! assert_eq!(config.server_url, "http://localhost:8000");
//! ```

use serde::{Deserialize, Serialize};

use crate::ledger::Network;

/// Ledger server used when none is configured, a locally run node.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Configuration owned by a [`SignRequestClient`](crate::SignRequestClient).
///
/// Changing the server means building a new client; clients already built
/// keep the configuration they were created with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Ledger server base URL.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Network carriers are signed for.
    #[serde(default)]
    pub network: Network,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(default_server_url())
    }
}

impl ClientConfig {
    /// Create a configuration for `server_url` on the test network.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            network: Network::default(),
            timeout_secs: default_timeout(),
        }
    }

    /// Load the configuration from the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_url = lookup("SIGNREQ_SERVER_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(default_server_url);

        let network = match lookup("SIGNREQ_NETWORK").filter(|n| !n.trim().is_empty()) {
            Some(name) => Network::from(name.as_str()),
            None if lookup("SIGNREQ_ENV").as_deref() == Some("production") => Network::Public,
            None => Network::Testnet,
        };

        Self::new(server_url).with_network(network)
    }

    /// Set the server URL.
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    /// Set the network.
    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Options for decoding an inbound carrier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeOptions {
    /// Accept the payload without checking the sender's domain.
    ///
    /// Only meant for test harnesses; the trust resolver is never called.
    #[serde(default)]
    pub skip_trust_validation: bool,
}

impl DecodeOptions {
    /// Options that skip the domain trust check.
    pub fn skip_trust_validation() -> Self {
        Self {
            skip_trust_validation: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.timeout_secs, 30);
        assert!(!DecodeOptions::default().skip_trust_validation);
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("HORIZON_URL", "https://ledger.example"),
            ("SIGNREQ_ENV", "production"),
        ]));
        assert_eq!(config.server_url, "http://localhost:8000");
        assert_eq!(config.network, Network::Public);

        let config = ClientConfig::from_lookup(lookup(&[
            ("SIGNREQ_SERVER_URL", "http://primary:8000"),
            ("SIGNREQ_NETWORK", "testnet"),
            ("SIGNREQ_ENV", "production"),
        ]));
        assert_eq!(config.server_url, "http://primary:8000");
        assert_eq!(config.network, Network::Testnet);
    }

    #[test]
    fn test_custom_network_passphrase() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("SIGNREQ_NETWORK", "Private Ledger ; 2026"),
            ("SIGNREQ_ENV", "production"),
        ]));
        assert_eq!(
            config.network,
            Network::Custom("Private Ledger ; 2026".to_string())
        );
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"network":"public"}"#).unwrap();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.network, Network::Public);
    }
}
