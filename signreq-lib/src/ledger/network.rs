//! Network selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Ledger network a carrier is signed for.
///
/// The passphrase is hashed into every signature so an envelope signed for
/// one network never verifies on another.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Production network.
    Public,
    /// Shared test network.
    #[default]
    Testnet,
    /// Any other network, identified by its passphrase.
    Custom(String),
}

impl Network {
    /// Passphrase of the production network.
    pub const PUBLIC_PASSPHRASE: &'static str = "Public Global Stellar Network ; September 2015";

    /// Passphrase of the test network.
    pub const TESTNET_PASSPHRASE: &'static str = "Test SDF Network ; September 2015";

    /// The network passphrase.
    pub fn passphrase(&self) -> &str {
        match self {
            Self::Public => Self::PUBLIC_PASSPHRASE,
            Self::Testnet => Self::TESTNET_PASSPHRASE,
            Self::Custom(passphrase) => passphrase,
        }
    }

    /// SHA-256 of the passphrase.
    pub fn network_id(&self) -> [u8; 32] {
        Sha256::digest(self.passphrase().as_bytes()).into()
    }
}

impl From<&str> for Network {
    /// `public`, `mainnet` and `production` select the production network,
    /// `testnet` and `test` the test network; anything else is a passphrase.
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" | "mainnet" | "production" => Self::Public,
            "testnet" | "test" => Self::Testnet,
            _ => match s.trim() {
                Self::PUBLIC_PASSPHRASE => Self::Public,
                Self::TESTNET_PASSPHRASE => Self::Testnet,
                other => Self::Custom(other.to_string()),
            },
        }
    }
}

impl FromStr for Network {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Testnet => write!(f, "testnet"),
            Self::Custom(passphrase) => write!(f, "{}", passphrase),
        }
    }
}
