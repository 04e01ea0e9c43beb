//! Account identifiers and signing keys.

use std::fmt;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::{Result, SignRequestError};

/// Ledger account identifier: the hex-encoded ed25519 public key.
///
/// # Example
///
/// ```
/// use signreq_lib::ledger::AccountId;
///
/// let id = AccountId::parse(&"11".repeat(32));
/// assert!(id.is_ok());
/// assert!(AccountId::parse("alice*example.com").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl AccountId {
    /// Parse and validate an account identifier.
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = decode_key(s)?;
        VerifyingKey::from_bytes(&bytes)
            .map_err(|e| SignRequestError::invalid_data("account id", e.to_string()))?;
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Get the account id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the string has the shape of an account id.
    pub fn is_account_id(s: &str) -> bool {
        s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Verify `signature` over `message` with this account's key.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(bytes) = decode_key(&self.0) else {
            return false;
        };
        let Ok(key) = VerifyingKey::from_bytes(&bytes) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };
        key.verify(message, &signature).is_ok()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn decode_key(s: &str) -> Result<[u8; 32]> {
    if !AccountId::is_account_id(s) {
        return Err(SignRequestError::invalid_data(
            "account id",
            format!("expected 64 hex characters, got '{s}'"),
        ));
    }
    let mut out = [0u8; 32];
    hex::decode_to_slice(s, &mut out)
        .map_err(|e| SignRequestError::invalid_data("account id", e.to_string()))?;
    Ok(out)
}

/// An ed25519 keypair able to sign carrier transactions.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a fresh random keypair.
    pub fn random() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Build a keypair from a 32-byte seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// Parse a hex-encoded 32-byte secret seed.
    pub fn from_secret_hex(secret: &str) -> Result<Self> {
        let mut seed = [0u8; 32];
        hex::decode_to_slice(secret.trim(), &mut seed)
            .map_err(|e| SignRequestError::Signing(format!("invalid secret key: {e}")))?;
        Ok(Self::from_seed(seed))
    }

    /// Hex-encoded secret seed.
    pub fn secret_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    /// The account id controlled by this keypair.
    pub fn public_key(&self) -> AccountId {
        AccountId(hex::encode(self.signing_key.verifying_key().to_bytes()))
    }

    /// Sign an arbitrary message.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}
