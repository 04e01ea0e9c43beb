//! Ledger domain types.
//!
//! These are the types a ledger client library hands to this crate: account
//! identifiers, keys, operations, transactions and their signed envelopes.
//! Everything serializes canonically with `postcard`; the hex form is what
//! travels over HTTP and the command line.

mod keys;
mod network;
mod operation;
mod transaction;

pub use keys::{AccountId, Keypair};
pub use network::Network;
pub use operation::{Asset, DataEntry, Memo, Operation, MAX_DATA_NAME_LEN, MAX_DATA_VALUE_LEN};
pub use transaction::{
    DecoratedSignature, Transaction, TransactionBuilder, TransactionEnvelope, BASE_FEE,
    MAX_OPERATIONS,
};

use serde::{Deserialize, Serialize};

use crate::{Result, SignRequestError};

/// Account state as reported by the ledger server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    /// The account this state belongs to.
    pub account_id: AccountId,
    /// Last consumed sequence number.
    pub sequence: i64,
    /// Domain the account owner claims, if set.
    #[serde(default)]
    pub home_domain: Option<String>,
}

impl AccountState {
    /// Create a state with no home domain.
    pub fn new(account_id: AccountId, sequence: i64) -> Self {
        Self {
            account_id,
            sequence,
            home_domain: None,
        }
    }

    /// Set the home domain.
    pub fn with_home_domain(mut self, domain: impl Into<String>) -> Self {
        self.home_domain = Some(domain.into());
        self
    }
}

/// Result of a successful submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Hex transaction hash.
    pub hash: String,
    /// Ledger the transaction was included in.
    pub ledger: u64,
}

/// Serialize a value canonically.
pub(crate) fn to_canonical<T: Serialize>(value: &T, label: &str) -> Result<Vec<u8>> {
    postcard::to_allocvec(value)
        .map_err(|e| SignRequestError::Serialization(format!("{label}: {e}")))
}

/// Deserialize a value, rejecting trailing bytes.
pub(crate) fn from_canonical<'a, T: Deserialize<'a>>(
    bytes: &'a [u8],
) -> std::result::Result<T, String> {
    let (value, rest) = postcard::take_from_bytes(bytes).map_err(|e| e.to_string())?;
    if !rest.is_empty() {
        return Err(format!("{} trailing bytes", rest.len()));
    }
    Ok(value)
}
