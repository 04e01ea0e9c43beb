//! Operations, assets and memos.

use serde::{Deserialize, Serialize};

use super::{from_canonical, to_canonical, AccountId};
use crate::{Result, SignRequestError};

/// Maximum length of a data entry name in bytes.
pub const MAX_DATA_NAME_LEN: usize = 64;

/// Maximum length of a data entry value in bytes.
pub const MAX_DATA_VALUE_LEN: usize = 64;

/// Maximum length of a text memo in bytes.
const MAX_TEXT_MEMO_LEN: usize = 28;

/// Asset moved by a payment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Asset {
    /// The ledger's native currency.
    Native,
    /// An issued credit.
    Credit {
        /// Asset code (1-12 characters).
        code: String,
        /// Issuing account.
        issuer: AccountId,
    },
}

/// A single key/value metadata entry attached to an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataEntry {
    /// Entry name.
    pub name: String,
    /// Entry value; `None` deletes the entry.
    pub value: Option<Vec<u8>>,
}

impl DataEntry {
    /// Create an entry.
    pub fn new(name: impl Into<String>, value: Option<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Value bytes, treating an absent value as empty.
    pub fn value_bytes(&self) -> &[u8] {
        self.value.as_deref().unwrap_or_default()
    }
}

/// A ledger operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Fund a new account.
    CreateAccount {
        /// Account to create.
        destination: AccountId,
        /// Initial balance in stroops.
        starting_balance: i64,
    },
    /// Send an amount of an asset.
    Payment {
        /// Receiving account.
        destination: AccountId,
        /// Asset to send.
        asset: Asset,
        /// Amount in stroops.
        amount: i64,
    },
    /// Change account settings.
    SetOptions {
        /// New home domain, if changed.
        home_domain: Option<String>,
        /// Additional signer and its weight, if added.
        signer: Option<(AccountId, u8)>,
    },
    /// Set or delete a data entry.
    ManageData(DataEntry),
}

impl Operation {
    /// Build a data entry operation, enforcing the ledger's size limits.
    pub fn manage_data(name: impl Into<String>, value: Option<Vec<u8>>) -> Result<Self> {
        let entry = DataEntry::new(name, value);
        if entry.name.is_empty() || entry.name.len() > MAX_DATA_NAME_LEN {
            return Err(SignRequestError::invalid_data(
                "data name",
                format!("'{}' must be 1-{} bytes", entry.name, MAX_DATA_NAME_LEN),
            ));
        }
        if entry.value_bytes().len() > MAX_DATA_VALUE_LEN {
            return Err(SignRequestError::invalid_data(
                "data value",
                format!("at most {} bytes allowed", MAX_DATA_VALUE_LEN),
            ));
        }
        Ok(Self::ManageData(entry))
    }

    /// Native payment of `amount` stroops.
    pub fn native_payment(destination: AccountId, amount: i64) -> Self {
        Self::Payment {
            destination,
            asset: Asset::Native,
            amount,
        }
    }

    /// The data entry, if this is a manage data operation.
    pub fn as_data_entry(&self) -> Option<&DataEntry> {
        match self {
            Self::ManageData(entry) => Some(entry),
            _ => None,
        }
    }

    /// Canonical encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        to_canonical(self, "operation")
    }

    /// Decode a canonical operation.
    pub fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, String> {
        from_canonical(bytes)
    }
}

/// Transaction memo.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Memo {
    /// No memo.
    #[default]
    None,
    /// Short UTF-8 text.
    Text(String),
    /// Numeric id.
    Id(u64),
    /// 32-byte hash.
    Hash([u8; 32]),
}

impl Memo {
    /// Build a memo from a federation record's `memo_type` and `memo`.
    pub fn from_federation(memo_type: &str, memo: &str) -> Result<Self> {
        match memo_type {
            "text" => {
                if memo.len() > MAX_TEXT_MEMO_LEN {
                    return Err(SignRequestError::invalid_data(
                        "memo",
                        format!("text memo longer than {} bytes", MAX_TEXT_MEMO_LEN),
                    ));
                }
                Ok(Self::Text(memo.to_string()))
            }
            "id" => memo
                .parse()
                .map(Self::Id)
                .map_err(|e| SignRequestError::invalid_data("memo", format!("id memo: {e}"))),
            "hash" => {
                let mut hash = [0u8; 32];
                hex::decode_to_slice(memo, &mut hash).map_err(|e| {
                    SignRequestError::invalid_data("memo", format!("hash memo: {e}"))
                })?;
                Ok(Self::Hash(hash))
            }
            other => Err(SignRequestError::invalid_data(
                "memo_type",
                format!("unsupported memo type '{other}'"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manage_data_limits() {
        assert!(Operation::manage_data("k", Some(vec![0u8; 64])).is_ok());
        assert!(Operation::manage_data("k", Some(vec![0u8; 65])).is_err());
        assert!(Operation::manage_data("", None).is_err());
        assert!(Operation::manage_data("n".repeat(65), None).is_err());
    }

    #[test]
    fn test_operation_rejects_trailing_bytes() {
        let op = Operation::manage_data("key", Some(b"value".to_vec())).unwrap();
        let mut bytes = op.to_bytes().unwrap();
        assert_eq!(Operation::from_bytes(&bytes).unwrap(), op);

        bytes.push(0);
        assert!(Operation::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_memo_from_federation() {
        assert_eq!(
            Memo::from_federation("text", "invoice 7").unwrap(),
            Memo::Text("invoice 7".into())
        );
        assert_eq!(Memo::from_federation("id", "42").unwrap(), Memo::Id(42));
        assert_eq!(
            Memo::from_federation("hash", &"ab".repeat(32)).unwrap(),
            Memo::Hash([0xab; 32])
        );
        assert!(Memo::from_federation("id", "x").is_err());
        assert!(Memo::from_federation("return", "x").is_err());
    }
}
