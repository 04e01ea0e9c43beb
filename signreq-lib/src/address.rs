//! Destination addresses.
//!
//! A destination is either a raw account id or a federated `name*domain`
//! address that has to be resolved through an [`AddressResolver`].
//!
//! # Examples
//!
//! ```rust
//! use signreq_lib::address::Address;
//!
//! let addr: Address = "alice*example.com".parse()?;
//! assert!(matches!(addr, Address::Federated(_)));
//! # Ok::<(), signreq_lib::SignRequestError>(())
//! ```
//!
//! [`AddressResolver`]: crate::AddressResolver

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ledger::{AccountId, Memo};
use crate::{Result, SignRequestError};

/// A payment destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Address {
    /// Already an account id; resolution is a pass-through.
    Account(AccountId),
    /// A `name*domain` address.
    Federated(String),
}

impl Address {
    /// The federated address, if resolution is needed.
    pub fn federated(&self) -> Option<&str> {
        match self {
            Self::Federated(addr) => Some(addr),
            Self::Account(_) => None,
        }
    }
}

impl FromStr for Address {
    type Err = SignRequestError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if AccountId::is_account_id(s) {
            return AccountId::parse(s).map(Self::Account);
        }
        match s.split_once('*') {
            Some((name, domain)) if !name.is_empty() && domain.contains('.') => {
                Ok(Self::Federated(s.to_string()))
            }
            _ => Err(SignRequestError::invalid_data(
                "address",
                format!("'{s}' is neither an account id nor a name*domain address"),
            )),
        }
    }
}

impl From<AccountId> for Address {
    fn from(id: AccountId) -> Self {
        Self::Account(id)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account(id) => write!(f, "{}", id),
            Self::Federated(addr) => write!(f, "{}", addr),
        }
    }
}

/// A resolved destination as returned by a federation server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederationRecord {
    /// Account funds should go to.
    pub account_id: AccountId,
    /// Memo type (`text`, `id` or `hash`) required by the receiver.
    #[serde(default)]
    pub memo_type: Option<String>,
    /// Memo value.
    #[serde(default)]
    pub memo: Option<String>,
}

impl FederationRecord {
    /// A record for a raw account id, without memo.
    pub fn for_account(account_id: AccountId) -> Self {
        Self {
            account_id,
            memo_type: None,
            memo: None,
        }
    }

    /// The memo the carrier must include, if any.
    pub fn memo(&self) -> Result<Memo> {
        match (&self.memo_type, &self.memo) {
            (Some(memo_type), Some(memo)) => Memo::from_federation(memo_type, memo),
            (None, Some(memo)) => Memo::from_federation("text", memo),
            _ => Ok(Memo::None),
        }
    }
}

/// Split a `name*domain` address into its domain part.
pub fn federation_domain(address: &str) -> Option<&str> {
    address
        .rsplit_once('*')
        .map(|(_, domain)| domain)
        .filter(|domain| !domain.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Keypair;

    #[test]
    fn test_parse_account_address() {
        let id = Keypair::from_seed([5u8; 32]).public_key();
        let addr: Address = id.as_str().parse().unwrap();
        assert_eq!(addr, Address::Account(id));
        assert!(addr.federated().is_none());
    }

    #[test]
    fn test_parse_federated_address() {
        let addr: Address = " bob*pay.example.com ".parse().unwrap();
        assert_eq!(addr.federated(), Some("bob*pay.example.com"));
        assert_eq!(federation_domain("bob*pay.example.com"), Some("pay.example.com"));
    }

    #[test]
    fn test_parse_invalid_address() {
        assert!("".parse::<Address>().is_err());
        assert!("*example.com".parse::<Address>().is_err());
        assert!("bob*localhost".parse::<Address>().is_err());
        assert!("not-an-account".parse::<Address>().is_err());
    }

    #[test]
    fn test_record_memo() {
        let id = Keypair::from_seed([5u8; 32]).public_key();
        let mut record = FederationRecord::for_account(id);
        assert_eq!(record.memo().unwrap(), Memo::None);

        record.memo_type = Some("id".into());
        record.memo = Some("99".into());
        assert_eq!(record.memo().unwrap(), Memo::Id(99));
    }
}
