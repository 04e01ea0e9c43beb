use async_trait::async_trait;

use crate::address::FederationRecord;
use crate::ledger::{AccountId, AccountState, Receipt, TransactionEnvelope};
use crate::trust::TrustDocument;
use crate::Result;

/// Trait describing access to the ledger server.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait LedgerClient {
    /// Loads the current state of `account`.
    ///
    /// Returns `SignRequestError::NotFound` when the account does not exist.
    async fn load_account(&self, account: &AccountId) -> Result<AccountState>;

    /// Submits a signed envelope and waits for its inclusion.
    async fn submit_transaction(&self, envelope: &TransactionEnvelope) -> Result<Receipt>;
}

/// Trait describing resolution of federated `name*domain` addresses.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait AddressResolver {
    /// Resolves `address` to an account id and optional memo.
    async fn resolve(&self, address: &str) -> Result<FederationRecord>;
}

/// Trait describing retrieval of domain trust documents.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait TrustDocumentResolver {
    /// Fetches and parses the trust document published by `domain`.
    async fn resolve(&self, domain: &str) -> Result<TrustDocument>;
}
