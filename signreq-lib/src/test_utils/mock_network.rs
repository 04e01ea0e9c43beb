//! In-memory collaborators for E2E testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::address::FederationRecord;
use crate::ledger::{AccountId, AccountState, Network, Receipt, TransactionEnvelope};
use crate::transport::{AddressResolver, LedgerClient, TrustDocumentResolver};
use crate::trust::TrustDocument;
use crate::{Result, SignRequestError};

/// A simulated ledger server.
///
/// Accounts must be inserted before they can be loaded. Submissions verify
/// the source signature, bump the source sequence and are recorded.
pub struct MockLedger {
    network: Network,
    accounts: RwLock<HashMap<AccountId, AccountState>>,
    submitted: RwLock<Vec<TransactionEnvelope>>,
    load_calls: AtomicUsize,
    fail_network: AtomicBool,
}

impl MockLedger {
    /// Create an empty ledger on the test network.
    pub fn new() -> Self {
        Self::with_network(Network::Testnet)
    }

    /// Create an empty ledger for `network`.
    pub fn with_network(network: Network) -> Self {
        Self {
            network,
            accounts: RwLock::new(HashMap::new()),
            submitted: RwLock::new(Vec::new()),
            load_calls: AtomicUsize::new(0),
            fail_network: AtomicBool::new(false),
        }
    }

    /// Add or replace an account.
    pub fn insert(&self, state: AccountState) {
        self.accounts
            .write()
            .unwrap()
            .insert(state.account_id.clone(), state);
    }

    /// Current state of an account.
    pub fn account(&self, id: &AccountId) -> Option<AccountState> {
        self.accounts.read().unwrap().get(id).cloned()
    }

    /// Envelopes accepted so far.
    pub fn submitted(&self) -> Vec<TransactionEnvelope> {
        self.submitted.read().unwrap().clone()
    }

    /// Number of `load_account` calls.
    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent call fail with a network error.
    pub fn set_offline(&self, offline: bool) {
        self.fail_network.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<()> {
        if self.fail_network.load(Ordering::SeqCst) {
            return Err(SignRequestError::Network(
                "simulated ledger outage".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn load_account(&self, account: &AccountId) -> Result<AccountState> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        self.account(account)
            .ok_or_else(|| SignRequestError::not_found("account", account.as_str()))
    }

    async fn submit_transaction(&self, envelope: &TransactionEnvelope) -> Result<Receipt> {
        self.check_online()?;
        let tx = &envelope.tx;
        if !envelope.is_signed_by(&tx.source, &self.network) {
            return Err(SignRequestError::Signing(
                "transaction is not signed by its source".to_string(),
            ));
        }

        let mut accounts = self.accounts.write().unwrap();
        let state = accounts
            .get_mut(&tx.source)
            .ok_or_else(|| SignRequestError::not_found("account", tx.source.as_str()))?;
        if tx.sequence != state.sequence + 1 {
            return Err(SignRequestError::invalid_data(
                "sequence",
                format!("expected {}, got {}", state.sequence + 1, tx.sequence),
            ));
        }
        state.sequence = tx.sequence;
        drop(accounts);

        let mut submitted = self.submitted.write().unwrap();
        submitted.push(envelope.clone());
        Ok(Receipt {
            hash: envelope.hash_hex(&self.network)?,
            ledger: submitted.len() as u64,
        })
    }
}

/// Federation lookups answered from a fixed table.
#[derive(Default)]
pub struct MockAddressResolver {
    records: HashMap<String, FederationRecord>,
    calls: AtomicUsize,
}

impl MockAddressResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record for `address`.
    pub fn with_record(mut self, address: &str, record: FederationRecord) -> Self {
        self.records.insert(address.to_string(), record);
        self
    }

    /// Number of `resolve` calls.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AddressResolver for MockAddressResolver {
    async fn resolve(&self, address: &str) -> Result<FederationRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.records
            .get(address)
            .cloned()
            .ok_or_else(|| SignRequestError::not_found("federation record", address))
    }
}

/// Trust documents served from a fixed table.
#[derive(Default)]
pub struct MockTrustResolver {
    documents: HashMap<String, TrustDocument>,
    calls: AtomicUsize,
}

impl MockTrustResolver {
    /// Create an empty resolver; every domain is unavailable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a document for `domain`.
    pub fn with_document(mut self, domain: &str, document: TrustDocument) -> Self {
        self.documents.insert(domain.to_string(), document);
        self
    }

    /// Publish a document authorizing `account` for `domain`.
    pub fn with_signer(self, domain: &str, account: &str) -> Self {
        self.with_document(
            domain,
            TrustDocument {
                signing_request_account: Some(account.to_string()),
                federation_server: None,
            },
        )
    }

    /// Number of `resolve` calls.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrustDocumentResolver for MockTrustResolver {
    async fn resolve(&self, domain: &str) -> Result<TrustDocument> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.documents
            .get(domain)
            .cloned()
            .ok_or_else(|| SignRequestError::not_found("trust document", domain))
    }
}
