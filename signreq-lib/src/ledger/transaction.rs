//! Transactions, signed envelopes and the transaction builder.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{
    from_canonical, to_canonical, AccountId, AccountState, DataEntry, Keypair, Memo, Network,
    Operation,
};
use crate::{Result, SignRequestError};

/// Fee per operation in stroops.
pub const BASE_FEE: u32 = 100;

/// Maximum number of operations in one transaction.
pub const MAX_OPERATIONS: usize = 100;

/// An unsigned ledger transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Paying and sequencing account.
    pub source: AccountId,
    /// Total fee in stroops.
    pub fee: u32,
    /// Sequence number consumed by this transaction.
    pub sequence: i64,
    /// Attached memo.
    pub memo: Memo,
    /// Operations in execution order.
    pub operations: Vec<Operation>,
}

impl Transaction {
    /// Canonical encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        to_canonical(self, "transaction")
    }

    /// Hash signed by every signer: `sha256(network_id || tx_bytes)`.
    pub fn hash(&self, network: &Network) -> Result<[u8; 32]> {
        let mut hasher = Sha256::new();
        hasher.update(network.network_id());
        hasher.update(self.to_bytes()?);
        Ok(hasher.finalize().into())
    }

    /// All data entries carried by manage data operations, in order.
    pub fn data_entries(&self) -> Vec<DataEntry> {
        self.operations
            .iter()
            .filter_map(Operation::as_data_entry)
            .cloned()
            .collect()
    }
}

/// A signature together with the account that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratedSignature {
    /// Signing account.
    pub signer: AccountId,
    /// 64-byte ed25519 signature.
    pub signature: Vec<u8>,
}

/// A transaction with its signatures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEnvelope {
    /// The signed transaction.
    pub tx: Transaction,
    /// Signatures over the transaction hash.
    pub signatures: Vec<DecoratedSignature>,
}

impl TransactionEnvelope {
    /// Wrap an unsigned transaction.
    pub fn new(tx: Transaction) -> Self {
        Self {
            tx,
            signatures: Vec::new(),
        }
    }

    /// Add a signature for `network`.
    pub fn sign(&mut self, keypair: &Keypair, network: &Network) -> Result<()> {
        let hash = self.tx.hash(network)?;
        self.signatures.push(DecoratedSignature {
            signer: keypair.public_key(),
            signature: keypair.sign(&hash).to_vec(),
        });
        Ok(())
    }

    /// Returns true if `account` produced a valid signature for `network`.
    pub fn is_signed_by(&self, account: &AccountId, network: &Network) -> bool {
        let Ok(hash) = self.tx.hash(network) else {
            return false;
        };
        self.signatures
            .iter()
            .any(|sig| &sig.signer == account && account.verify(&hash, &sig.signature))
    }

    /// Hex transaction hash for `network`.
    pub fn hash_hex(&self, network: &Network) -> Result<String> {
        Ok(hex::encode(self.tx.hash(network)?))
    }

    /// Canonical encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        to_canonical(self, "transaction envelope")
    }

    /// Decode a canonical envelope.
    pub fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, String> {
        from_canonical(bytes)
    }

    /// Hex form of the canonical encoding.
    pub fn to_hex(&self) -> Result<String> {
        Ok(hex::encode(self.to_bytes()?))
    }

    /// Decode the hex form.
    pub fn from_hex(s: &str) -> std::result::Result<Self, String> {
        let bytes = hex::decode(s.trim()).map_err(|e| e.to_string())?;
        Self::from_bytes(&bytes)
    }
}

/// Builds a transaction on top of loaded account state.
///
/// # Example
///
/// ```
/// use signreq_lib::ledger::{AccountState, Keypair, Operation, TransactionBuilder};
///
/// let source = Keypair::from_seed([1u8; 32]);
/// let dest = Keypair::from_seed([2u8; 32]).public_key();
/// let account = AccountState::new(source.public_key(), 41);
///
/// let tx = TransactionBuilder::new(&account)
///     .add_operation(Operation::native_payment(dest, 1))
///     .build()
///     .unwrap();
/// assert_eq!(tx.sequence, 42);
/// assert_eq!(tx.fee, 100);
/// ```
#[derive(Clone, Debug)]
pub struct TransactionBuilder {
    source: AccountId,
    current_sequence: i64,
    base_fee: u32,
    memo: Memo,
    operations: Vec<Operation>,
}

impl TransactionBuilder {
    /// Start a transaction consuming the account's next sequence number.
    pub fn new(account: &AccountState) -> Self {
        Self {
            source: account.account_id.clone(),
            current_sequence: account.sequence,
            base_fee: BASE_FEE,
            memo: Memo::None,
            operations: Vec::new(),
        }
    }

    /// Set the per-operation fee.
    pub fn with_base_fee(mut self, fee: u32) -> Self {
        self.base_fee = fee;
        self
    }

    /// Set the memo.
    pub fn with_memo(mut self, memo: Memo) -> Self {
        self.memo = memo;
        self
    }

    /// Append an operation.
    pub fn add_operation(mut self, op: Operation) -> Self {
        self.operations.push(op);
        self
    }

    /// Append several operations.
    pub fn add_operations(mut self, ops: impl IntoIterator<Item = Operation>) -> Self {
        self.operations.extend(ops);
        self
    }

    /// Finish the transaction.
    pub fn build(self) -> Result<Transaction> {
        if self.operations.is_empty() {
            return Err(SignRequestError::invalid_data(
                "transaction",
                "at least one operation is required",
            ));
        }
        if self.operations.len() > MAX_OPERATIONS {
            return Err(SignRequestError::invalid_data(
                "transaction",
                format!(
                    "{} operations exceed the limit of {}",
                    self.operations.len(),
                    MAX_OPERATIONS
                ),
            ));
        }
        let fee = self
            .base_fee
            .checked_mul(self.operations.len() as u32)
            .ok_or_else(|| SignRequestError::invalid_data("fee", "fee overflows u32"))?;
        let sequence = self.current_sequence.checked_add(1).ok_or_else(|| {
            SignRequestError::invalid_data(
                "sequence",
                format!("account {} has exhausted its sequence numbers", self.source),
            )
        })?;

        Ok(Transaction {
            source: self.source,
            fee,
            sequence,
            memo: self.memo,
            operations: self.operations,
        })
    }
}
