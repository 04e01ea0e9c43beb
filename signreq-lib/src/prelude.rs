//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use signreq_lib::prelude::*;
//! ```
//!
//! ## What's Included
//!
//! - Client: `SignRequestClient`, `ClientConfig`, `DecodeOptions`, `DecodeReport`
//! - Error types: `SignRequestError`, `SignRequestErrorCode`, `FragmentError`, `Result`
//! - Collaborator traits: `LedgerClient`, `AddressResolver`, `TrustDocumentResolver`
//! - Ledger model: `AccountId`, `Keypair`, `Network`, `Operation`, `TransactionEnvelope`

// Client
pub use crate::config::{ClientConfig, DecodeOptions};
pub use crate::request::{DecodeReport, RejectedGroup, SignRequestClient};

// Error handling
pub use crate::errors::{FragmentError, SignRequestError, SignRequestErrorCode};
pub use crate::Result;

// Collaborator traits
pub use crate::transport::{AddressResolver, LedgerClient, TrustDocumentResolver};

// Codec
pub use crate::codec::{Message, PayloadKind};
pub use crate::interpreter::{DecodedMessage, DecodedPayload};

// Addressing and trust
pub use crate::address::{Address, FederationRecord};
pub use crate::trust::TrustDocument;

// Ledger model
pub use crate::ledger::{
    AccountId, AccountState, Keypair, Memo, Network, Operation, Receipt, Transaction,
    TransactionEnvelope,
};

// HTTP adapters (when available)
#[cfg(feature = "http-client")]
pub use crate::transport::http::{
    HttpFederationResolver, HttpLedgerClient, HttpTrustDocumentResolver,
};
