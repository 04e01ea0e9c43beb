//! Signing request library.
//!
//! Embeds a serialized operation or transaction inside the data entries of
//! a carrier transaction so that it can be delivered to another account over
//! the ledger, and recovers such requests on the receiving side.
//!
//! The crate keeps no global state. Network access goes through the
//! [`LedgerClient`], [`AddressResolver`] and [`TrustDocumentResolver`]
//! traits; HTTP implementations are available behind the `http-client`
//! feature.
//!
//! # Features
//!
//! - **Fragment codec**: split payloads into 64-byte data entries and
//!   reassemble them regardless of order or interleaving
//! - **Domain trust**: accept requests only from accounts their home domain
//!   vouches for
//! - **Federation**: address receivers as `name*domain`
//!
//! # Example
//!
//! ```
//! use signreq_lib::codec::{encode_fragments, reassemble, Fragment, PayloadKind};
//!
//! let fragments = encode_fragments(b"hello world", PayloadKind::Operation);
//! let entries: Vec<_> = fragments.iter().map(Fragment::to_entry).collect();
//!
//! let messages = reassemble(&entries).unwrap();
//! assert_eq!(messages[0].body, b"hello world");
//! ```

pub mod address;
pub mod codec;
pub mod config;
pub mod errors;
pub mod interpreter;
pub mod ledger;
pub mod prelude;
pub mod request;
pub mod transport;
pub mod trust;

/// Mock collaborators and fixtures.
///
/// This module is only available with the `test-utils` feature or in test builds.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use address::{Address, FederationRecord};
pub use codec::{Message, PayloadKind};
pub use config::{ClientConfig, DecodeOptions};
pub use errors::{FragmentError, SignRequestError, SignRequestErrorCode};
pub use interpreter::{DecodedMessage, DecodedPayload};
pub use request::{DecodeReport, RejectedGroup, SignRequestClient};
pub use transport::{AddressResolver, LedgerClient, TrustDocumentResolver};

/// Common result alias for signing request operations.
pub type Result<T> = std::result::Result<T, SignRequestError>;
