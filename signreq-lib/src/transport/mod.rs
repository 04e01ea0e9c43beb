//! Collaborator traits and their HTTP adapters.

#[cfg(feature = "http-client")]
pub mod http;
mod traits;

pub use traits::{AddressResolver, LedgerClient, TrustDocumentResolver};
