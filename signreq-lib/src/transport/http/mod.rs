//! HTTP implementations of the collaborator traits.
//!
//! Requires the `http-client` feature:
//!
//! ```toml
//! [dependencies]
//! signreq-lib = { version = "1.0", features = ["http-client"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use signreq_lib::config::ClientConfig;
//! use signreq_lib::transport::http::{
//!     HttpFederationResolver, HttpLedgerClient, HttpTrustDocumentResolver,
//! };
//! use signreq_lib::SignRequestClient;
//!
//! let config = ClientConfig::from_env();
//! let ledger = HttpLedgerClient::new(&config)?;
//! let trust = HttpTrustDocumentResolver::new(config.timeout_secs)?;
//! let federation = HttpFederationResolver::new(trust.clone());
//! let client = SignRequestClient::new(config, ledger, federation, trust);
//! ```

mod federation;
mod ledger;
mod trust;

pub use federation::HttpFederationResolver;
pub use ledger::HttpLedgerClient;
pub use trust::{HttpTrustDocumentResolver, TRUST_DOCUMENT_PATH};

use std::time::Duration;

use crate::{Result, SignRequestError};

/// Build a reqwest client with the given timeout.
pub(crate) fn build_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| SignRequestError::Internal(format!("Failed to build HTTP client: {}", e)))
}

/// Map HTTP status codes to SignRequestError.
pub(crate) fn map_status_error(
    service: &str,
    resource_type: &str,
    identifier: &str,
    status: u16,
    error_text: &str,
) -> SignRequestError {
    match status {
        400 => SignRequestError::InvalidData {
            field: "request".to_string(),
            reason: error_text.to_string(),
        },
        404 => SignRequestError::not_found(resource_type, identifier),
        429 => SignRequestError::RateLimited {
            retry_after_ms: 5000,
        },
        500..=599 => SignRequestError::Network(format!(
            "{} server error ({}): {}",
            service, status, error_text
        )),
        _ => SignRequestError::Network(format!(
            "{} request failed ({}): {}",
            service, status, error_text
        )),
    }
}

/// Map reqwest errors to SignRequestError.
pub(crate) fn map_reqwest_error(
    service: &str,
    target: &str,
    timeout_secs: u64,
    e: reqwest::Error,
) -> SignRequestError {
    if e.is_timeout() {
        SignRequestError::Network(format!(
            "{} request to {} timed out after {}s",
            service, target, timeout_secs
        ))
    } else if e.is_connect() {
        SignRequestError::Network(format!("failed to connect to {}: {}", target, e))
    } else {
        SignRequestError::Network(format!("{} request failed: {}", service, e))
    }
}
