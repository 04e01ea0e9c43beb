//! Error types for signing-request operations.
//!
//! [`SignRequestError`] is the crate-wide error. Structural problems confined
//! to a single fragment group are reported as [`FragmentError`] and never
//! abort sibling messages.

use std::fmt;

use crate::codec::PayloadKind;

/// Error codes for FFI and logging integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SignRequestErrorCode {
    /// No entry on the carrier matched the protocol namespace
    NoProtocolEntries = 1000,
    /// Gap in the sequence indices of a message
    IncompleteMessage = 1001,
    /// Reassembled body is malformed for its declared kind
    PayloadDecode = 1002,
    /// Source account carries no home domain
    MissingHomeDomain = 2000,
    /// Trust document could not be fetched or parsed
    TrustDocumentUnavailable = 2001,
    /// Trust document does not authorize the source account
    UnauthorizedSigner = 2002,
    /// Destination address could not be resolved
    AddressResolution = 3000,
    /// Transport/network layer error
    Network = 4000,
    /// Remote resource not found
    NotFound = 4001,
    /// Rate limited by a remote service
    RateLimited = 4002,
    /// Invalid request/data
    InvalidData = 5000,
    /// Serialization error
    Serialization = 5001,
    /// Key or signature error
    Signing = 5002,
    /// Internal/unexpected error
    Internal = 9999,
}

/// Comprehensive error type for signing-request operations.
#[derive(Debug)]
pub enum SignRequestError {
    /// No entry on the carrier matched the protocol namespace.
    NoProtocolEntries,

    /// A message is missing one of its fragments.
    IncompleteMessage {
        /// Correlation id of the affected message
        correlation_id: String,
        /// First missing sequence index
        missing_index: u32,
    },

    /// The body could not be deserialized as the declared payload kind.
    PayloadDecode {
        /// Declared payload kind
        kind: PayloadKind,
        /// Underlying deserialization error
        reason: String,
    },

    /// The source account has no home domain to validate against.
    MissingHomeDomain {
        /// Account that was checked
        account: String,
    },

    /// The trust document for a domain could not be fetched or parsed.
    TrustDocumentUnavailable {
        /// Domain whose document was requested
        domain: String,
        /// Underlying error message
        reason: String,
    },

    /// The trust document does not list the account as signing-request issuer.
    UnauthorizedSigner {
        /// Domain whose document was consulted
        domain: String,
        /// Account that issued the request
        account: String,
        /// Account declared in the trust document, if any
        declared: Option<String>,
    },

    /// Destination address resolution failed.
    AddressResolution {
        /// Address that was being resolved
        address: String,
        /// Underlying error message
        reason: String,
    },

    /// Transport/network layer error from a collaborator.
    Network(String),

    /// Remote resource not found (account, document, record).
    NotFound {
        /// Type of resource (e.g., "account", "federation record")
        resource_type: String,
        /// Resource identifier
        identifier: String,
    },

    /// Rate limited, the caller may retry after a delay.
    RateLimited {
        /// Suggested retry delay in milliseconds
        retry_after_ms: u64,
    },

    /// Invalid data provided.
    InvalidData {
        /// Field or parameter name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Serialization/deserialization error outside of payload decoding.
    Serialization(String),

    /// Key parsing or signature failure.
    Signing(String),

    /// Internal/unexpected error.
    Internal(String),

    /// An error with the operation that produced it.
    Context {
        /// Operation label
        context: &'static str,
        /// Wrapped error
        source: Box<SignRequestError>,
    },
}

impl SignRequestError {
    /// Get the error code, looking through any added context.
    pub fn code(&self) -> SignRequestErrorCode {
        match self {
            Self::NoProtocolEntries => SignRequestErrorCode::NoProtocolEntries,
            Self::IncompleteMessage { .. } => SignRequestErrorCode::IncompleteMessage,
            Self::PayloadDecode { .. } => SignRequestErrorCode::PayloadDecode,
            Self::MissingHomeDomain { .. } => SignRequestErrorCode::MissingHomeDomain,
            Self::TrustDocumentUnavailable { .. } => {
                SignRequestErrorCode::TrustDocumentUnavailable
            }
            Self::UnauthorizedSigner { .. } => SignRequestErrorCode::UnauthorizedSigner,
            Self::AddressResolution { .. } => SignRequestErrorCode::AddressResolution,
            Self::Network(_) => SignRequestErrorCode::Network,
            Self::NotFound { .. } => SignRequestErrorCode::NotFound,
            Self::RateLimited { .. } => SignRequestErrorCode::RateLimited,
            Self::InvalidData { .. } => SignRequestErrorCode::InvalidData,
            Self::Serialization(_) => SignRequestErrorCode::Serialization,
            Self::Signing(_) => SignRequestErrorCode::Signing,
            Self::Internal(_) => SignRequestErrorCode::Internal,
            Self::Context { source, .. } => source.code(),
        }
    }

    /// Strip any added context and return the underlying error.
    pub fn root(&self) -> &SignRequestError {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns true if a caller-side retry could succeed.
    ///
    /// Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.root(),
            Self::Network(_) | Self::RateLimited { .. } | Self::TrustDocumentUnavailable { .. }
        )
    }

    /// Returns true for failures of the domain trust check.
    pub fn is_trust_failure(&self) -> bool {
        matches!(
            self.code(),
            SignRequestErrorCode::MissingHomeDomain
                | SignRequestErrorCode::TrustDocumentUnavailable
                | SignRequestErrorCode::UnauthorizedSigner
        )
    }

    /// Wrap this error with the label of the operation that failed.
    pub fn context(self, context: &'static str) -> Self {
        Self::Context {
            context,
            source: Box::new(self),
        }
    }

    /// Create a network error from any error type.
    pub fn network<E: std::error::Error>(err: E) -> Self {
        Self::Network(err.to_string())
    }

    /// Create a not found error.
    pub fn not_found(resource_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
        }
    }

    /// Create an invalid data error.
    pub fn invalid_data(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidData {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SignRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoProtocolEntries => write!(f, "no relevant manage data entries found"),
            Self::IncompleteMessage {
                correlation_id,
                missing_index,
            } => write!(
                f,
                "message {} is missing fragment {}",
                correlation_id, missing_index
            ),
            Self::PayloadDecode { kind, reason } => {
                write!(f, "failed to decode {} payload: {}", kind, reason)
            }
            Self::MissingHomeDomain { account } => {
                write!(f, "home domain not set on source account {}", account)
            }
            Self::TrustDocumentUnavailable { domain, reason } => write!(
                f,
                "trust document for {} is not found or invalid: {}",
                domain, reason
            ),
            Self::UnauthorizedSigner {
                domain,
                account,
                declared,
            } => match declared {
                Some(declared) => write!(
                    f,
                    "{} authorizes {} for signing requests, not {}",
                    domain, declared, account
                ),
                None => write!(
                    f,
                    "{} does not declare a signing request account (source {})",
                    domain, account
                ),
            },
            Self::AddressResolution { address, reason } => {
                write!(f, "failed to resolve address {}: {}", address, reason)
            }
            Self::Network(msg) => write!(f, "network error: {}", msg),
            Self::NotFound {
                resource_type,
                identifier,
            } => write!(f, "{} not found: {}", resource_type, identifier),
            Self::RateLimited { retry_after_ms } => {
                write!(f, "rate limited, retry after {}ms", retry_after_ms)
            }
            Self::InvalidData { field, reason } => write!(f, "invalid {}: {}", field, reason),
            Self::Serialization(msg) => write!(f, "serialization error: {}", msg),
            Self::Signing(msg) => write!(f, "signing error: {}", msg),
            Self::Internal(msg) => write!(f, "internal error: {}", msg),
            Self::Context { context, source } => write!(f, "{} failed: {}", context, source),
        }
    }
}

impl std::error::Error for SignRequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Context { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SignRequestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Structural failure of one fragment group.
///
/// Only the group named by the correlation id is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FragmentError {
    #[error("fragment {missing_index} is missing")]
    IncompleteMessage { missing_index: u32 },
    #[error("fragments mix payload kinds {first} and {second}")]
    InconsistentKind {
        first: PayloadKind,
        second: PayloadKind,
    },
    #[error("fragment {index} carries conflicting values")]
    ConflictingFragment { index: u32 },
    #[error("invalid sequence index '{0}'")]
    InvalidSequenceIndex(String),
}

impl FragmentError {
    /// Promote to a crate error for the given correlation id.
    pub fn into_error(self, correlation_id: &str) -> SignRequestError {
        match self {
            Self::IncompleteMessage { missing_index } => SignRequestError::IncompleteMessage {
                correlation_id: correlation_id.to_string(),
                missing_index,
            },
            other => SignRequestError::invalid_data(
                format!("message {}", correlation_id),
                other.to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = SignRequestError::RateLimited {
            retry_after_ms: 1000,
        };
        assert_eq!(err.code(), SignRequestErrorCode::RateLimited);
        assert!(err.is_retryable());

        let err = SignRequestError::UnauthorizedSigner {
            domain: "example.com".into(),
            account: "aa".into(),
            declared: Some("bb".into()),
        };
        assert!(!err.is_retryable());
        assert!(err.is_trust_failure());
    }

    #[test]
    fn test_context_is_transparent() {
        let err = SignRequestError::MissingHomeDomain {
            account: "aa".into(),
        }
        .context("decode_request");

        assert_eq!(err.code(), SignRequestErrorCode::MissingHomeDomain);
        assert!(err.is_trust_failure());
        assert!(matches!(err.root(), SignRequestError::MissingHomeDomain { .. }));
        assert!(err.to_string().starts_with("decode_request failed:"));
    }

    #[test]
    fn test_fragment_error_promotion() {
        let err = FragmentError::IncompleteMessage { missing_index: 3 }.into_error("abc");
        assert_eq!(err.code(), SignRequestErrorCode::IncompleteMessage);
        assert!(err.to_string().contains("abc"));

        let err = FragmentError::ConflictingFragment { index: 1 }.into_error("abc");
        assert_eq!(err.code(), SignRequestErrorCode::InvalidData);
    }
}
