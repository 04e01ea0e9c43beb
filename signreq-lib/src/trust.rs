//! Domain trust validation.
//!
//! A signing request is only accepted when the domain its source account
//! claims publishes a trust document naming that exact account as
//! `SIGNING_REQUEST_ACCOUNT`. Any failure here is fatal to the whole decode.

use serde::{Deserialize, Serialize};

use crate::ledger::{AccountId, AccountState};
use crate::transport::TrustDocumentResolver;
use crate::{Result, SignRequestError};

/// The fields of a domain's trust document this crate reads.
///
/// Parsed from the TOML file a domain publishes; unknown keys are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustDocument {
    /// Account authorized to issue signing requests for the domain.
    #[serde(rename = "SIGNING_REQUEST_ACCOUNT", default)]
    pub signing_request_account: Option<String>,
    /// Federation endpoint for `name*domain` lookups.
    #[serde(rename = "FEDERATION_SERVER", default)]
    pub federation_server: Option<String>,
}

impl TrustDocument {
    /// Parse a TOML trust document.
    ///
    /// # Example
    ///
    /// ```
    /// use signreq_lib::trust::TrustDocument;
    ///
    /// let doc = TrustDocument::from_toml(
    ///     "FEDERATION_SERVER = \"https://example.com/federation\"\nSIGNING_REQUEST_ACCOUNT = \"abc\"",
    /// )
    /// .unwrap();
    /// assert_eq!(doc.signing_request_account.as_deref(), Some("abc"));
    /// ```
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text)
            .map_err(|e| SignRequestError::Serialization(format!("invalid trust document: {e}")))
    }
}

/// An account whose domain vouched for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrustedSender {
    /// The validated account.
    pub account: AccountId,
    /// The domain that authorized it.
    pub domain: String,
}

/// Check that `claimed_domain` authorizes `candidate` to issue signing requests.
///
/// # Errors
/// - `MissingHomeDomain` when `claimed_domain` is empty.
/// - `TrustDocumentUnavailable` when the document cannot be fetched or parsed.
/// - `UnauthorizedSigner` when the document names no account or another one.
///   Comparison is exact; identifiers are not normalized.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(resolver), fields(account = %candidate)))]
pub async fn validate_sender<T>(
    resolver: &T,
    candidate: &AccountId,
    claimed_domain: &str,
) -> Result<TrustedSender>
where
    T: TrustDocumentResolver + ?Sized,
{
    if claimed_domain.trim().is_empty() {
        return Err(SignRequestError::MissingHomeDomain {
            account: candidate.to_string(),
        });
    }

    let document = resolver.resolve(claimed_domain).await.map_err(|err| {
        SignRequestError::TrustDocumentUnavailable {
            domain: claimed_domain.to_string(),
            reason: err.to_string(),
        }
    })?;

    match document.signing_request_account {
        Some(declared) if declared == candidate.as_str() => Ok(TrustedSender {
            account: candidate.clone(),
            domain: claimed_domain.to_string(),
        }),
        declared => Err(SignRequestError::UnauthorizedSigner {
            domain: claimed_domain.to_string(),
            account: candidate.to_string(),
            declared,
        }),
    }
}

/// Validate an account using the home domain from its ledger state.
pub async fn validate_account<T>(resolver: &T, account: &AccountState) -> Result<TrustedSender>
where
    T: TrustDocumentResolver + ?Sized,
{
    match account.home_domain.as_deref() {
        Some(domain) if !domain.trim().is_empty() => {
            validate_sender(resolver, &account.account_id, domain).await
        }
        _ => Err(SignRequestError::MissingHomeDomain {
            account: account.account_id.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Keypair;
    use crate::test_utils::MockTrustResolver;

    fn account() -> AccountId {
        Keypair::from_seed([8u8; 32]).public_key()
    }

    #[tokio::test]
    async fn test_matching_document_is_accepted() {
        let resolver = MockTrustResolver::new().with_signer("example.com", account().as_str());
        let sender = validate_sender(&resolver, &account(), "example.com")
            .await
            .unwrap();
        assert_eq!(sender.domain, "example.com");
        assert_eq!(sender.account, account());
    }

    #[tokio::test]
    async fn test_other_account_is_rejected() {
        let other = Keypair::from_seed([9u8; 32]).public_key();
        let resolver = MockTrustResolver::new().with_signer("example.com", other.as_str());
        let err = validate_sender(&resolver, &account(), "example.com")
            .await
            .unwrap_err();
        match err {
            SignRequestError::UnauthorizedSigner { declared, .. } => {
                assert_eq!(declared.as_deref(), Some(other.as_str()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_comparison_is_exact() {
        let upper = account().as_str().to_ascii_uppercase();
        let resolver = MockTrustResolver::new().with_signer("example.com", &upper);
        let err = validate_sender(&resolver, &account(), "example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, SignRequestError::UnauthorizedSigner { .. }));
    }

    #[tokio::test]
    async fn test_document_without_signer() {
        let resolver =
            MockTrustResolver::new().with_document("example.com", TrustDocument::default());
        let err = validate_sender(&resolver, &account(), "example.com")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SignRequestError::UnauthorizedSigner { declared: None, .. }
        ));
    }

    #[tokio::test]
    async fn test_unknown_domain_is_unavailable() {
        let resolver = MockTrustResolver::new();
        let err = validate_sender(&resolver, &account(), "missing.example")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SignRequestError::TrustDocumentUnavailable { ref domain, .. } if domain == "missing.example"
        ));
    }

    #[tokio::test]
    async fn test_missing_home_domain() {
        let resolver = MockTrustResolver::new();
        let state = AccountState::new(account(), 1);
        let err = validate_account(&resolver, &state).await.unwrap_err();
        assert!(matches!(err, SignRequestError::MissingHomeDomain { .. }));
        assert_eq!(resolver.calls(), 0);

        let state = AccountState::new(account(), 1).with_home_domain("");
        let err = validate_account(&resolver, &state).await.unwrap_err();
        assert!(matches!(err, SignRequestError::MissingHomeDomain { .. }));
    }

    #[test]
    fn test_parse_trust_document() {
        let doc = TrustDocument::from_toml(
            r#"
VERSION = "2.0.0"
SIGNING_REQUEST_ACCOUNT = "abc"

[DOCUMENTATION]
ORG_NAME = "Example"
"#,
        )
        .unwrap();
        assert_eq!(doc.signing_request_account.as_deref(), Some("abc"));
        assert!(doc.federation_server.is_none());

        assert!(TrustDocument::from_toml("SIGNING_REQUEST_ACCOUNT = ").is_err());
    }
}
