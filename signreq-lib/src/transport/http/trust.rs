//! Trust document retrieval over HTTPS.

use async_trait::async_trait;

use super::{build_client, map_reqwest_error, map_status_error};
use crate::transport::TrustDocumentResolver;
use crate::trust::TrustDocument;
use crate::{Result, SignRequestError};

/// Where a domain publishes its trust document.
pub const TRUST_DOCUMENT_PATH: &str = ".well-known/stellar.toml";

const SERVICE: &str = "trust document";

/// Fetches `https://{domain}/.well-known/stellar.toml`.
#[derive(Clone)]
pub struct HttpTrustDocumentResolver {
    scheme: String,
    pub(super) timeout_secs: u64,
    pub(super) client: reqwest::Client,
}

impl HttpTrustDocumentResolver {
    /// Create a resolver with the given request timeout.
    pub fn new(timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            scheme: "https".to_string(),
            timeout_secs,
            client: build_client(timeout_secs)?,
        })
    }

    /// Use another URL scheme, e.g. `http` against a local test server.
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Location of the trust document for `domain`.
    pub fn document_url(&self, domain: &str) -> String {
        format!("{}://{}/{}", self.scheme, domain, TRUST_DOCUMENT_PATH)
    }

    /// Fetch the raw document text.
    async fn fetch(&self, domain: &str) -> Result<String> {
        let url = self.document_url(domain);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| map_reqwest_error(SERVICE, domain, self.timeout_secs, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SignRequestError::Network(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(map_status_error(
                SERVICE,
                "trust document",
                domain,
                status.as_u16(),
                &text,
            ));
        }
        Ok(text)
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl TrustDocumentResolver for HttpTrustDocumentResolver {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    async fn resolve(&self, domain: &str) -> Result<TrustDocument> {
        if domain.is_empty() || domain.contains('/') {
            return Err(SignRequestError::invalid_data(
                "domain",
                format!("not a host name: {:?}", domain),
            ));
        }
        TrustDocument::from_toml(&self.fetch(domain).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_url() {
        let resolver = HttpTrustDocumentResolver::new(5).unwrap();
        assert_eq!(
            resolver.document_url("example.com"),
            "https://example.com/.well-known/stellar.toml"
        );

        let resolver = resolver.with_scheme("http");
        assert_eq!(
            resolver.document_url("127.0.0.1:8080"),
            "http://127.0.0.1:8080/.well-known/stellar.toml"
        );
    }

    #[tokio::test]
    async fn test_rejects_path_in_domain() {
        let resolver = HttpTrustDocumentResolver::new(5).unwrap();
        let err = resolver.resolve("example.com/evil").await.unwrap_err();
        assert!(matches!(err, SignRequestError::InvalidData { .. }));
    }
}
