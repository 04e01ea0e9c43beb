//! Federation lookups over HTTP.
//!
//! A `name*domain` address is resolved in two steps: the domain's trust
//! document names its `FEDERATION_SERVER`, which is then queried with
//! `?q=name*domain&type=name`.

use async_trait::async_trait;
use serde::Deserialize;

use super::{map_reqwest_error, map_status_error, HttpTrustDocumentResolver};
use crate::address::{federation_domain, FederationRecord};
use crate::ledger::AccountId;
use crate::transport::{AddressResolver, TrustDocumentResolver};
use crate::{Result, SignRequestError};

const SERVICE: &str = "federation";

#[derive(Debug, Deserialize)]
struct FederationResponse {
    account_id: String,
    #[serde(default)]
    memo_type: Option<String>,
    /// Id memos are sometimes served as numbers.
    #[serde(default)]
    memo: Option<serde_json::Value>,
}

impl FederationResponse {
    fn into_record(self) -> Result<FederationRecord> {
        let memo = match self.memo {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
        };
        Ok(FederationRecord {
            account_id: AccountId::parse(&self.account_id)?,
            memo_type: self.memo_type.filter(|t| !t.is_empty() && t != "none"),
            memo,
        })
    }
}

/// Resolves federated addresses through the domain's federation server.
pub struct HttpFederationResolver {
    documents: HttpTrustDocumentResolver,
}

impl HttpFederationResolver {
    /// Create a resolver that discovers federation servers with `documents`.
    pub fn new(documents: HttpTrustDocumentResolver) -> Self {
        Self { documents }
    }

    async fn query(&self, server: &str, address: &str) -> Result<FederationRecord> {
        let url = reqwest::Url::parse_with_params(server, &[("q", address), ("type", "name")])
            .map_err(|e| {
                SignRequestError::invalid_data("FEDERATION_SERVER", format!("{}: {}", server, e))
            })?;

        let response = self
            .documents
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| map_reqwest_error(SERVICE, server, self.documents.timeout_secs, e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            return Err(map_status_error(
                SERVICE,
                "federation record",
                address,
                status,
                &error_text,
            ));
        }

        let record: FederationResponse = response.json().await.map_err(|e| {
            SignRequestError::Serialization(format!("Failed to parse federation response: {}", e))
        })?;
        record.into_record()
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl AddressResolver for HttpFederationResolver {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    async fn resolve(&self, address: &str) -> Result<FederationRecord> {
        let domain = federation_domain(address).ok_or_else(|| {
            SignRequestError::invalid_data("address", format!("not a federated address: {address}"))
        })?;

        let document = self.documents.resolve(domain).await?;
        let server = document
            .federation_server
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SignRequestError::not_found("FEDERATION_SERVER", domain))?;

        self.query(&server, address).await
    }
}
