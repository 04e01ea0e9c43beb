//! Ledger server REST client.
//!
//! Talks to a node serving this crate's ledger model (hex account ids,
//! postcard envelopes in hex). It is not a client for other ledgers' public
//! APIs. The routes used:
//!
//! - `GET {server}/accounts/{id}` returns the account's sequence and home domain
//! - `POST {server}/transactions` with form body `tx=<hex envelope>` submits a carrier

use async_trait::async_trait;
use serde::Deserialize;

use super::{build_client, map_reqwest_error, map_status_error};
use crate::config::ClientConfig;
use crate::ledger::{AccountId, AccountState, Receipt, TransactionEnvelope};
use crate::transport::LedgerClient;
use crate::{Result, SignRequestError};

const SERVICE: &str = "ledger";

/// Account record as served by the ledger server.
#[derive(Debug, Deserialize)]
struct AccountResponse {
    account_id: String,
    /// Sequence numbers are 64-bit and sent as strings.
    sequence: String,
    #[serde(default)]
    home_domain: Option<String>,
}

impl AccountResponse {
    fn into_state(self) -> Result<AccountState> {
        let sequence = self.sequence.parse::<i64>().map_err(|e| {
            SignRequestError::invalid_data("sequence", format!("{}: {}", self.sequence, e))
        })?;
        Ok(AccountState {
            account_id: AccountId::parse(&self.account_id)?,
            sequence,
            home_domain: self.home_domain.filter(|d| !d.is_empty()),
        })
    }
}

/// Ledger server client over HTTP.
pub struct HttpLedgerClient {
    server_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpLedgerClient {
    /// Create a client for the server in `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            server_url: config.server_url.clone(),
            timeout_secs: config.timeout_secs,
            client: build_client(config.timeout_secs)?,
        })
    }

    /// The server this client talks to.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Build the full URL for an API endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.server_url.trim_end_matches('/'), path)
    }

    async fn read_error(&self, response: reqwest::Response, identifier: &str) -> SignRequestError {
        let status = response.status().as_u16();
        let error_text = response.text().await.unwrap_or_default();
        map_status_error(SERVICE, "account", identifier, status, &error_text)
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl LedgerClient for HttpLedgerClient {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), fields(server = %self.server_url)))]
    async fn load_account(&self, account: &AccountId) -> Result<AccountState> {
        let url = self.url(&format!("accounts/{}", account));
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| map_reqwest_error(SERVICE, &self.server_url, self.timeout_secs, e))?;

        if !response.status().is_success() {
            return Err(self.read_error(response, account.as_str()).await);
        }

        let record: AccountResponse = response.json().await.map_err(|e| {
            SignRequestError::Serialization(format!("Failed to parse account response: {}", e))
        })?;
        record.into_state()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, envelope), fields(server = %self.server_url)))]
    async fn submit_transaction(&self, envelope: &TransactionEnvelope) -> Result<Receipt> {
        // Hex is URL-safe, so the form body needs no further escaping.
        let body = format!("tx={}", envelope.to_hex()?);
        let response = self
            .client
            .post(self.url("transactions"))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|e| map_reqwest_error(SERVICE, &self.server_url, self.timeout_secs, e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            #[cfg(feature = "tracing")]
            tracing::warn!(status, "carrier submission rejected: {error_text}");
            return Err(map_status_error(
                SERVICE,
                "transaction",
                "submission",
                status,
                &error_text,
            ));
        }

        response.json::<Receipt>().await.map_err(|e| {
            SignRequestError::Serialization(format!("Failed to parse submit response: {}", e))
        })
    }
}
