//! CLI command implementations

pub mod decode;
pub mod encode;
pub mod inspect;
pub mod request;

use anyhow::{Context, Result};
use signreq_lib::config::ClientConfig;
use signreq_lib::interpreter::DecodedMessage;
use signreq_lib::transport::http::{
    HttpFederationResolver, HttpLedgerClient, HttpTrustDocumentResolver,
};
use signreq_lib::SignRequestClient;

/// Client wired to the HTTP collaborators.
pub type HttpClient =
    SignRequestClient<HttpLedgerClient, HttpFederationResolver, HttpTrustDocumentResolver>;

/// Build a client talking to the server in `config`.
pub fn http_client(config: ClientConfig) -> Result<HttpClient> {
    let ledger = HttpLedgerClient::new(&config).context("Failed to create ledger client")?;
    let trust = HttpTrustDocumentResolver::new(config.timeout_secs)
        .context("Failed to create trust document resolver")?;
    let federation = HttpFederationResolver::new(trust.clone());
    Ok(SignRequestClient::new(config, ledger, federation, trust))
}

/// Decode a hex argument, accepting an optional `0x` prefix.
pub fn decode_hex(label: &str, input: &str) -> Result<Vec<u8>> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(digits).with_context(|| format!("{} is not valid hex", label))
}

/// JSON view of a decoded message.
pub fn message_json(decoded: &DecodedMessage) -> serde_json::Value {
    serde_json::json!({
        "correlation_id": decoded.message.correlation_id,
        "kind": decoded.message.payload_kind.as_str(),
        "version": decoded.message.version,
        "body_len": decoded.message.body.len(),
        "fragments": decoded.message.parts.len(),
        "sender": decoded.message.sender,
        "payload": serde_json::to_value(&decoded.payload).unwrap_or(serde_json::Value::Null),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex() {
        assert_eq!(decode_hex("payload", "0x0aff").unwrap(), vec![0x0a, 0xff]);
        assert_eq!(decode_hex("payload", " 00 ").unwrap(), vec![0x00]);
        assert!(decode_hex("payload", "zz").is_err());
    }
}
