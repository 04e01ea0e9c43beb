//! Integration tests for the HTTP collaborators.
//!
//! These tests run the adapters against mock HTTP servers.
//!
//! ```bash
//! cargo test -p signreq-lib --features http-client --test http_adapters
//! ```

#![cfg(feature = "http-client")]

use signreq_lib::config::ClientConfig;
use signreq_lib::ledger::{Memo, Network, Operation, TransactionBuilder, TransactionEnvelope};
use signreq_lib::test_utils::{test_account, test_account_state, test_keypair};
use signreq_lib::transport::http::{
    HttpFederationResolver, HttpLedgerClient, HttpTrustDocumentResolver,
};
use signreq_lib::{AddressResolver, LedgerClient, SignRequestError, TrustDocumentResolver};
use wiremock::{
    matchers::{body_string, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn host(server: &MockServer) -> String {
    server
        .uri()
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .to_string()
}

fn trust_resolver() -> HttpTrustDocumentResolver {
    HttpTrustDocumentResolver::new(5).unwrap().with_scheme("http")
}

// ============================================================================
// Ledger client
// ============================================================================

#[tokio::test]
async fn test_load_account_mock() {
    let mock_server = MockServer::start().await;
    let account = test_account(1);

    Mock::given(method("GET"))
        .and(path(format!("/accounts/{}", account)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "account_id": account.as_str(),
            "sequence": "4294967300",
            "home_domain": "sender.example",
            "balances": []
        })))
        .mount(&mock_server)
        .await;

    let client = HttpLedgerClient::new(&ClientConfig::new(mock_server.uri())).unwrap();
    let state = client.load_account(&account).await.unwrap();

    assert_eq!(state.account_id, account);
    assert_eq!(state.sequence, 4_294_967_300);
    assert_eq!(state.home_domain.as_deref(), Some("sender.example"));
}

#[tokio::test]
async fn test_load_account_not_found_mock() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Resource Missing"))
        .mount(&mock_server)
        .await;

    let client = HttpLedgerClient::new(&ClientConfig::new(mock_server.uri())).unwrap();
    let err = client.load_account(&test_account(1)).await.unwrap_err();
    assert!(matches!(
        err,
        SignRequestError::NotFound { ref resource_type, .. } if resource_type == "account"
    ));
}

#[tokio::test]
async fn test_load_account_rate_limited_mock() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let client = HttpLedgerClient::new(&ClientConfig::new(mock_server.uri())).unwrap();
    let err = client.load_account(&test_account(1)).await.unwrap_err();
    assert!(matches!(err, SignRequestError::RateLimited { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_submit_transaction_mock() {
    let mock_server = MockServer::start().await;

    let tx = TransactionBuilder::new(&test_account_state(1, 9, "sender.example"))
        .with_memo(Memo::Text("hi".into()))
        .add_operation(Operation::native_payment(test_account(2), 1))
        .build()
        .unwrap();
    let mut envelope = TransactionEnvelope::new(tx);
    envelope.sign(&test_keypair(1), &Network::Testnet).unwrap();
    let expected_body = format!("tx={}", envelope.to_hex().unwrap());

    Mock::given(method("POST"))
        .and(path("/transactions"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string(expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "hash": "abc123",
            "ledger": 77
        })))
        .mount(&mock_server)
        .await;

    let client = HttpLedgerClient::new(&ClientConfig::new(mock_server.uri())).unwrap();
    let receipt = client.submit_transaction(&envelope).await.unwrap();
    assert_eq!(receipt.hash, "abc123");
    assert_eq!(receipt.ledger, 77);
}

#[tokio::test]
async fn test_submit_server_error_mock() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
        .mount(&mock_server)
        .await;

    let tx = TransactionBuilder::new(&test_account_state(1, 9, "sender.example"))
        .add_operation(Operation::native_payment(test_account(2), 1))
        .build()
        .unwrap();

    let client = HttpLedgerClient::new(&ClientConfig::new(mock_server.uri())).unwrap();
    let err = client
        .submit_transaction(&TransactionEnvelope::new(tx))
        .await
        .unwrap_err();
    assert!(matches!(err, SignRequestError::Network(_)));
}

// ============================================================================
// Trust documents and federation
// ============================================================================

#[tokio::test]
async fn test_trust_document_mock() {
    let mock_server = MockServer::start().await;
    let account = test_account(1);

    Mock::given(method("GET"))
        .and(path("/.well-known/stellar.toml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "VERSION = \"2.0.0\"\nSIGNING_REQUEST_ACCOUNT = \"{}\"\n",
            account
        )))
        .mount(&mock_server)
        .await;

    let doc = trust_resolver().resolve(&host(&mock_server)).await.unwrap();
    assert_eq!(doc.signing_request_account.as_deref(), Some(account.as_str()));
}

#[tokio::test]
async fn test_trust_document_missing_mock() {
    let mock_server = MockServer::start().await;

    let err = trust_resolver()
        .resolve(&host(&mock_server))
        .await
        .unwrap_err();
    assert!(matches!(err, SignRequestError::NotFound { .. }));
}

#[tokio::test]
async fn test_trust_document_malformed_mock() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/.well-known/stellar.toml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not toml"))
        .mount(&mock_server)
        .await;

    let err = trust_resolver()
        .resolve(&host(&mock_server))
        .await
        .unwrap_err();
    assert!(matches!(err, SignRequestError::Serialization(_)));
}

#[tokio::test]
async fn test_federation_lookup_mock() {
    let mock_server = MockServer::start().await;
    let receiver = test_account(2);
    let domain = host(&mock_server);

    Mock::given(method("GET"))
        .and(path("/.well-known/stellar.toml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "FEDERATION_SERVER = \"{}/federation\"\n",
            mock_server.uri()
        )))
        .mount(&mock_server)
        .await;

    let address = format!("bob*{}", domain);
    Mock::given(method("GET"))
        .and(path("/federation"))
        .and(query_param("q", address.as_str()))
        .and(query_param("type", "name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "stellar_address": address,
            "account_id": receiver.as_str(),
            "memo_type": "text",
            "memo": "invoice-9"
        })))
        .mount(&mock_server)
        .await;

    let resolver = HttpFederationResolver::new(trust_resolver());
    let record = resolver.resolve(&address).await.unwrap();
    assert_eq!(record.account_id, receiver);
    assert_eq!(record.memo().unwrap(), Memo::Text("invoice-9".into()));
}

#[tokio::test]
async fn test_federation_without_server_mock() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/.well-known/stellar.toml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("VERSION = \"2.0.0\"\n"))
        .mount(&mock_server)
        .await;

    let resolver = HttpFederationResolver::new(trust_resolver());
    let err = resolver
        .resolve(&format!("bob*{}", host(&mock_server)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SignRequestError::NotFound { ref resource_type, .. } if resource_type == "FEDERATION_SERVER"
    ));
}
