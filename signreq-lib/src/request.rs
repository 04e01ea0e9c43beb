//! Request orchestration.
//!
//! [`SignRequestClient`] ties the codec, the trust check and the ledger
//! collaborators together. It owns its configuration and collaborators, so
//! several clients with different servers can coexist.

use crate::address::{Address, FederationRecord};
use crate::codec::{encode_fragments, fragments_to_operations, group_entries, PayloadKind};
use crate::config::{ClientConfig, DecodeOptions};
use crate::errors::FragmentError;
use crate::interpreter::{interpret_all, DecodedMessage};
use crate::ledger::{
    AccountId, Keypair, Operation, Receipt, TransactionBuilder, TransactionEnvelope,
    MAX_OPERATIONS,
};
use crate::transport::{AddressResolver, LedgerClient, TrustDocumentResolver};
use crate::trust::validate_account;
use crate::{Result, SignRequestError};

/// Amount in stroops of the payment that addresses a carrier to its receiver.
pub const MARKER_PAYMENT_AMOUNT: i64 = 1;

/// A fragment group that could not be reassembled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedGroup {
    /// Correlation id of the group.
    pub correlation_id: String,
    /// Why it was rejected.
    pub error: FragmentError,
}

impl RejectedGroup {
    /// The rejection as a crate error naming the group.
    pub fn to_error(&self) -> SignRequestError {
        self.error.clone().into_error(&self.correlation_id)
    }
}

/// Everything recovered from one carrier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeReport {
    /// Source account of the carrier.
    pub source: AccountId,
    /// Home domain of the source; validated unless trust checks were skipped.
    pub sender: Option<String>,
    /// Successfully decoded messages, in order of first appearance.
    pub messages: Vec<DecodedMessage>,
    /// Groups that were present but broken.
    pub rejected: Vec<RejectedGroup>,
}

/// Client for sending and receiving signing requests.
///
/// # Example
///
/// ```ignore
/// use signreq_lib::{Address, ClientConfig, DecodeOptions, PayloadKind, SignRequestClient};
///
/// let client = SignRequestClient::new(ClientConfig::from_env(), ledger, federation, trust);
/// let carrier = client
///     .encode_request(&keypair, &"bob*example.com".parse()?, &op_bytes, PayloadKind::Operation)
///     .await?;
/// client.submit(&carrier).await?;
///
/// // On the receiving side
/// let report = client.decode_request(&carrier.to_bytes()?, DecodeOptions::default()).await?;
/// ```
pub struct SignRequestClient<L, A, T> {
    config: ClientConfig,
    ledger: L,
    addresses: A,
    trust: T,
}

impl<L, A, T> SignRequestClient<L, A, T>
where
    L: LedgerClient,
    A: AddressResolver,
    T: TrustDocumentResolver,
{
    /// Create a client from its configuration and collaborators.
    pub fn new(config: ClientConfig, ledger: L, addresses: A, trust: T) -> Self {
        Self {
            config,
            ledger,
            addresses,
            trust,
        }
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The ledger collaborator.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// The address resolver.
    pub fn addresses(&self) -> &A {
        &self.addresses
    }

    /// The trust document resolver.
    pub fn trust(&self) -> &T {
        &self.trust
    }

    /// Resolve a destination; raw account ids pass through untouched.
    pub async fn resolve_address(&self, destination: &Address) -> Result<FederationRecord> {
        match destination {
            Address::Account(id) => Ok(FederationRecord::for_account(id.clone())),
            Address::Federated(addr) => self.addresses.resolve(addr).await.map_err(|err| {
                SignRequestError::AddressResolution {
                    address: addr.clone(),
                    reason: err.to_string(),
                }
            }),
        }
    }

    /// Build and sign a carrier embedding `payload` for `destination`.
    ///
    /// The carrier is returned unsubmitted; see [`submit`](Self::submit).
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, keypair, payload), fields(payload_len = payload.len())))]
    pub async fn encode_request(
        &self,
        keypair: &Keypair,
        destination: &Address,
        payload: &[u8],
        kind: PayloadKind,
    ) -> Result<TransactionEnvelope> {
        let record = self.resolve_address(destination).await?;
        let source = self
            .ledger
            .load_account(&keypair.public_key())
            .await
            .map_err(|err| err.context("load signer account"))?;

        let fragments = encode_fragments(payload, kind);
        if fragments.len() + 1 > MAX_OPERATIONS {
            return Err(SignRequestError::invalid_data(
                "payload",
                format!(
                    "{} bytes need {} fragment operations, at most {} fit in a carrier",
                    payload.len(),
                    fragments.len(),
                    MAX_OPERATIONS - 1
                ),
            ));
        }

        let tx = TransactionBuilder::new(&source)
            .with_memo(record.memo()?)
            .add_operation(Operation::native_payment(
                record.account_id.clone(),
                MARKER_PAYMENT_AMOUNT,
            ))
            .add_operations(fragments_to_operations(&fragments)?)
            .build()?;

        let mut envelope = TransactionEnvelope::new(tx);
        envelope.sign(keypair, &self.config.network)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            destination = %record.account_id,
            fragments = fragments.len(),
            "built signing request carrier"
        );
        Ok(envelope)
    }

    /// Submit a signed carrier. Failures are not retried.
    pub async fn submit(&self, envelope: &TransactionEnvelope) -> Result<Receipt> {
        self.ledger
            .submit_transaction(envelope)
            .await
            .map_err(|err| err.context("submit carrier"))
    }

    /// Ask `destination` to sign a single operation.
    pub async fn request_operation(
        &self,
        keypair: &Keypair,
        destination: &Address,
        operation: &Operation,
    ) -> Result<Receipt> {
        let payload = operation.to_bytes()?;
        let carrier = self
            .encode_request(keypair, destination, &payload, PayloadKind::Operation)
            .await?;
        self.submit(&carrier).await
    }

    /// Ask `destination` to sign a full transaction.
    pub async fn request_transaction(
        &self,
        keypair: &Keypair,
        destination: &Address,
        transaction: &TransactionEnvelope,
    ) -> Result<Receipt> {
        let payload = transaction.to_bytes()?;
        let carrier = self
            .encode_request(keypair, destination, &payload, PayloadKind::Transaction)
            .await?;
        self.submit(&carrier).await
    }

    /// Decode a carrier from its canonical bytes.
    pub async fn decode_request(
        &self,
        envelope_bytes: &[u8],
        options: DecodeOptions,
    ) -> Result<DecodeReport> {
        let envelope = TransactionEnvelope::from_bytes(envelope_bytes).map_err(|reason| {
            SignRequestError::PayloadDecode {
                kind: PayloadKind::Transaction,
                reason,
            }
            .context("decode_request")
        })?;
        self.decode_envelope(&envelope, options).await
    }

    /// Decode an already parsed carrier.
    ///
    /// The source account is checked against its home domain before any
    /// message is looked at, unless `options` skips the check.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, envelope), fields(source = %envelope.tx.source)))]
    pub async fn decode_envelope(
        &self,
        envelope: &TransactionEnvelope,
        options: DecodeOptions,
    ) -> Result<DecodeReport> {
        self.decode_inner(envelope, options)
            .await
            .map_err(|err| err.context("decode_request"))
    }

    async fn decode_inner(
        &self,
        envelope: &TransactionEnvelope,
        options: DecodeOptions,
    ) -> Result<DecodeReport> {
        let source = envelope.tx.source.clone();
        let account = self
            .ledger
            .load_account(&source)
            .await
            .map_err(|err| err.context("load source account"))?;

        let sender = if options.skip_trust_validation {
            account.home_domain.clone()
        } else {
            Some(validate_account(&self.trust, &account).await?.domain)
        };

        let mut assembled = Vec::new();
        let mut rejected = Vec::new();
        for outcome in group_entries(&envelope.tx.data_entries())? {
            match outcome.result {
                Ok(mut message) => {
                    message.sender = sender.clone();
                    assembled.push(message);
                }
                Err(error) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        correlation_id = %outcome.correlation_id,
                        "rejecting fragment group: {error}"
                    );
                    rejected.push(RejectedGroup {
                        correlation_id: outcome.correlation_id,
                        error,
                    });
                }
            }
        }

        let messages = interpret_all(assembled)?;

        Ok(DecodeReport {
            source,
            sender,
            messages,
            rejected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::DecodedPayload;
    use crate::ledger::{AccountState, Memo, Network};
    use crate::test_utils::{MockAddressResolver, MockLedger, MockTrustResolver};

    struct Fixture {
        client: SignRequestClient<MockLedger, MockAddressResolver, MockTrustResolver>,
        sender: Keypair,
        receiver: AccountId,
    }

    fn fixture() -> Fixture {
        let sender = Keypair::from_seed([1u8; 32]);
        let receiver = Keypair::from_seed([2u8; 32]).public_key();

        let ledger = MockLedger::new();
        ledger.insert(
            AccountState::new(sender.public_key(), 100).with_home_domain("sender.example"),
        );
        let addresses = MockAddressResolver::new().with_record(
            "bob*receiver.example",
            FederationRecord {
                account_id: receiver.clone(),
                memo_type: Some("text".into()),
                memo: Some("inbox".into()),
            },
        );
        let trust = MockTrustResolver::new()
            .with_signer("sender.example", sender.public_key().as_str());

        Fixture {
            client: SignRequestClient::new(ClientConfig::default(), ledger, addresses, trust),
            sender,
            receiver,
        }
    }

    #[tokio::test]
    async fn test_carrier_layout() {
        let f = fixture();
        let op = Operation::manage_data("greeting", Some(b"hi".to_vec())).unwrap();
        let carrier = f
            .client
            .encode_request(
                &f.sender,
                &"bob*receiver.example".parse().unwrap(),
                &op.to_bytes().unwrap(),
                PayloadKind::Operation,
            )
            .await
            .unwrap();

        assert_eq!(carrier.tx.sequence, 101);
        assert_eq!(carrier.tx.memo, Memo::Text("inbox".into()));
        assert_eq!(
            carrier.tx.operations[0],
            Operation::native_payment(f.receiver.clone(), MARKER_PAYMENT_AMOUNT)
        );
        assert_eq!(carrier.tx.operations.len(), 3);
        assert!(carrier.is_signed_by(&f.sender.public_key(), &Network::Testnet));
    }

    #[tokio::test]
    async fn test_round_trip_with_trust() {
        let f = fixture();
        let op = Operation::SetOptions {
            home_domain: Some("receiver.example".into()),
            signer: None,
        };
        let carrier = f
            .client
            .encode_request(
                &f.sender,
                &Address::Account(f.receiver.clone()),
                &op.to_bytes().unwrap(),
                PayloadKind::Operation,
            )
            .await
            .unwrap();

        let report = f
            .client
            .decode_request(&carrier.to_bytes().unwrap(), DecodeOptions::default())
            .await
            .unwrap();
        assert_eq!(report.sender.as_deref(), Some("sender.example"));
        assert_eq!(report.messages.len(), 1);
        assert_eq!(report.messages[0].payload, DecodedPayload::Operation(op));
        assert_eq!(
            report.messages[0].message.sender.as_deref(),
            Some("sender.example")
        );
        assert!(report.rejected.is_empty());
    }

    #[tokio::test]
    async fn test_unresolvable_address() {
        let f = fixture();
        let err = f
            .client
            .encode_request(
                &f.sender,
                &"carol*nowhere.example".parse().unwrap(),
                b"x",
                PayloadKind::Operation,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SignRequestError::AddressResolution { .. }));
    }

    #[tokio::test]
    async fn test_oversized_payload() {
        let f = fixture();
        let err = f
            .client
            .encode_request(
                &f.sender,
                &Address::Account(f.receiver.clone()),
                &vec![0u8; 64 * 50],
                PayloadKind::Transaction,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SignRequestError::InvalidData { .. }));
    }

    #[tokio::test]
    async fn test_garbage_carrier() {
        let f = fixture();
        let err = f
            .client
            .decode_request(b"not an envelope", DecodeOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err.root(),
            SignRequestError::PayloadDecode {
                kind: PayloadKind::Transaction,
                ..
            }
        ));
    }
}
