//! Payload interpretation.
//!
//! Turns a reassembled [`Message`] into the ledger value its kind declares.

use serde::Serialize;

use crate::codec::{Message, PayloadKind};
use crate::ledger::{Operation, TransactionEnvelope};
use crate::{Result, SignRequestError};

/// The ledger value carried by a message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum DecodedPayload {
    /// A single operation to sign.
    Operation(Operation),
    /// A full transaction to sign.
    Transaction(TransactionEnvelope),
}

impl DecodedPayload {
    /// Kind of this payload.
    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::Operation(_) => PayloadKind::Operation,
            Self::Transaction(_) => PayloadKind::Transaction,
        }
    }
}

/// A message together with its decoded payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedMessage {
    /// The reassembled message.
    pub message: Message,
    /// Its decoded value.
    pub payload: DecodedPayload,
}

/// Deserialize a message body according to its declared kind.
///
/// Malformed bodies fail with [`SignRequestError::PayloadDecode`].
pub fn interpret(message: &Message) -> Result<DecodedPayload> {
    interpret_body(message.payload_kind, &message.body)
}

/// Deserialize raw body bytes as `kind`.
pub fn interpret_body(kind: PayloadKind, body: &[u8]) -> Result<DecodedPayload> {
    let decoded = match kind {
        PayloadKind::Transaction => {
            TransactionEnvelope::from_bytes(body).map(DecodedPayload::Transaction)
        }
        PayloadKind::Operation => Operation::from_bytes(body).map(DecodedPayload::Operation),
    };
    decoded.map_err(|reason| SignRequestError::PayloadDecode { kind, reason })
}

/// Decode every message, stopping at the first malformed body.
pub fn interpret_all(messages: Vec<Message>) -> Result<Vec<DecodedMessage>> {
    messages
        .into_iter()
        .map(|message| {
            let payload = interpret(&message)?;
            Ok(DecodedMessage { message, payload })
        })
        .collect()
}
