//! Fragment codec.
//!
//! A payload travels as a run of data entries named
//! `srv1:<kind>:<correlation id>:<index>`, each holding at most
//! [`FRAGMENT_CHUNK_SIZE`] bytes. Every data fragment is followed by an end
//! marker under the same name with no value, which deletes the entry once the
//! carrier is applied. Decoders only read the non-empty fragments; see
//! [`grouper`] for reassembly.
//!
//! # Example
//!
//! ```
//! use signreq_lib::codec::{encode_fragments, PayloadKind};
//!
//! let fragments = encode_fragments(b"hello world", PayloadKind::Operation);
//! assert_eq!(fragments.len(), 2);
//! assert!(fragments[0].key().starts_with("srv1:op:"));
//! assert!(fragments[0].key().ends_with(":0"));
//! assert!(fragments[1].is_end_marker());
//! ```

pub mod grouper;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::{DataEntry, Operation, MAX_DATA_NAME_LEN};
use crate::{Result, SignRequestError};

pub use grouper::{group_entries, reassemble, GroupOutcome, Message};

/// Namespace tag of every protocol entry; doubles as the protocol version.
pub const PROTOCOL_NAMESPACE: &str = "srv1";

/// Maximum payload bytes per fragment.
pub const FRAGMENT_CHUNK_SIZE: usize = 64;

const KEY_SEPARATOR: char = ':';

/// What a reassembled body represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayloadKind {
    /// A single serialized operation.
    #[serde(rename = "op")]
    Operation,
    /// A complete serialized transaction envelope.
    #[serde(rename = "tx")]
    Transaction,
}

impl PayloadKind {
    /// Wire tag used in fragment keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operation => "op",
            Self::Transaction => "tx",
        }
    }

    /// Parse a wire tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "op" => Some(Self::Operation),
            "tx" => Some(Self::Transaction),
            _ => None,
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PayloadKind {
    type Err = SignRequestError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "op" | "operation" => Ok(Self::Operation),
            "tx" | "transaction" => Ok(Self::Transaction),
            other => Err(SignRequestError::invalid_data(
                "payload kind",
                format!("expected 'op' or 'tx', got '{other}'"),
            )),
        }
    }
}

/// One tagged fragment of an encoded payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    /// Kind of the payload this fragment belongs to.
    pub payload_kind: PayloadKind,
    /// Token shared by all fragments of one message.
    pub correlation_id: String,
    /// Position within the message.
    pub sequence_index: u32,
    /// Chunk bytes; `None` marks the end of this index.
    pub value: Option<Vec<u8>>,
}

impl Fragment {
    /// Entry name: `srv1:<kind>:<correlation id>:<index>`.
    pub fn key(&self) -> String {
        format!(
            "{PROTOCOL_NAMESPACE}:{}:{}:{}",
            self.payload_kind, self.correlation_id, self.sequence_index
        )
    }

    /// Returns true for the valueless entry that closes an index.
    pub fn is_end_marker(&self) -> bool {
        self.value.is_none()
    }

    /// The data entry this fragment is written as.
    pub fn to_entry(&self) -> DataEntry {
        DataEntry::new(self.key(), self.value.clone())
    }

    /// The manage data operation carrying this fragment.
    pub fn to_operation(&self) -> Result<Operation> {
        Operation::manage_data(self.key(), self.value.clone())
    }
}

/// Components of a protocol entry name, borrowed from the name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FragmentKey<'a> {
    /// Namespace / version tag.
    pub namespace: &'a str,
    /// Declared payload kind.
    pub payload_kind: PayloadKind,
    /// Correlation id.
    pub correlation_id: &'a str,
    /// Unparsed sequence index.
    pub sequence_index: &'a str,
}

impl<'a> FragmentKey<'a> {
    /// Split an entry name into protocol components.
    ///
    /// Returns `None` for anything that is not protocol data: a wrong
    /// component count, a foreign namespace, an unknown kind, or an empty
    /// correlation id or index.
    pub fn parse(name: &'a str) -> Option<Self> {
        let mut parts = name.split(KEY_SEPARATOR);
        let namespace = parts.next()?;
        let kind = parts.next()?;
        let correlation_id = parts.next()?;
        let sequence_index = parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        if namespace != PROTOCOL_NAMESPACE || correlation_id.is_empty() || sequence_index.is_empty()
        {
            return None;
        }
        Some(Self {
            namespace,
            payload_kind: PayloadKind::from_tag(kind)?,
            correlation_id,
            sequence_index,
        })
    }
}

/// Split `payload` into fragments under a fresh random correlation id.
pub fn encode_fragments(payload: &[u8], kind: PayloadKind) -> Vec<Fragment> {
    chunk_payload(payload, kind, &Uuid::new_v4().to_string())
}

/// Split `payload` into fragments under a caller-chosen correlation id.
///
/// The id must be non-empty, contain no `:` and keep every key within the
/// ledger's data name limit.
pub fn encode_fragments_with_id(
    payload: &[u8],
    kind: PayloadKind,
    correlation_id: &str,
) -> Result<Vec<Fragment>> {
    if correlation_id.is_empty() || correlation_id.contains(KEY_SEPARATOR) {
        return Err(SignRequestError::invalid_data(
            "correlation id",
            format!("'{correlation_id}' must be non-empty and free of ':'"),
        ));
    }
    let fragments = chunk_payload(payload, kind, correlation_id);
    if let Some(last) = fragments.last() {
        if last.key().len() > MAX_DATA_NAME_LEN {
            return Err(SignRequestError::invalid_data(
                "correlation id",
                format!("key '{}' exceeds {} bytes", last.key(), MAX_DATA_NAME_LEN),
            ));
        }
    }
    Ok(fragments)
}

/// Manage data operations for a list of fragments, in order.
pub fn fragments_to_operations(fragments: &[Fragment]) -> Result<Vec<Operation>> {
    fragments.iter().map(Fragment::to_operation).collect()
}

fn chunk_payload(payload: &[u8], kind: PayloadKind, correlation_id: &str) -> Vec<Fragment> {
    // An empty payload still gets one pair at index 0 so the group is visible.
    let chunks: Vec<&[u8]> = if payload.is_empty() {
        vec![payload]
    } else {
        payload.chunks(FRAGMENT_CHUNK_SIZE).collect()
    };

    let mut fragments = Vec::with_capacity(chunks.len() * 2);
    for (index, chunk) in chunks.into_iter().enumerate() {
        let data = Fragment {
            payload_kind: kind,
            correlation_id: correlation_id.to_string(),
            sequence_index: index as u32,
            value: Some(chunk.to_vec()),
        };
        let marker = Fragment { value: None, ..data.clone() };
        fragments.push(data);
        fragments.push(marker);
    }
    fragments
}
