//! Message grouping and reassembly.
//!
//! Scans the data entries of a carrier, keeps the ones that are protocol
//! fragments, buckets them by correlation id and rebuilds each message.
//! A broken bucket is reported on its own and never affects its siblings;
//! only a carrier without a single protocol entry fails as a whole.

use std::collections::{BTreeMap, HashMap};

use super::{Fragment, FragmentKey, PayloadKind};
use crate::errors::FragmentError;
use crate::ledger::DataEntry;
use crate::{Result, SignRequestError};

/// A reassembled message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Namespace tag the fragments were written under.
    pub version: String,
    /// Declared payload kind.
    pub payload_kind: PayloadKind,
    /// Correlation id shared by the fragments.
    pub correlation_id: String,
    /// Concatenated fragment payloads.
    pub body: Vec<u8>,
    /// Data fragments in index order.
    pub parts: Vec<Fragment>,
    /// Validated home domain of the sender, once known.
    pub sender: Option<String>,
}

/// Reassembly result for one correlation id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupOutcome {
    /// Correlation id of the bucket.
    pub correlation_id: String,
    /// The message, or why the bucket was rejected.
    pub result: std::result::Result<Message, FragmentError>,
}

struct Bucket<'a> {
    version: &'a str,
    kind: PayloadKind,
    members: Vec<(FragmentKey<'a>, Option<&'a [u8]>)>,
}

/// Group `entries` into per-message outcomes, in order of first appearance.
///
/// Only entries carrying a value open a bucket. End markers join the bucket
/// of their correlation id when one exists and are ignored otherwise, so a
/// marker closing a stale slot never turns into a message of its own.
///
/// Fails with [`SignRequestError::NoProtocolEntries`] when no entry name is
/// a protocol fragment key.
pub fn group_entries(entries: &[DataEntry]) -> Result<Vec<GroupOutcome>> {
    let mut order: Vec<&str> = Vec::new();
    let mut buckets: HashMap<&str, Bucket<'_>> = HashMap::new();
    let mut markers: Vec<FragmentKey<'_>> = Vec::new();

    for entry in entries {
        let Some(key) = FragmentKey::parse(&entry.name) else {
            continue;
        };
        let Some(value) = entry.value.as_deref() else {
            markers.push(key);
            continue;
        };
        let bucket = buckets.entry(key.correlation_id).or_insert_with(|| {
            order.push(key.correlation_id);
            Bucket {
                version: key.namespace,
                kind: key.payload_kind,
                members: Vec::new(),
            }
        });
        bucket.members.push((key, Some(value)));
    }

    if order.is_empty() && markers.is_empty() {
        return Err(SignRequestError::NoProtocolEntries);
    }

    for key in markers {
        if let Some(bucket) = buckets.get_mut(key.correlation_id) {
            bucket.members.push((key, None));
        }
    }

    Ok(order
        .into_iter()
        .filter_map(|id| buckets.remove(id).map(|bucket| (id, bucket)))
        .map(|(id, bucket)| GroupOutcome {
            correlation_id: id.to_string(),
            result: assemble(id, bucket),
        })
        .collect())
}

/// Reassemble every valid message in `entries`, dropping broken buckets.
pub fn reassemble(entries: &[DataEntry]) -> Result<Vec<Message>> {
    let outcomes = group_entries(entries)?;
    Ok(outcomes
        .into_iter()
        .filter_map(|outcome| match outcome.result {
            Ok(message) => Some(message),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    correlation_id = %outcome.correlation_id,
                    "dropping fragment group: {_err}"
                );
                None
            }
        })
        .collect())
}

fn assemble(
    correlation_id: &str,
    bucket: Bucket<'_>,
) -> std::result::Result<Message, FragmentError> {
    let mut data: BTreeMap<u32, &[u8]> = BTreeMap::new();
    let mut highest_seen = 0u32;

    for (key, value) in &bucket.members {
        if key.payload_kind != bucket.kind {
            return Err(FragmentError::InconsistentKind {
                first: bucket.kind,
                second: key.payload_kind,
            });
        }
        let index = parse_index(key.sequence_index)?;
        highest_seen = highest_seen.max(index);

        // Markers and the empty-payload value only close an index.
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            continue;
        };
        match data.get(&index) {
            Some(existing) if *existing != value => {
                return Err(FragmentError::ConflictingFragment { index });
            }
            Some(_) => {}
            None => {
                data.insert(index, value);
            }
        }
    }

    // BTreeMap iterates numerically, so "10" follows "9".
    for (expected, index) in data.keys().enumerate() {
        if *index != expected as u32 {
            return Err(FragmentError::IncompleteMessage {
                missing_index: expected as u32,
            });
        }
    }
    let count = data.len() as u32;
    let is_empty_message = count == 0 && highest_seen == 0;
    if highest_seen >= count && !is_empty_message {
        return Err(FragmentError::IncompleteMessage {
            missing_index: count,
        });
    }

    let mut body = Vec::with_capacity(data.values().map(|chunk| chunk.len()).sum());
    let mut parts = Vec::with_capacity(data.len());
    for (index, chunk) in data {
        body.extend_from_slice(chunk);
        parts.push(Fragment {
            payload_kind: bucket.kind,
            correlation_id: correlation_id.to_string(),
            sequence_index: index,
            value: Some(chunk.to_vec()),
        });
    }

    Ok(Message {
        version: bucket.version.to_string(),
        payload_kind: bucket.kind,
        correlation_id: correlation_id.to_string(),
        body,
        parts,
        sender: None,
    })
}

fn parse_index(raw: &str) -> std::result::Result<u32, FragmentError> {
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FragmentError::InvalidSequenceIndex(raw.to_string()));
    }
    raw.parse()
        .map_err(|_| FragmentError::InvalidSequenceIndex(raw.to_string()))
}
