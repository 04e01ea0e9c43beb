//! Test fixtures and data generators.

use crate::codec::{encode_fragments_with_id, Fragment, PayloadKind};
use crate::ledger::{AccountId, AccountState, DataEntry, Keypair};

/// Deterministic keypair derived from a small seed byte.
pub fn test_keypair(seed: u8) -> Keypair {
    Keypair::from_seed([seed; 32])
}

/// Account id of [`test_keypair`].
pub fn test_account(seed: u8) -> AccountId {
    test_keypair(seed).public_key()
}

/// Ledger state for [`test_account`] with a home domain.
pub fn test_account_state(seed: u8, sequence: i64, home_domain: &str) -> AccountState {
    AccountState::new(test_account(seed), sequence).with_home_domain(home_domain)
}

/// Fragments for `payload` under a fixed correlation id.
///
/// Panics if `correlation_id` is not a usable key component.
pub fn fragments_with_id(payload: &[u8], kind: PayloadKind, correlation_id: &str) -> Vec<Fragment> {
    encode_fragments_with_id(payload, kind, correlation_id).expect("valid correlation id")
}

/// Data entries for `payload`, end markers included.
pub fn carrier_entries(payload: &[u8], kind: PayloadKind, correlation_id: &str) -> Vec<DataEntry> {
    fragments_with_id(payload, kind, correlation_id)
        .iter()
        .map(Fragment::to_entry)
        .collect()
}

/// Deterministic pseudo-random bytes.
pub fn sample_payload(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
        .collect()
}

/// Unrelated data entries a wallet might carry alongside a request.
pub fn foreign_entries() -> Vec<DataEntry> {
    vec![
        DataEntry::new("config.theme", Some(b"dark".to_vec())),
        DataEntry::new("srv1", Some(b"no separators".to_vec())),
        DataEntry::new("srv2:op:abc:0", Some(b"other version".to_vec())),
        DataEntry::new("srv1:op:abc", Some(b"three components".to_vec())),
        DataEntry::new("srv1:op:abc:0:extra", Some(b"five components".to_vec())),
        DataEntry::new("srv1:xx:abc:0", Some(b"unknown kind".to_vec())),
    ]
}
