//! Test utilities for signing request flows.
//!
//! In-memory implementations of the collaborator traits plus fixtures for
//! building carriers by hand.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use signreq_lib::test_utils::{test_account, test_account_state, MockLedger, MockTrustResolver};
//!
//! let ledger = MockLedger::new();
//! ledger.insert(test_account_state(1, 100, "example.com"));
//! let trust = MockTrustResolver::new().with_signer("example.com", test_account(1).as_str());
//! ```

mod fixtures;
mod mock_network;

pub use fixtures::{
    carrier_entries, foreign_entries, fragments_with_id, sample_payload, test_account,
    test_account_state, test_keypair,
};

pub use mock_network::{MockAddressResolver, MockLedger, MockTrustResolver};
