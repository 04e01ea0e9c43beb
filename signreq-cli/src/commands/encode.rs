//! Encode command - split a payload into carrier data entries

use anyhow::{Context, Result};
use signreq_lib::codec::{encode_fragments, encode_fragments_with_id, Fragment, PayloadKind};

use super::decode_hex;
use crate::ui;

#[tracing::instrument(skip(payload_hex))]
pub fn run(
    kind: PayloadKind,
    payload_hex: &str,
    correlation_id: Option<&str>,
    verbose: bool,
) -> Result<()> {
    let payload = decode_hex("payload", payload_hex)?;
    let fragments = match correlation_id {
        Some(id) => encode_fragments_with_id(&payload, kind, id)
            .context("Invalid correlation id")?,
        None => encode_fragments(&payload, kind),
    };

    if verbose {
        eprintln!(
            "{} bytes -> {} entries",
            payload.len(),
            fragments.len()
        );
        ui::fragment_table(&fragments);
    }
    tracing::debug!(entries = fragments.len(), "encoded payload");

    ui::json(&fragments_json(&fragments));
    Ok(())
}

/// Entries as `{ "key", "value" }` objects with hex values.
pub fn fragments_json(fragments: &[Fragment]) -> serde_json::Value {
    fragments
        .iter()
        .map(|f| {
            serde_json::json!({
                "key": f.key(),
                "value": f.value.as_ref().map(hex::encode),
            })
        })
        .collect()
}
