//! Decode command - validate and decode a carrier against the network

use anyhow::{anyhow, Context, Result};
use signreq_lib::config::{ClientConfig, DecodeOptions};
use signreq_lib::ledger::TransactionEnvelope;
use signreq_lib::DecodeReport;

use super::{decode_hex, http_client, message_json};
use crate::ui::{self, GroupStatus, Tone};

#[tracing::instrument(skip(config, envelope_hex), fields(server = %config.server_url))]
pub async fn run(
    config: ClientConfig,
    envelope_hex: &str,
    skip_trust_validation: bool,
    verbose: bool,
) -> Result<()> {
    ui::header("Decode Signing Request");

    let bytes = decode_hex("envelope", envelope_hex)?;
    let envelope = TransactionEnvelope::from_bytes(&bytes)
        .map_err(|reason| anyhow!("Not a transaction envelope: {}", reason))?;

    ui::carrier(&envelope, verbose);
    if verbose {
        ui::field("Server", &config.server_url);
        ui::field("Network", &config.network);
    }
    let options = if skip_trust_validation {
        ui::notice(Tone::Warning, "Skipping domain trust validation");
        DecodeOptions::skip_trust_validation()
    } else {
        DecodeOptions::default()
    };

    let client = http_client(config)?;
    let spinner = ui::spinner("Loading source account and trust document...");
    let result = client.decode_envelope(&envelope, options).await;
    spinner.finish_and_clear();

    let report = result.context("Failed to decode carrier")?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &DecodeReport) {
    ui::field("Sender", report.sender.as_deref().unwrap_or("(none)"));
    ui::notice(
        Tone::Success,
        &format!("Decoded {} message(s)", report.messages.len()),
    );

    let mut rows: Vec<(GroupStatus, String, String)> = report
        .messages
        .iter()
        .map(|decoded| {
            let message = &decoded.message;
            (
                GroupStatus::Decoded,
                message.correlation_id.clone(),
                format!(
                    "{} {} bytes in {} fragment(s)",
                    message.payload_kind,
                    message.body.len(),
                    message.parts.len()
                ),
            )
        })
        .collect();
    rows.extend(report.rejected.iter().map(|group| {
        (
            GroupStatus::Rejected,
            group.correlation_id.clone(),
            ui::rejected_group(group),
        )
    }));
    ui::header("Fragment groups");
    ui::group_table(&rows);

    for decoded in &report.messages {
        ui::header(&format!("Payload {}", decoded.message.correlation_id));
        ui::json(&message_json(decoded));
    }
    if !report.rejected.is_empty() {
        ui::notice(
            Tone::Failure,
            &format!("{} group(s) rejected", report.rejected.len()),
        );
    }
}
