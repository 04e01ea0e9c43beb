//! Request command - build a carrier asking another account to sign a payload

use anyhow::{Context, Result};
use signreq_lib::codec::PayloadKind;
use signreq_lib::config::ClientConfig;
use signreq_lib::ledger::Keypair;
use signreq_lib::Address;

use super::{decode_hex, http_client};
use crate::ui::{self, Tone};

/// Arguments of the request command.
pub struct RequestArgs<'a> {
    pub secret_hex: &'a str,
    pub to: &'a str,
    pub kind: PayloadKind,
    pub payload_hex: &'a str,
    pub submit: bool,
}

#[tracing::instrument(skip(config, args), fields(to = args.to, kind = %args.kind))]
pub async fn run(config: ClientConfig, args: RequestArgs<'_>, verbose: bool) -> Result<()> {
    ui::header("Build Signing Request");

    let keypair = Keypair::from_secret_hex(args.secret_hex).context("Invalid secret key")?;
    let destination: Address = args.to.parse().context("Invalid destination address")?;
    let payload = decode_hex("payload", args.payload_hex)?;

    if verbose {
        ui::field("Signer", keypair.public_key().as_str());
        ui::field("Destination", &destination);
        ui::field("Payload", format!("{} bytes ({})", payload.len(), args.kind));
    }

    let client = http_client(config)?;
    let spinner = ui::spinner("Resolving destination and loading signer account...");
    let carrier = client
        .encode_request(&keypair, &destination, &payload, args.kind)
        .await;
    spinner.finish_and_clear();
    let carrier = carrier.context("Failed to build carrier")?;

    ui::notice(Tone::Success, "Carrier built");
    ui::carrier(&carrier, verbose);
    ui::field("Envelope", carrier.to_hex()?);

    if !args.submit {
        ui::notice(Tone::Info, "Not submitted; rerun with --submit to send it");
        return Ok(());
    }

    let spinner = ui::spinner("Submitting carrier...");
    let receipt = client.submit(&carrier).await;
    spinner.finish_and_clear();
    let receipt = receipt.context("Submission failed")?;

    ui::receipt(&receipt);
    Ok(())
}
