//! Inspect command - group a carrier's entries offline
//!
//! No network access and no trust check: this only shows what the carrier
//! contains.

use anyhow::{anyhow, Result};
use signreq_lib::codec::group_entries;
use signreq_lib::interpreter::{interpret, DecodedMessage};
use signreq_lib::ledger::{DataEntry, TransactionEnvelope};
use signreq_lib::SignRequestError;

use super::{decode_hex, message_json};
use crate::ui::{self, GroupStatus, Tone};

#[tracing::instrument(skip(envelope_hex))]
pub fn run(envelope_hex: &str, verbose: bool) -> Result<()> {
    let bytes = decode_hex("envelope", envelope_hex)?;
    let envelope = TransactionEnvelope::from_bytes(&bytes)
        .map_err(|reason| anyhow!("Not a transaction envelope: {}", reason))?;

    ui::header("Carrier");
    ui::carrier(&envelope, verbose);

    let groups = match inspect_entries(&envelope.tx.data_entries()) {
        Ok(groups) => groups,
        Err(SignRequestError::NoProtocolEntries) => {
            ui::notice(Tone::Warning, "No signing request entries on this carrier");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    ui::header(&format!("Fragment groups ({})", groups.len()));
    let rows: Vec<(GroupStatus, String, String)> = groups
        .iter()
        .map(|g| (g.status, g.correlation_id.clone(), g.detail.clone()))
        .collect();
    ui::group_table(&rows);

    for group in &groups {
        ui::header(&format!("Group {}", group.correlation_id));
        ui::json(&group.json);
    }
    Ok(())
}

/// What one correlation id on a carrier amounts to.
#[derive(Debug)]
pub struct InspectedGroup {
    pub correlation_id: String,
    pub status: GroupStatus,
    /// Short human-readable summary.
    pub detail: String,
    pub json: serde_json::Value,
}

/// Group and interpret entries, one result per correlation id.
///
/// Groups that reassemble but do not deserialize are reported rather than
/// aborting, so every group can be looked at.
pub fn inspect_entries(entries: &[DataEntry]) -> signreq_lib::Result<Vec<InspectedGroup>> {
    let outcomes = group_entries(entries)?;
    Ok(outcomes
        .into_iter()
        .map(|outcome| {
            let correlation_id = outcome.correlation_id;
            let (status, detail, mut json) = match outcome.result {
                Ok(message) => match interpret(&message) {
                    Ok(payload) => {
                        let detail = format!(
                            "{} {} bytes in {} fragment(s)",
                            message.payload_kind,
                            message.body.len(),
                            message.parts.len()
                        );
                        let json = message_json(&DecodedMessage { message, payload });
                        (GroupStatus::Decoded, detail, json)
                    }
                    Err(e) => (
                        GroupStatus::Undecodable,
                        e.to_string(),
                        serde_json::json!({ "correlation_id": correlation_id, "error": e.to_string() }),
                    ),
                },
                Err(e) => (
                    GroupStatus::Rejected,
                    e.to_string(),
                    serde_json::json!({ "correlation_id": correlation_id, "error": e.to_string() }),
                ),
            };
            json["status"] = status.as_str().into();
            InspectedGroup {
                correlation_id,
                status,
                detail,
                json,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use signreq_lib::codec::PayloadKind;
    use signreq_lib::ledger::Operation;
    use signreq_lib::test_utils::{carrier_entries, test_account};

    #[test]
    fn test_inspect_reports_every_group() {
        let op = Operation::native_payment(test_account(1), 5);
        let mut entries = carrier_entries(&op.to_bytes().unwrap(), PayloadKind::Operation, "good");
        entries.extend(carrier_entries(b"junk", PayloadKind::Operation, "junk"));
        entries.push(DataEntry::new("srv1:tx:gap:1", Some(vec![1])));

        let groups = inspect_entries(&entries).unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].status, GroupStatus::Decoded);
        assert_eq!(groups[0].json["status"], "ok");
        assert_eq!(groups[0].json["kind"], "op");
        assert_eq!(groups[1].status, GroupStatus::Undecodable);
        assert_eq!(groups[2].status, GroupStatus::Rejected);
        assert_eq!(groups[2].correlation_id, "gap");
        assert_eq!(groups[2].json["status"], "rejected");
        assert_eq!(groups[2].detail, "fragment 0 is missing");
    }

    #[test]
    fn test_inspect_without_protocol_entries() {
        let entries = vec![DataEntry::new("config.theme", Some(b"dark".to_vec()))];
        assert!(matches!(
            inspect_entries(&entries),
            Err(SignRequestError::NoProtocolEntries)
        ));
    }
}
