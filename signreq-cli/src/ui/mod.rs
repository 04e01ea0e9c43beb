//! Terminal rendering for carriers, fragment groups and receipts

use std::fmt::Display;
use std::time::Duration;

use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use signreq_lib::codec::Fragment;
use signreq_lib::ledger::{Receipt, TransactionEnvelope};
use signreq_lib::RejectedGroup;

/// Tone of a one-line notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Success,
    Info,
    Warning,
    Failure,
}

/// Print a notice; failures go to stderr.
pub fn notice(tone: Tone, message: &str) {
    let badge = match tone {
        Tone::Success => "✓".green().bold(),
        Tone::Info => "ℹ".blue().bold(),
        Tone::Warning => "⚠".yellow().bold(),
        Tone::Failure => "✗".red().bold(),
    };
    if tone == Tone::Failure {
        eprintln!("{} {}", badge, message);
    } else {
        println!("{} {}", badge, message);
    }
}

/// Section title.
pub fn header(text: &str) {
    println!("\n{}", text.bold().underline());
}

/// Aligned `label: value` line.
pub fn field(label: &str, value: impl Display) {
    println!("  {:<11} {}", format!("{}:", label).cyan(), value);
}

/// Spinner shown while waiting on a collaborator.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Summary of a carrier transaction.
pub fn carrier(envelope: &TransactionEnvelope, verbose: bool) {
    let tx = &envelope.tx;
    field("Source", tx.source.as_str());
    field("Sequence", tx.sequence);
    field("Operations", tx.operations.len());
    field("Data", tx.data_entries().len());
    field("Signatures", envelope.signatures.len());
    if verbose {
        field("Fee", tx.fee);
        field("Memo", format!("{:?}", tx.memo));
    }
}

/// How a fragment group fared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupStatus {
    /// Reassembled and deserialized.
    Decoded,
    /// Reassembled, but the body is not a payload of its kind.
    Undecodable,
    /// Structurally broken.
    Rejected,
}

impl GroupStatus {
    /// Machine-readable label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Decoded => "ok",
            Self::Undecodable => "undecodable",
            Self::Rejected => "rejected",
        }
    }

    fn badge(self) -> ColoredString {
        match self {
            Self::Decoded => self.as_str().green().bold(),
            Self::Undecodable => self.as_str().yellow().bold(),
            Self::Rejected => self.as_str().red().bold(),
        }
    }
}

/// One row of the group table: status, correlation id, detail.
pub fn group_row(status: GroupStatus, correlation_id: &str, detail: &str) -> String {
    format!("  {:<12} {:<38} {}", status.badge(), correlation_id, detail)
}

/// Table of fragment groups, one row per correlation id.
pub fn group_table(rows: &[(GroupStatus, String, String)]) {
    println!(
        "  {:<12} {:<38} {}",
        "STATUS".dimmed(),
        "CORRELATION ID".dimmed(),
        "DETAIL".dimmed()
    );
    for (status, id, detail) in rows {
        println!("{}", group_row(*status, id, detail));
    }
}

/// A group dropped during decoding, with its error code.
pub fn rejected_group(group: &RejectedGroup) -> String {
    let code = group.to_error().code();
    format!("[{} {:?}] {}", code as i32, code, group.error)
}

/// Encoded fragments as a key / value-length listing, on stderr so stdout
/// stays machine-readable.
pub fn fragment_table(fragments: &[Fragment]) {
    for fragment in fragments {
        let value = match &fragment.value {
            Some(bytes) => format!("{} bytes", bytes.len()),
            None => "end marker".dimmed().to_string(),
        };
        eprintln!("  {:<48} {}", fragment.key().cyan(), value);
    }
}

/// Submission receipt.
pub fn receipt(receipt: &Receipt) {
    notice(Tone::Success, "Carrier submitted");
    field("Hash", &receipt.hash);
    field("Ledger", receipt.ledger);
}

/// Pretty-printed JSON on stdout.
pub fn json(value: &serde_json::Value) {
    if let Ok(pretty) = serde_json::to_string_pretty(value) {
        println!("{}", pretty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signreq_lib::FragmentError;

    #[test]
    fn test_group_row_layout() {
        colored::control::set_override(false);
        let row = group_row(GroupStatus::Rejected, "gap", "fragment 1 is missing");
        assert!(row.starts_with("  rejected"));
        assert!(row.contains("gap"));
        assert!(row.ends_with("fragment 1 is missing"));
    }

    #[test]
    fn test_rejected_group_names_code() {
        let group = RejectedGroup {
            correlation_id: "gap".into(),
            error: FragmentError::IncompleteMessage { missing_index: 2 },
        };
        assert_eq!(
            rejected_group(&group),
            "[1001 IncompleteMessage] fragment 2 is missing"
        );
    }
}
