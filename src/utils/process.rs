//! Per-switch processing.
//!
//! One parse task handles exactly one manifest entry: read the dump, scan
//! it, decode the name-server symbolic descriptors, and report back. A
//! failure here is isolated to the one switch; the caller records it and
//! keeps processing siblings.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};

use crate::config::PARSE_TIMEOUT;
use crate::decode::{decode_descriptor, is_decode_miss, DescriptorDecodeResult};
use crate::error_handling::{ErrorType, ProcessingStats, WarningType};
use crate::inputs::{read_dump, ManifestEntry};
use crate::models::FabricKey;
use crate::parser::descriptor::SECTION_NSSHOW;
use crate::parser::{parse_dump, ParsedDump};

/// One descriptor pair that matched no recognizer, kept for the
/// discrepancy report.
#[derive(Debug, Clone)]
pub struct UndecodedDescriptor {
    /// Device port WWN the descriptors belong to.
    pub port_wwn: String,
    /// Raw port symbolic string.
    pub port_symb: String,
    /// Raw node symbolic string.
    pub node_symb: String,
}

/// A fully parsed and decoded switch, ready for aggregation.
#[derive(Debug)]
pub struct ParsedSwitch {
    /// Fabric the switch belongs to.
    pub fabric: FabricKey,
    /// Parsed dump with stamped records.
    pub dump: ParsedDump,
    /// Decode results keyed by lowercase device port WWN.
    pub decodes: HashMap<String, DescriptorDecodeResult>,
    /// Descriptor pairs that matched no recognizer.
    pub undecoded: Vec<UndecodedDescriptor>,
}

/// Outcome of one per-switch parse task.
#[derive(Debug)]
pub enum SwitchOutcome {
    /// The switch contributes to the fabric model.
    Parsed(Box<ParsedSwitch>),
    /// The switch was skipped; the reason is already counted in the stats.
    Skipped {
        /// Identifier of the skipped dump.
        config_id: String,
        /// What kept it out of the model.
        reason: ErrorType,
    },
}

/// Processes one manifest entry end to end.
pub async fn process_dump(entry: ManifestEntry, stats: Arc<ProcessingStats>) -> SwitchOutcome {
    let config_id = entry.config_id();

    let raw = match read_dump(&entry).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Skipping {}: {}", config_id, e);
            stats.increment_error(ErrorType::DumpUnreadable);
            return SwitchOutcome::Skipped {
                config_id,
                reason: ErrorType::DumpUnreadable,
            };
        }
    };

    // Parsing is CPU-bound; the timeout fences off pathological dumps
    let target = entry.target;
    let parse_task = tokio::task::spawn_blocking(move || parse_dump(&raw, target));
    let parsed = match tokio::time::timeout(PARSE_TIMEOUT, parse_task).await {
        Ok(Ok(parsed)) => parsed,
        Ok(Err(join_error)) => {
            warn!("Skipping {}: parse task failed: {}", config_id, join_error);
            stats.increment_error(ErrorType::DumpUnparseable);
            return SwitchOutcome::Skipped {
                config_id,
                reason: ErrorType::DumpUnparseable,
            };
        }
        Err(_) => {
            warn!("Skipping {}: parse exceeded {:?}", config_id, PARSE_TIMEOUT);
            stats.increment_error(ErrorType::ParseTimeout);
            return SwitchOutcome::Skipped {
                config_id,
                reason: ErrorType::ParseTimeout,
            };
        }
    };

    if parsed.identity_unresolved() {
        warn!("Skipping {}: no usable switchshow output", config_id);
        stats.increment_error(ErrorType::DumpUnparseable);
        return SwitchOutcome::Skipped {
            config_id,
            reason: ErrorType::DumpUnparseable,
        };
    }

    for section in &parsed.missing_sections {
        warn!("{}: mandatory section '{}' absent", config_id, section);
        stats.increment_warning(WarningType::MissingMandatorySection);
    }
    if parsed.skipped_lines > 0 {
        debug!("{}: skipped {} unmatched lines", config_id, parsed.skipped_lines);
    }

    let switch = decode_switch(entry.fabric, parsed, &stats);
    debug!(
        "{}: parsed switch '{}' ({} undecoded descriptors)",
        config_id,
        switch.dump.identity.switch_name,
        switch.undecoded.len()
    );
    SwitchOutcome::Parsed(Box::new(switch))
}

/// Decodes every name-server symbolic descriptor pair of a parsed dump.
///
/// Misses (non-empty inputs that matched no recognizer) are kept verbatim
/// for the discrepancy report and counted as warnings.
pub fn decode_switch(
    fabric: FabricKey,
    dump: ParsedDump,
    stats: &ProcessingStats,
) -> ParsedSwitch {
    let mut decodes = HashMap::new();
    let mut undecoded = Vec::new();

    for record in &dump.section(SECTION_NSSHOW).records {
        let port_wwn = match record.get_first("port_wwn") {
            Some(wwn) => wwn.to_string(),
            None => continue,
        };
        let port_symb = record.get_first("port_symb").unwrap_or_default();
        let node_symb = record.get_first("node_symb").unwrap_or_default();
        let result = decode_descriptor(port_symb, node_symb);
        if is_decode_miss(port_symb, node_symb, &result) {
            undecoded.push(UndecodedDescriptor {
                port_wwn: port_wwn.clone(),
                port_symb: port_symb.to_string(),
                node_symb: node_symb.to_string(),
            });
        }
        decodes.insert(port_wwn.to_ascii_lowercase(), result);
    }

    stats.add_warnings(WarningType::UndecodedDescriptor, undecoded.len());

    ParsedSwitch {
        fabric,
        dump,
        decodes,
        undecoded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::LogicalSwitchTarget;
    use std::path::PathBuf;

    fn entry(path: PathBuf) -> ManifestEntry {
        ManifestEntry {
            fabric: FabricKey {
                fabric_name: "PROD".into(),
                fabric_label: "A".into(),
            },
            path,
            target: LogicalSwitchTarget::Any,
        }
    }

    fn write_dump(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sw_a1.txt");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    const GOOD_DUMP: &str = r#"
** SS CMD START ** switchshow
switchName: SW_PROD_A1
switchWwn: 10:00:00:05:1e:01:02:03
** SS CMD END **
** SS CMD START ** nsshow
 N    010000;      3;10:00:00:10:9b:aa:bb:cc;20:00:00:10:9b:aa:bb:cc; na
    NodeSymb: [15] "ACME X1 SN:S123"
 N    010100;      3;10:00:00:10:9b:aa:bb:cd;20:00:00:10:9b:aa:bb:cd; na
    NodeSymb: [14] "mystery device"
** SS CMD END **
"#;

    #[tokio::test]
    async fn test_process_dump_success() {
        let (_dir, path) = write_dump(GOOD_DUMP);
        let stats = Arc::new(ProcessingStats::new());
        match process_dump(entry(path), Arc::clone(&stats)).await {
            SwitchOutcome::Parsed(switch) => {
                assert_eq!(switch.dump.identity.switch_name, "SW_PROD_A1");
                assert_eq!(switch.decodes.len(), 2);
                assert_eq!(switch.undecoded.len(), 1);
                assert_eq!(switch.undecoded[0].node_symb, "mystery device");
            }
            other => panic!("expected Parsed, got {:?}", other),
        }
        assert_eq!(
            stats.get_warning_count(WarningType::UndecodedDescriptor),
            1
        );
        assert_eq!(stats.total_errors(), 0);
    }

    #[tokio::test]
    async fn test_process_dump_unreadable_file() {
        let stats = Arc::new(ProcessingStats::new());
        let outcome = process_dump(
            entry(PathBuf::from("/nonexistent/sw.txt")),
            Arc::clone(&stats),
        )
        .await;
        assert!(matches!(
            outcome,
            SwitchOutcome::Skipped {
                reason: ErrorType::DumpUnreadable,
                ..
            }
        ));
        assert_eq!(stats.get_error_count(ErrorType::DumpUnreadable), 1);
    }

    #[tokio::test]
    async fn test_process_dump_no_identity() {
        let (_dir, path) = write_dump("just some noise\n");
        let stats = Arc::new(ProcessingStats::new());
        let outcome = process_dump(entry(path), Arc::clone(&stats)).await;
        assert!(matches!(
            outcome,
            SwitchOutcome::Skipped {
                reason: ErrorType::DumpUnparseable,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_process_dump_counts_missing_mandatory_sections() {
        let (_dir, path) = write_dump(
            "** SS CMD START ** switchshow\n\
             switchName: SW_X\n\
             switchWwn: 10:00:00:05:1e:01:02:99\n\
             ** SS CMD END **\n",
        );
        let stats = Arc::new(ProcessingStats::new());
        let outcome = process_dump(entry(path), Arc::clone(&stats)).await;
        assert!(matches!(outcome, SwitchOutcome::Parsed(_)));
        assert_eq!(
            stats.get_warning_count(WarningType::MissingMandatorySection),
            1
        );
    }
}
