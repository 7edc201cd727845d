//! Static run inputs.
//!
//! Everything the pipeline reads besides the dumps themselves: the bundle
//! manifest, the raw-dump supplier, and the optional enclosure inventory.
//! All are read-only and loaded once per run.

pub mod enclosure;
pub mod manifest;

pub use enclosure::{EnclosureInventory, EnclosureKind};
pub use manifest::{load_manifest, parse_manifest, Manifest, ManifestEntry};

use crate::parser::RawSwitchDump;

/// Reads one dump file into a `RawSwitchDump`.
///
/// An unreadable dump is a per-switch failure, not a run failure: the
/// caller skips the switch with a warning and continues.
pub async fn read_dump(entry: &ManifestEntry) -> std::io::Result<RawSwitchDump> {
    let text = tokio::fs::read_to_string(&entry.path).await?;
    Ok(RawSwitchDump {
        config_id: entry.config_id(),
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FabricKey;
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

    #[tokio::test]
    async fn test_read_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sw_a1.txt");
        std::fs::write(&path, "** SS CMD START ** switchshow\n").unwrap();
        let dump = read_dump(&entry(path)).await.unwrap();
        assert_eq!(dump.config_id, "sw_a1");
        assert!(dump.text.contains("switchshow"));
    }

    #[tokio::test]
    async fn test_read_dump_unreadable_is_io_error() {
        let result = read_dump(&entry(PathBuf::from("/nonexistent/sw.txt"))).await;
        assert!(result.is_err());
    }
}
