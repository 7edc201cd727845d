//! Bundle manifest parsing.
//!
//! The collection step (run against the live fabric, outside this tool)
//! delivers a manifest: one line per switch dump, comma-separated:
//!
//! ```text
//! fabric_name,fabric_label,path[,switch_index]
//! ```
//!
//! Blank lines and `#` comments are ignored. The optional trailing field
//! selects one logical switch of a virtual-fabric dump; without it the dump
//! is parsed whole.

use std::path::{Path, PathBuf};

use log::warn;

use crate::error_handling::InitializationError;
use crate::models::FabricKey;
use crate::parser::LogicalSwitchTarget;

/// One manifest entry: a dump file to parse under a fabric key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Fabric the dump belongs to.
    pub fabric: FabricKey,
    /// Path of the dump file.
    pub path: PathBuf,
    /// Logical switch to collect from a virtual-fabric dump.
    pub target: LogicalSwitchTarget,
}

impl ManifestEntry {
    /// Identifier the dump is reported under (the file stem).
    pub fn config_id(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

/// Result of parsing a manifest: the valid entries plus the count of
/// malformed lines that were skipped.
#[derive(Debug)]
pub struct Manifest {
    /// Valid entries, in file order.
    pub entries: Vec<ManifestEntry>,
    /// Malformed lines skipped with a warning.
    pub invalid_lines: usize,
}

/// Reads and parses the bundle manifest.
///
/// An unreadable manifest is a fatal configuration error; malformed lines
/// inside a readable manifest are skipped with a warning and counted.
pub async fn load_manifest(path: &Path) -> Result<Manifest, InitializationError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| InitializationError::ManifestError(format!("{}: {}", path.display(), e)))?;
    Ok(parse_manifest(&text))
}

/// Parses manifest text. Separated from I/O for testability.
pub fn parse_manifest(text: &str) -> Manifest {
    let mut entries = Vec::new();
    let mut invalid_lines = 0;

    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_line(line) {
            Some(entry) => entries.push(entry),
            None => {
                warn!("Skipping invalid manifest line {}: {}", lineno + 1, line);
                invalid_lines += 1;
            }
        }
    }

    Manifest {
        entries,
        invalid_lines,
    }
}

fn parse_line(line: &str) -> Option<ManifestEntry> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 3 || fields.len() > 4 {
        return None;
    }
    let (fabric_name, fabric_label, path) = (fields[0], fields[1], fields[2]);
    if fabric_name.is_empty() || fabric_label.is_empty() || path.is_empty() {
        return None;
    }
    let target = match fields.get(3) {
        Some(raw) => LogicalSwitchTarget::Index(raw.parse().ok()?),
        None => LogicalSwitchTarget::Any,
    };
    Some(ManifestEntry {
        fabric: FabricKey {
            fabric_name: fabric_name.to_string(),
            fabric_label: fabric_label.to_string(),
        },
        path: PathBuf::from(path),
        target,
    })
}
