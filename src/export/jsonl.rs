//! JSON-lines table export.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::report::AnalysisReport;

fn write_table<T: Serialize>(dir: &Path, name: &str, rows: &[T]) -> Result<()> {
    let path = dir.join(format!("{}.jsonl", name));
    let file = std::fs::File::create(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);
    for row in rows {
        serde_json::to_writer(&mut writer, row)
            .with_context(|| format!("writing {}", path.display()))?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the four canonical tables as one JSONL file each.
pub fn export_jsonl(report: &AnalysisReport, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    write_table(dir, "ports", &report.ports)?;
    write_table(dir, "connected_devices", &report.devices)?;
    write_table(dir, "isl_links", &report.links)?;
    write_table(dir, "switch_pairs", &report.pairs)?;
    Ok(())
}
