//! CSV table export.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::report::AnalysisReport;

fn write_table<T: Serialize>(dir: &Path, name: &str, rows: &[T]) -> Result<()> {
    let path = dir.join(format!("{}.csv", name));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the four canonical tables as one CSV file each.
pub fn export_csv(report: &AnalysisReport, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    write_table(dir, "ports", &report.ports)?;
    write_table(dir, "connected_devices", &report.devices)?;
    write_table(dir, "isl_links", &report.links)?;
    write_table(dir, "switch_pairs", &flatten_pairs(&report.pairs))?;
    Ok(())
}

/// Flat pair row for CSV: the candidate list collapses to a `;` join.
#[derive(Serialize)]
pub(super) struct FlatPairRow {
    pub(super) fabric_name: String,
    pub(super) fabric_label: String,
    pub(super) switch_name: String,
    pub(super) switch_wwn: String,
    pub(super) partner_wwn: Option<String>,
    pub(super) candidate_wwns: String,
    pub(super) pairing_type: Option<String>,
    pub(super) confidence: Option<f64>,
}

pub(super) fn flatten_pairs(pairs: &[crate::models::SwitchPairRow]) -> Vec<FlatPairRow> {
    pairs
        .iter()
        .map(|p| FlatPairRow {
            fabric_name: p.fabric_name.clone(),
            fabric_label: p.fabric_label.clone(),
            switch_name: p.switch_name.clone(),
            switch_wwn: p.switch_wwn.clone(),
            partner_wwn: p.partner_wwn.clone(),
            candidate_wwns: p.candidate_wwns.join(";"),
            pairing_type: p.pairing_type.map(|t| t.as_str().to_string()),
            confidence: p.confidence,
        })
        .collect()
}
