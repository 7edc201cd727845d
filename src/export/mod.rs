//! Canonical table export.
//!
//! External report and diagram renderers consume the canonical tables as
//! flat files; every row carries its full fabric-scoping key so any report
//! can be re-derived by projection and filtering. No presentation
//! formatting happens here.

mod csv;
mod jsonl;

use std::path::Path;

use anyhow::Result;
use log::info;

use crate::config::ExportFormat;
use crate::report::AnalysisReport;

pub use self::csv::export_csv;
pub use self::jsonl::export_jsonl;

/// Exports the canonical tables in the configured format.
pub fn export_tables(report: &AnalysisReport, dir: &Path, format: &ExportFormat) -> Result<()> {
    match format {
        ExportFormat::Csv => export_csv(report, dir)?,
        ExportFormat::Jsonl => export_jsonl(report, dir)?,
    }
    info!("Exported canonical tables to {}", dir.display());
    Ok(())
}
