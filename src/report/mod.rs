//! Run output assembly.
//!
//! The `AnalysisReport` carries the four canonical tables plus per-switch
//! summaries; the `DiscrepancyReport` collects everything an operator
//! should look at by hand: undecoded descriptors, absent mandatory
//! sections, skipped switches, and pairing asymmetries. Discrepancies are
//! data-quality findings, never run failures.

use log::{info, warn};

use crate::aggregate::SwitchSummary;
use crate::models::{ConnectedDeviceRow, IslLinkRow, PortRow, SwitchPairRow};
use crate::pairing::PairingAudit;

/// One undecoded descriptor pair, with its dump of origin.
#[derive(Debug, Clone)]
pub struct UndecodedEntry {
    /// Dump the descriptors came from.
    pub config_id: String,
    /// Device port WWN.
    pub port_wwn: String,
    /// Raw port symbolic string.
    pub port_symb: String,
    /// Raw node symbolic string.
    pub node_symb: String,
}

/// A mandatory section absent from one dump.
#[derive(Debug, Clone)]
pub struct MissingSection {
    /// Dump the section was absent from.
    pub config_id: String,
    /// Section name.
    pub section: &'static str,
}

/// A switch that was kept out of the fabric model.
#[derive(Debug, Clone)]
pub struct SkippedSwitch {
    /// Identifier of the skipped dump.
    pub config_id: String,
    /// Why it was skipped.
    pub reason: String,
}

/// Everything flagged for manual review during one run.
#[derive(Debug, Default)]
pub struct DiscrepancyReport {
    /// Descriptor pairs no recognizer matched.
    pub undecoded_descriptors: Vec<UndecodedEntry>,
    /// Absent mandatory sections per dump.
    pub missing_sections: Vec<MissingSection>,
    /// Switches skipped with their reasons.
    pub skipped_switches: Vec<SkippedSwitch>,
    /// Per-fabric pairing symmetry audits.
    pub pairing_audits: Vec<PairingAudit>,
}

impl DiscrepancyReport {
    /// True when nothing needs operator attention.
    pub fn is_clean(&self) -> bool {
        self.undecoded_descriptors.is_empty()
            && self.missing_sections.is_empty()
            && self.skipped_switches.is_empty()
            && self
                .pairing_audits
                .iter()
                .all(|a| a.asymmetries.is_empty())
    }

    /// Logs the discrepancy summary at end of run.
    pub fn log_summary(&self) {
        if self.is_clean() {
            info!("No discrepancies found");
            return;
        }
        if !self.skipped_switches.is_empty() {
            warn!("Skipped switches ({}):", self.skipped_switches.len());
            for skipped in &self.skipped_switches {
                warn!("  {}: {}", skipped.config_id, skipped.reason);
            }
        }
        if !self.missing_sections.is_empty() {
            warn!(
                "Absent mandatory sections ({}):",
                self.missing_sections.len()
            );
            for missing in &self.missing_sections {
                warn!("  {}: {}", missing.config_id, missing.section);
            }
        }
        if !self.undecoded_descriptors.is_empty() {
            warn!(
                "Undecoded symbolic descriptors ({}):",
                self.undecoded_descriptors.len()
            );
            for entry in &self.undecoded_descriptors {
                warn!(
                    "  {} {}: port='{}' node='{}'",
                    entry.config_id, entry.port_wwn, entry.port_symb, entry.node_symb
                );
            }
        }
        for audit in &self.pairing_audits {
            info!(
                "Pairing symmetry for {}: {} ok, {} absent, {} duplicated",
                audit.fabric_name, audit.ok, audit.absent, audit.duplicated
            );
            for asymmetry in &audit.asymmetries {
                warn!("  {}", asymmetry);
            }
        }
    }
}

/// The complete output of one run.
#[derive(Debug, Default)]
pub struct AnalysisReport {
    /// Canonical port table across all fabrics.
    pub ports: Vec<PortRow>,
    /// Canonical connected-device table.
    pub devices: Vec<ConnectedDeviceRow>,
    /// Canonical ISL table.
    pub links: Vec<IslLinkRow>,
    /// Canonical switch-pair table.
    pub pairs: Vec<SwitchPairRow>,
    /// Per-switch summaries.
    pub summaries: Vec<SwitchSummary>,
    /// Findings for manual review.
    pub discrepancies: DiscrepancyReport,
    /// Switches that contributed to the model.
    pub switches_parsed: usize,
    /// Switches skipped.
    pub switches_skipped: usize,
    /// Distinct fabric names processed.
    pub fabric_count: usize,
}

impl AnalysisReport {
    /// Logs the one-line run summary.
    pub fn log_summary(&self) {
        info!(
            "Analyzed {} fabrics: {} switches ({} skipped), {} ports, {} devices, {} ISLs, {} pairs",
            self.fabric_count,
            self.switches_parsed,
            self.switches_skipped,
            self.ports.len(),
            self.devices.len(),
            self.links.len(),
            self.pairs
                .iter()
                .filter(|p| p.partner_wwn.is_some())
                .count(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_clean() {
        let report = DiscrepancyReport::default();
        assert!(report.is_clean());
    }

    #[test]
    fn test_report_with_findings_is_not_clean() {
        let mut report = DiscrepancyReport::default();
        report.skipped_switches.push(SkippedSwitch {
            config_id: "dump01".into(),
            reason: "Dump file unreadable".into(),
        });
        assert!(!report.is_clean());
    }

    #[test]
    fn test_audit_without_asymmetries_stays_clean() {
        let mut report = DiscrepancyReport::default();
        report.pairing_audits.push(PairingAudit {
            fabric_name: "PROD".into(),
            ok: 4,
            ..Default::default()
        });
        assert!(report.is_clean());
    }
}
