//! Section-scanning parser for switch diagnostic dumps.
//!
//! This module turns one raw dump (the captured text output of a switch's
//! diagnostic commands) into structured per-command record lists:
//! - Section descriptors with ordered line-pattern sets (`descriptor`)
//! - Flat string-field records with identity stamping (`record`)
//! - The single forward-pass scanner (`scanner`)
//!
//! Parsing is best-effort by construction: unmatched lines are skipped, an
//! absent section yields an empty record list with a flag, and only a dump
//! that cannot be read at all is an error (handled upstream).

pub mod descriptor;
pub mod record;
pub mod scanner;

pub use record::Record;
pub use scanner::{LogicalSwitchTarget, SectionData};

use descriptor::{SECTION_CHASSISSHOW, SECTION_DESCRIPTORS, SECTION_SWITCHSHOW};
use record::{FIELD_CHASSIS_NAME, FIELD_CHASSIS_WWN, FIELD_SWITCH_NAME, FIELD_SWITCH_WWN};
use scanner::scan;

use crate::models::SwitchIdentity;

/// One raw dump as supplied by the manifest: an opaque text blob plus the
/// identifier it will be reported under.
#[derive(Debug, Clone)]
pub struct RawSwitchDump {
    /// Identifier of the configuration file (typically the file stem).
    pub config_id: String,
    /// Full dump text.
    pub text: String,
}

/// Structured result of parsing one dump for one logical switch.
#[derive(Debug)]
pub struct ParsedDump {
    /// Resolved identity, stamped onto every record.
    pub identity: SwitchIdentity,
    /// Switch model number (integer part of `switchType`), when reported.
    pub switch_model: Option<u32>,
    /// Collected section data, keyed by section name.
    pub sections: std::collections::HashMap<&'static str, SectionData>,
    /// Mandatory sections that never appeared in the dump.
    pub missing_sections: Vec<&'static str>,
    /// Lines inside collected sections that matched no pattern.
    pub skipped_lines: usize,
}

impl ParsedDump {
    /// Collected data for a section (every registered section has an entry).
    pub fn section(&self, name: &str) -> &SectionData {
        static EMPTY: once_cell::sync::Lazy<SectionData> =
            once_cell::sync::Lazy::new(SectionData::default);
        self.sections.get(name).unwrap_or(&EMPTY)
    }

    /// True when the switch identity could not be established at all.
    ///
    /// A dump with no usable `switchshow` header has neither a name nor a
    /// WWN; downstream joins would all be empty, so the caller skips the
    /// switch with a warning instead.
    pub fn identity_unresolved(&self) -> bool {
        self.identity.switch_wwn.is_empty() && self.identity.switch_name.is_empty()
    }
}

/// Parses one dump: scans the text, resolves the switch identity from the
/// identity sections, and stamps that identity onto every collected record.
pub fn parse_dump(dump: &RawSwitchDump, target: LogicalSwitchTarget) -> ParsedDump {
    let outcome = scan(&dump.text, target);

    let switch_header = &outcome.section(SECTION_SWITCHSHOW).header;
    let chassis_header = &outcome.section(SECTION_CHASSISSHOW).header;

    let switch_index = match target {
        LogicalSwitchTarget::Index(i) if outcome.context_seen => i,
        _ => 0,
    };

    let identity = SwitchIdentity {
        config_id: dump.config_id.clone(),
        chassis_name: chassis_header
            .get(FIELD_CHASSIS_NAME)
            .unwrap_or_default()
            .to_string(),
        chassis_wwn: chassis_header
            .get(FIELD_CHASSIS_WWN)
            .unwrap_or_default()
            .to_string(),
        switch_index,
        switch_name: switch_header
            .get(FIELD_SWITCH_NAME)
            .unwrap_or_default()
            .to_string(),
        switch_wwn: switch_header
            .get(FIELD_SWITCH_WWN)
            .unwrap_or_default()
            .to_string(),
    };
    let switch_model = switch_header.get_u32("switch_model");

    let mut sections = outcome.sections;
    for data in sections.values_mut() {
        data.header.stamp_identity(&identity);
        for record in &mut data.records {
            record.stamp_identity(&identity);
        }
    }

    let missing_sections: Vec<&'static str> = SECTION_DESCRIPTORS
        .iter()
        .filter(|d| d.mandatory)
        .filter(|d| !sections.get(d.name).map(|s| s.present).unwrap_or(false))
        .map(|d| d.name)
        .collect();

    ParsedDump {
        identity,
        switch_model,
        sections,
        missing_sections,
        skipped_lines: outcome.skipped_lines,
    }
}
