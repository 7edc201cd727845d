//! Single forward pass over a dump's text.
//!
//! The scanner walks the lines once, tracking the most recent logical-switch
//! context banner and the currently open section. Lines inside a section are
//! matched against the section's ordered pattern set; the first matching
//! pattern wins. Lines that match nothing are skipped silently (counted, not
//! reported per-line). The scanner never rewinds and never fails: a garbled
//! section simply produces fewer records.

use std::collections::HashMap;

use super::descriptor::{
    LinePattern, PatternKind, SectionDescriptor, CONTEXT_MARKER, GENERIC_BOUNDARY,
    SECTION_DESCRIPTORS,
};
use super::record::Record;

/// Which logical switch of a virtual-fabric dump to collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalSwitchTarget {
    /// Collect regardless of context banners (single-switch dumps, or the
    /// manifest did not specify an index).
    Any,
    /// Collect only sections emitted under this logical switch index.
    Index(u32),
}

/// Collected output of one command section.
#[derive(Debug, Clone, Default)]
pub struct SectionData {
    /// False when the section never appeared in the dump.
    pub present: bool,
    /// Section-level header fields (key:value lines above any table).
    pub header: Record,
    /// One record per logical entry.
    pub records: Vec<Record>,
}

/// Result of scanning one dump.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Section name → collected data. Every registered section has an entry;
    /// absent sections carry `present=false` and no records.
    pub sections: HashMap<&'static str, SectionData>,
    /// True when at least one context banner was seen anywhere in the dump.
    pub context_seen: bool,
    /// Lines inside a collected section that matched no pattern.
    pub skipped_lines: usize,
}

impl ScanOutcome {
    /// Collected data for a section (every registered section has an entry).
    pub fn section(&self, name: &str) -> &SectionData {
        static EMPTY: once_cell::sync::Lazy<SectionData> =
            once_cell::sync::Lazy::new(SectionData::default);
        self.sections.get(name).unwrap_or(&EMPTY)
    }
}

/// Scans the dump text in a single forward pass.
///
/// When the dump contains context banners and `target` names an index, only
/// sections emitted under that index are collected. Dumps without any
/// banner always match, so non-virtual-fabric dumps parse identically
/// whatever the target.
pub fn scan(text: &str, target: LogicalSwitchTarget) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();
    for descriptor in SECTION_DESCRIPTORS.iter() {
        outcome.sections.insert(descriptor.name, SectionData::default());
    }

    let mut current_context: Option<u32> = None;
    let mut open: Option<OpenSection> = None;

    for line in text.lines() {
        if let Some(caps) = CONTEXT_MARKER.captures(line) {
            outcome.context_seen = true;
            current_context = caps[1].parse().ok();
            // A new context banner implicitly terminates whatever was open
            close(&mut open, &mut outcome);
            continue;
        }

        if GENERIC_BOUNDARY.is_match(line) {
            close(&mut open, &mut outcome);
            continue;
        }

        if let Some(section) = open.as_mut() {
            if let Some(end) = &section.descriptor.end {
                if end.is_match(line) {
                    close(&mut open, &mut outcome);
                    continue;
                }
            }
            if !section.feed(line) {
                outcome.skipped_lines += 1;
            }
            continue;
        }

        // No section open: look for a start marker under a matching context.
        // A start marker is honored only while the section has not been
        // collected yet; a command re-run later in the dump (or the same
        // command under another logical-switch context) is not scanned again
        if context_matches(target, current_context, outcome.context_seen) {
            if let Some(descriptor) = SECTION_DESCRIPTORS.iter().find(|d| d.start.is_match(line)) {
                if !outcome.section(descriptor.name).present {
                    open = Some(OpenSection::new(descriptor));
                }
            }
        }
    }

    close(&mut open, &mut outcome);
    outcome
}

fn context_matches(
    target: LogicalSwitchTarget,
    current: Option<u32>,
    any_seen: bool,
) -> bool {
    match target {
        LogicalSwitchTarget::Any => true,
        LogicalSwitchTarget::Index(wanted) => {
            if !any_seen {
                return true;
            }
            current == Some(wanted)
        }
    }
}

struct OpenSection {
    descriptor: &'static SectionDescriptor,
    data: SectionData,
    current: Option<Record>,
}

impl OpenSection {
    fn new(descriptor: &'static SectionDescriptor) -> OpenSection {
        OpenSection {
            descriptor,
            data: SectionData {
                present: true,
                header: Record::new(),
                records: Vec::new(),
            },
            current: None,
        }
    }

    /// Applies the first matching pattern to the line. Returns false when no
    /// pattern matched.
    fn feed(&mut self, line: &str) -> bool {
        for pattern in &self.descriptor.patterns {
            let caps = match pattern.regex.captures(line) {
                Some(caps) => caps,
                None => continue,
            };
            match pattern.kind {
                PatternKind::Header => apply(&mut self.data.header, pattern, &caps),
                PatternKind::Start => {
                    if let Some(done) = self.current.take() {
                        self.data.records.push(done);
                    }
                    let mut record = Record::new();
                    apply(&mut record, pattern, &caps);
                    self.current = Some(record);
                }
                PatternKind::Continue => {
                    // Continuation before any start line goes to the header,
                    // so a truncated section still yields its fields
                    let record = self.current.get_or_insert_with(Record::new);
                    apply(record, pattern, &caps);
                }
            }
            return true;
        }
        false
    }

    fn finish(mut self) -> SectionData {
        if let Some(done) = self.current.take() {
            if !done.is_empty() {
                self.data.records.push(done);
            }
        }
        self.data
    }
}

fn apply(record: &mut Record, pattern: &LinePattern, caps: &regex::Captures<'_>) {
    for (i, field) in pattern.fields.iter().enumerate() {
        if field.is_empty() {
            continue;
        }
        if let Some(m) = caps.get(i + 1) {
            record.set(field, m.as_str());
        }
    }
    for (field, value) in pattern.consts {
        record.set(field, value);
    }
}

fn close(open: &mut Option<OpenSection>, outcome: &mut ScanOutcome) {
    if let Some(section) = open.take() {
        outcome
            .sections
            .insert(section.descriptor.name, section.finish());
    }
}
