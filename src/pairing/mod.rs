//! Switch-pairing resolution.
//!
//! Switch dumps carry no explicit redundant-partner field, so the partner
//! of each switch is proposed by a multi-strategy resolver, tried in order
//! until one step succeeds:
//!
//! 1. device-overlap matching against same-(class, mode) candidates in the
//!    other fabric labels of the same fabric name;
//! 2. name-similarity matching (ties stay ambiguous, never broken
//!    arbitrarily);
//! 3. enclosure colocation, for switches with zero connected devices;
//! 4. a repair pass re-running name similarity among the remaining
//!    zero-device switches.
//!
//! After resolution a symmetry audit verifies A→B ⇒ B→A and flags
//! one-to-many pairings. Asymmetries are reported, never auto-corrected.

pub mod similarity;

use std::collections::{BTreeSet, HashMap};

use log::debug;

use crate::error_handling::{InfoType, ProcessingStats, WarningType};
use crate::models::{FabricKey, PairingType, SwitchClass, SwitchPairRow};

use similarity::name_similarity;

/// Per-switch evidence the resolver works from.
#[derive(Debug, Clone)]
pub struct PairingCandidate {
    /// Fabric key of the switch.
    pub fabric: FabricKey,
    /// Switch name.
    pub switch_name: String,
    /// Switch WWN.
    pub switch_wwn: String,
    /// Switch model number, when reported.
    pub switch_model: Option<u32>,
    /// Switch mode token (e.g. "Native", "Access Gateway").
    pub switch_mode: String,
    /// Names of connected devices, for overlap matching.
    pub device_labels: BTreeSet<String>,
    /// Enclosure the switch is embedded in, when known.
    pub enclosure: Option<String>,
}

impl PairingCandidate {
    fn class(&self) -> SwitchClass {
        SwitchClass::from_model(self.switch_model.unwrap_or(0))
    }

    /// Candidates must share hardware class and operating mode.
    fn comparable(&self, other: &PairingCandidate) -> bool {
        self.class() == other.class() && self.switch_mode == other.switch_mode
    }
}

/// Symmetry-audit counts for one fabric.
#[derive(Debug, Clone, Default)]
pub struct PairingAudit {
    /// Fabric name the audit covers.
    pub fabric_name: String,
    /// Pairings that are mutual (A→B and B→A).
    pub ok: usize,
    /// Pairings whose partner resolved to nothing or elsewhere.
    pub absent: usize,
    /// Partners claimed by more than one switch.
    pub duplicated: usize,
    /// Human-readable descriptions of each asymmetry.
    pub asymmetries: Vec<String>,
}

/// Pairing thresholds, taken from the CLI configuration.
#[derive(Debug, Clone, Copy)]
pub struct PairingThresholds {
    /// Minimum shared-device ratio for device-overlap matching.
    pub min_overlap_ratio: f64,
    /// Minimum normalized similarity for name matching.
    pub min_name_similarity: f64,
}

/// Resolves pairs for all switches of one fabric name and audits symmetry.
pub fn resolve_pairs(
    fabric_name: &str,
    candidates: &[PairingCandidate],
    thresholds: PairingThresholds,
    stats: &ProcessingStats,
) -> (Vec<SwitchPairRow>, PairingAudit) {
    let mut rows: Vec<SwitchPairRow> = candidates
        .iter()
        .map(|subject| resolve_one(subject, candidates, thresholds, stats))
        .collect();

    // Step 4: repair pass over the still-unresolved zero-device switches.
    // Shrinking the pool to zero-device peers can break a tie that left a
    // row ambiguous in step 2.
    for (i, subject) in candidates.iter().enumerate() {
        if rows[i].partner_wwn.is_some() {
            continue;
        }
        if !subject.device_labels.is_empty() {
            continue;
        }
        let pool: Vec<&PairingCandidate> = candidates
            .iter()
            .filter(|c| {
                c.switch_wwn != subject.switch_wwn
                    && c.fabric.fabric_label != subject.fabric.fabric_label
                    && c.device_labels.is_empty()
                    && subject.comparable(c)
            })
            .collect();
        if let Some(resolved) = by_name_similarity(subject, &pool, thresholds.min_name_similarity) {
            if resolved.partner_wwn.is_some() {
                debug!(
                    "Repair pass paired {} with {:?}",
                    subject.switch_name, resolved.partner_wwn
                );
                stats.increment_info(InfoType::RepairPassPairing);
                rows[i] = resolved;
            }
        }
    }

    for row in &rows {
        if row.partner_wwn.is_none() && row.candidate_wwns.is_empty() {
            stats.increment_warning(WarningType::UnpairedSwitch);
        }
    }

    let audit = audit_symmetry(fabric_name, &rows);
    (rows, audit)
}

fn resolve_one(
    subject: &PairingCandidate,
    all: &[PairingCandidate],
    thresholds: PairingThresholds,
    stats: &ProcessingStats,
) -> SwitchPairRow {
    let pool: Vec<&PairingCandidate> = all
        .iter()
        .filter(|c| {
            c.switch_wwn != subject.switch_wwn
                && c.fabric.fabric_label != subject.fabric.fabric_label
                && subject.comparable(c)
        })
        .collect();

    // Step 1: device overlap
    if !subject.device_labels.is_empty() && !pool.is_empty() {
        let overlaps: Vec<(usize, &PairingCandidate)> = pool
            .iter()
            .map(|c| {
                (
                    subject.device_labels.intersection(&c.device_labels).count(),
                    *c,
                )
            })
            .collect();
        let best = overlaps.iter().map(|(n, _)| *n).max().unwrap_or(0);
        let ratio = best as f64 / subject.device_labels.len() as f64;
        if best > 0 && ratio >= thresholds.min_overlap_ratio {
            let tied: Vec<&PairingCandidate> = overlaps
                .iter()
                .filter(|(n, _)| *n == best)
                .map(|(_, c)| *c)
                .collect();
            if tied.len() == 1 {
                return pair_row(subject, Some(tied[0]), &[], PairingType::DeviceOverlap, ratio);
            }
            // Tie: fall through to name similarity restricted to the tied set
            if let Some(row) =
                by_name_similarity(subject, &tied, thresholds.min_name_similarity)
            {
                return row;
            }
            let wwns: Vec<String> = tied.iter().map(|c| c.switch_wwn.clone()).collect();
            return pair_row(subject, None, &wwns, PairingType::DeviceOverlap, ratio);
        }
    }

    // Step 2: name similarity over the whole candidate pool
    if let Some(row) = by_name_similarity(subject, &pool, thresholds.min_name_similarity) {
        return row;
    }

    // Step 3: enclosure colocation, zero-device switches only
    if subject.device_labels.is_empty() {
        if let Some(enclosure) = &subject.enclosure {
            let colocated: Vec<&&PairingCandidate> = pool
                .iter()
                .filter(|c| c.device_labels.is_empty() && c.enclosure.as_ref() == Some(enclosure))
                .collect();
            match colocated.as_slice() {
                [single] => {
                    stats.increment_info(InfoType::ColocationPairing);
                    return pair_row(subject, Some(single), &[], PairingType::Colocation, 1.0);
                }
                [] => {}
                many => {
                    let wwns: Vec<String> =
                        many.iter().map(|c| c.switch_wwn.clone()).collect();
                    return pair_row(subject, None, &wwns, PairingType::Colocation, 1.0);
                }
            }
        }
    }

    pair_row_unresolved(subject)
}

/// Name-similarity step shared by steps 1 (tie-break), 2, and 4.
fn by_name_similarity(
    subject: &PairingCandidate,
    pool: &[&PairingCandidate],
    min_similarity: f64,
) -> Option<SwitchPairRow> {
    let scored: Vec<(f64, &PairingCandidate)> = pool
        .iter()
        .map(|c| (name_similarity(&subject.switch_name, &c.switch_name), *c))
        .collect();
    let best = scored
        .iter()
        .map(|(s, _)| *s)
        .fold(f64::NEG_INFINITY, f64::max);
    if best < min_similarity {
        return None;
    }
    let tied: Vec<&PairingCandidate> = scored
        .iter()
        .filter(|(s, _)| (*s - best).abs() < 1e-9)
        .map(|(_, c)| *c)
        .collect();
    match tied.as_slice() {
        [single] => Some(pair_row(
            subject,
            Some(single),
            &[],
            PairingType::NameSimilarity,
            best,
        )),
        many => {
            // Ambiguous: keep all tied candidates for manual resolution
            let wwns: Vec<String> = many.iter().map(|c| c.switch_wwn.clone()).collect();
            Some(pair_row(
                subject,
                None,
                &wwns,
                PairingType::NameSimilarity,
                best,
            ))
        }
    }
}

fn pair_row(
    subject: &PairingCandidate,
    partner: Option<&PairingCandidate>,
    candidate_wwns: &[String],
    pairing_type: PairingType,
    confidence: f64,
) -> SwitchPairRow {
    SwitchPairRow {
        fabric_name: subject.fabric.fabric_name.clone(),
        fabric_label: subject.fabric.fabric_label.clone(),
        switch_name: subject.switch_name.clone(),
        switch_wwn: subject.switch_wwn.clone(),
        partner_wwn: partner.map(|c| c.switch_wwn.clone()),
        candidate_wwns: candidate_wwns.to_vec(),
        pairing_type: Some(pairing_type),
        confidence: Some(confidence),
    }
}

fn pair_row_unresolved(subject: &PairingCandidate) -> SwitchPairRow {
    SwitchPairRow {
        fabric_name: subject.fabric.fabric_name.clone(),
        fabric_label: subject.fabric.fabric_label.clone(),
        switch_name: subject.switch_name.clone(),
        switch_wwn: subject.switch_wwn.clone(),
        partner_wwn: None,
        candidate_wwns: Vec::new(),
        pairing_type: None,
        confidence: None,
    }
}

/// Verifies A→B ⇒ B→A and flags partners claimed more than once. Reported,
/// never auto-corrected.
fn audit_symmetry(fabric_name: &str, rows: &[SwitchPairRow]) -> PairingAudit {
    let mut audit = PairingAudit {
        fabric_name: fabric_name.to_string(),
        ..Default::default()
    };

    let partner_of: HashMap<&str, &str> = rows
        .iter()
        .filter_map(|r| {
            r.partner_wwn
                .as_deref()
                .map(|p| (r.switch_wwn.as_str(), p))
        })
        .collect();

    let mut claims: HashMap<&str, usize> = HashMap::new();
    for partner in partner_of.values() {
        *claims.entry(partner).or_insert(0) += 1;
    }

    for row in rows {
        let partner = match row.partner_wwn.as_deref() {
            Some(p) => p,
            None => continue,
        };
        if claims.get(partner).copied().unwrap_or(0) > 1 {
            audit.duplicated += 1;
            audit.asymmetries.push(format!(
                "{}: partner {} is claimed by multiple switches",
                row.switch_name, partner
            ));
            continue;
        }
        match partner_of.get(partner) {
            Some(back) if *back == row.switch_wwn => audit.ok += 1,
            Some(back) => {
                audit.absent += 1;
                audit.asymmetries.push(format!(
                    "{}: partner {} points back to {} instead",
                    row.switch_name, partner, back
                ));
            }
            None => {
                audit.absent += 1;
                audit.asymmetries.push(format!(
                    "{}: partner {} resolved no pairing of its own",
                    row.switch_name, partner
                ));
            }
        }
    }

    audit
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> PairingThresholds {
        PairingThresholds {
            min_overlap_ratio: 0.5,
            min_name_similarity: 0.8,
        }
    }

    fn candidate(
        label: &str,
        name: &str,
        wwn: &str,
        devices: &[&str],
        enclosure: Option<&str>,
    ) -> PairingCandidate {
        PairingCandidate {
            fabric: FabricKey {
                fabric_name: "PROD".into(),
                fabric_label: label.into(),
            },
            switch_name: name.into(),
            switch_wwn: wwn.into(),
            switch_model: Some(162),
            switch_mode: "Native".into(),
            device_labels: devices.iter().map(|d| d.to_string()).collect(),
            enclosure: enclosure.map(str::to_string),
        }
    }

    #[test]
    fn test_device_overlap_pairs_mutually() {
        let candidates = vec![
            candidate("A", "SW_PROD_A1", "w:a1", &["esx-01", "esx-02", "esx-03"], None),
            candidate("B", "SW_PROD_B1", "w:b1", &["esx-01", "esx-02", "esx-04"], None),
            candidate("B", "SW_OTHER_B2", "w:b2", &["db-09"], None),
        ];
        let stats = ProcessingStats::new();
        let (rows, audit) = resolve_pairs("PROD", &candidates, thresholds(), &stats);

        let a1 = rows.iter().find(|r| r.switch_wwn == "w:a1").unwrap();
        assert_eq!(a1.partner_wwn.as_deref(), Some("w:b1"));
        assert_eq!(a1.pairing_type, Some(PairingType::DeviceOverlap));
        assert!((a1.confidence.unwrap() - 2.0 / 3.0).abs() < 1e-9);

        let b1 = rows.iter().find(|r| r.switch_wwn == "w:b1").unwrap();
        assert_eq!(b1.partner_wwn.as_deref(), Some("w:a1"));
        assert_eq!(audit.ok, 2);
        assert_eq!(audit.duplicated, 0);
    }

    #[test]
    fn test_overlap_below_threshold_falls_to_name_similarity() {
        let candidates = vec![
            candidate("A", "SW_EDGE_A7", "w:a7", &["h1", "h2", "h3", "h4", "h5"], None),
            // Only 1 of 5 devices shared (ratio 0.2), but the name matches
            candidate("B", "SW_EDGE_B7", "w:b7", &["h1", "x2", "x3"], None),
        ];
        let stats = ProcessingStats::new();
        let (rows, _) = resolve_pairs("PROD", &candidates, thresholds(), &stats);
        let a7 = rows.iter().find(|r| r.switch_wwn == "w:a7").unwrap();
        assert_eq!(a7.pairing_type, Some(PairingType::NameSimilarity));
        assert_eq!(a7.partner_wwn.as_deref(), Some("w:b7"));
    }

    #[test]
    fn test_name_similarity_tie_stays_ambiguous() {
        let candidates = vec![
            candidate("A", "SW_X_A1", "w:a1", &[], None),
            candidate("B", "SW_X_B1", "w:b1", &[], None),
            candidate("B", "SW_X_C1", "w:c1", &[], None),
        ];
        let stats = ProcessingStats::new();
        let (rows, _) = resolve_pairs("PROD", &candidates, thresholds(), &stats);
        let a1 = rows.iter().find(|r| r.switch_wwn == "w:a1").unwrap();
        // Both B-side names are one character away; the tie is kept
        assert_eq!(a1.partner_wwn, None);
        assert_eq!(a1.candidate_wwns.len(), 2);
        assert_eq!(a1.pairing_type, Some(PairingType::NameSimilarity));
    }

    #[test]
    fn test_colocation_fallback_for_zero_device_switches() {
        let candidates = vec![
            candidate("A", "IOM_LEFT", "w:l", &[], Some("ENC-01")),
            candidate("B", "IOM_RIGHT", "w:r", &[], Some("ENC-01")),
        ];
        let stats = ProcessingStats::new();
        let (rows, _) = resolve_pairs("PROD", &candidates, thresholds(), &stats);
        let left = rows.iter().find(|r| r.switch_wwn == "w:l").unwrap();
        assert_eq!(left.partner_wwn.as_deref(), Some("w:r"));
        assert_eq!(left.pairing_type, Some(PairingType::Colocation));
        assert_eq!(left.confidence, Some(1.0));
        assert_eq!(stats.get_info_count(InfoType::ColocationPairing), 2);
    }

    #[test]
    fn test_unpaired_switch_is_counted() {
        let candidates = vec![candidate("A", "SW_ALONE", "w:x", &["h1"], None)];
        let stats = ProcessingStats::new();
        let (rows, audit) = resolve_pairs("PROD", &candidates, thresholds(), &stats);
        assert_eq!(rows[0].partner_wwn, None);
        assert_eq!(rows[0].pairing_type, None);
        assert_eq!(stats.get_warning_count(WarningType::UnpairedSwitch), 1);
        assert_eq!(audit.ok, 0);
    }

    #[test]
    fn test_candidates_from_same_label_are_excluded() {
        let candidates = vec![
            candidate("A", "SW_Y_A1", "w:a1", &["h1", "h2"], None),
            // Same label: never a partner candidate, whatever the overlap
            candidate("A", "SW_Y_A2", "w:a2", &["h1", "h2"], None),
        ];
        let stats = ProcessingStats::new();
        let (rows, _) = resolve_pairs("PROD", &candidates, thresholds(), &stats);
        assert!(rows.iter().all(|r| r.partner_wwn.is_none()));
    }

    #[test]
    fn test_symmetry_audit_flags_duplicated_partner() {
        let candidates = vec![
            candidate("A", "SW_Z_A1", "w:a1", &["h1", "h2"], None),
            candidate("A", "SW_Z_A2", "w:a2", &["h1", "h2"], None),
            candidate("B", "SW_Z_B1", "w:b1", &["h1", "h2"], None),
        ];
        let stats = ProcessingStats::new();
        let (_, audit) = resolve_pairs("PROD", &candidates, thresholds(), &stats);
        // Both A-side switches claim the single B-side switch
        assert!(audit.duplicated >= 2);
        assert!(!audit.asymmetries.is_empty());
    }

    #[test]
    fn test_repair_pass_breaks_tie_using_zero_device_pool() {
        let candidates = vec![
            candidate("A", "AG_RACK12_A", "w:ra", &[], None),
            candidate("B", "AG_RACK12_B", "w:rb", &[], None),
            // Same similarity score as the B switch, but it has devices, so
            // the repair pass drops it from the pool and breaks the tie
            candidate("B", "AG_RACK12_C", "w:rc", &["h1"], None),
        ];
        let stats = ProcessingStats::new();
        let (rows, _) = resolve_pairs("PROD", &candidates, thresholds(), &stats);
        let ra = rows.iter().find(|r| r.switch_wwn == "w:ra").unwrap();
        assert_eq!(ra.partner_wwn.as_deref(), Some("w:rb"));
        assert_eq!(stats.get_info_count(InfoType::RepairPassPairing), 1);
    }
}
