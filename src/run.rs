//! Run orchestration.
//!
//! Wires the whole pipeline together: load the static inputs, process every
//! manifest entry through a bounded worker pool, wait for all parse tasks
//! (the barrier aggregation requires), aggregate and resolve pairs per
//! fabric, and assemble the final report.

use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use log::info;
use tokio_util::sync::CancellationToken;

use crate::aggregate::aggregate_fabric;
use crate::classify::OuiTable;
use crate::config::Config;
use crate::error_handling::{print_processing_statistics, ErrorType, ProcessingStats};
use crate::initialization::init_semaphore;
use crate::inputs::{load_manifest, EnclosureInventory};
use crate::pairing::{resolve_pairs, PairingThresholds};
use crate::report::{AnalysisReport, MissingSection, SkippedSwitch, UndecodedEntry};
use crate::utils::{process_dump, spawn_progress_logger, ParsedSwitch, ProgressCounter, SwitchOutcome};

/// Runs the full analysis for one configuration.
///
/// Fatal errors are configuration problems only (unreadable manifest or
/// lookup tables, zero parseable switches); everything else degrades into
/// the discrepancy report.
pub async fn run_analysis(config: Config) -> Result<AnalysisReport> {
    let oui_table = Arc::new(match &config.oui_table {
        Some(path) => OuiTable::load(path)?,
        None => OuiTable::builtin(),
    });
    let enclosures = Arc::new(match &config.enclosure_inventory {
        Some(path) => EnclosureInventory::load(path)?,
        None => EnclosureInventory::default(),
    });

    let manifest = load_manifest(&config.manifest).await?;
    let stats = Arc::new(ProcessingStats::new());
    for _ in 0..manifest.invalid_lines {
        stats.increment_error(ErrorType::ManifestLineInvalid);
    }
    if manifest.entries.is_empty() {
        bail!(
            "Manifest {} names no switch dumps",
            config.manifest.display()
        );
    }

    let total = manifest.entries.len();
    info!("Processing {} switch dumps", total);

    let semaphore = init_semaphore(config.max_workers);
    let completed: ProgressCounter = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let token = CancellationToken::new();
    let progress = spawn_progress_logger(Arc::clone(&completed), total, token.clone());

    let mut tasks = FuturesUnordered::new();
    for entry in manifest.entries {
        let semaphore = Arc::clone(&semaphore);
        let stats = Arc::clone(&stats);
        let completed = Arc::clone(&completed);
        tasks.push(tokio::spawn(async move {
            // Permit acquisition bounds concurrent parses; an acquire error
            // means the semaphore closed, which never happens here
            let _permit = semaphore.acquire_owned().await;
            let outcome = process_dump(entry, stats).await;
            completed.fetch_add(1, Ordering::Relaxed);
            outcome
        }));
    }

    // Join barrier: aggregation and pairing need every switch of a fabric
    let mut by_fabric: HashMap<String, Vec<ParsedSwitch>> = HashMap::new();
    let mut skipped = Vec::new();
    while let Some(joined) = tasks.next().await {
        match joined.context("per-switch task panicked")? {
            SwitchOutcome::Parsed(switch) => {
                by_fabric
                    .entry(switch.fabric.fabric_name.clone())
                    .or_default()
                    .push(*switch);
            }
            SwitchOutcome::Skipped { config_id, reason } => {
                skipped.push(SkippedSwitch {
                    config_id,
                    reason: reason.as_str().to_string(),
                });
            }
        }
    }
    token.cancel();
    let _ = progress.await;

    if by_fabric.is_empty() {
        bail!("No switch dump could be parsed; nothing to analyze");
    }

    let thresholds = PairingThresholds {
        min_overlap_ratio: config.min_overlap_ratio,
        min_name_similarity: config.min_name_similarity,
    };

    // Independent fabrics aggregate concurrently; within one fabric the
    // model is built single-threaded
    let mut fabric_tasks = FuturesUnordered::new();
    for (fabric_name, switches) in by_fabric {
        let oui_table = Arc::clone(&oui_table);
        let enclosures = Arc::clone(&enclosures);
        let stats = Arc::clone(&stats);
        fabric_tasks.push(tokio::task::spawn_blocking(move || {
            let model =
                aggregate_fabric(&fabric_name, &switches, &oui_table, &enclosures, &stats);
            let (pairs, audit) =
                resolve_pairs(&fabric_name, &model.pairing_candidates, thresholds, &stats);
            (switches, model, pairs, audit)
        }));
    }

    let mut report = AnalysisReport {
        switches_skipped: skipped.len(),
        ..Default::default()
    };
    report.discrepancies.skipped_switches = skipped;

    while let Some(joined) = fabric_tasks.next().await {
        let (switches, model, pairs, audit) =
            joined.context("fabric aggregation task panicked")?;
        report.fabric_count += 1;
        report.switches_parsed += switches.len();
        for switch in &switches {
            let config_id = &switch.dump.identity.config_id;
            for &section in &switch.dump.missing_sections {
                report.discrepancies.missing_sections.push(MissingSection {
                    config_id: config_id.clone(),
                    section,
                });
            }
            for undecoded in &switch.undecoded {
                report
                    .discrepancies
                    .undecoded_descriptors
                    .push(UndecodedEntry {
                        config_id: config_id.clone(),
                        port_wwn: undecoded.port_wwn.clone(),
                        port_symb: undecoded.port_symb.clone(),
                        node_symb: undecoded.node_symb.clone(),
                    });
            }
        }
        report.ports.extend(model.ports);
        report.devices.extend(model.devices);
        report.links.extend(model.links);
        report.summaries.extend(model.summaries);
        report.pairs.extend(pairs);
        report.discrepancies.pairing_audits.push(audit);
    }

    if let Some(dir) = &config.export_dir {
        crate::export::export_tables(&report, dir, &config.export_format)?;
    }

    report.log_summary();
    report.discrepancies.log_summary();
    print_processing_statistics(&stats);

    Ok(report)
}
