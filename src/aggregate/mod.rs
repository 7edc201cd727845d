//! Fabric-wide topology aggregation.
//!
//! Merges the per-switch record sets of one logical fabric (all its
//! redundant plane labels) into the unified Port, ConnectedDeviceRecord,
//! and ISLLink tables, per-switch summaries, and the pairing-candidate
//! evidence the resolver consumes. Aggregation runs only after every
//! per-switch parse task for the fabric has completed.

pub mod links;
pub mod metrics;
pub mod ports;

pub use metrics::SwitchSummary;

use std::collections::BTreeSet;

use log::debug;

use crate::classify::OuiTable;
use crate::error_handling::ProcessingStats;
use crate::inputs::EnclosureInventory;
use crate::models::{ConnectedDeviceRow, IslLinkRow, PortRow};
use crate::pairing::PairingCandidate;
use crate::utils::ParsedSwitch;

/// The aggregated model of one logical fabric.
#[derive(Debug)]
pub struct FabricModel {
    /// Logical fabric name.
    pub fabric_name: String,
    /// Canonical port table.
    pub ports: Vec<PortRow>,
    /// Canonical connected-device table.
    pub devices: Vec<ConnectedDeviceRow>,
    /// Canonical ISL table, one row per physical link.
    pub links: Vec<IslLinkRow>,
    /// Per-switch summaries with derived metrics.
    pub summaries: Vec<SwitchSummary>,
    /// Evidence rows for the pairing resolver.
    pub pairing_candidates: Vec<PairingCandidate>,
}

/// Aggregates all parsed switches of one fabric name.
pub fn aggregate_fabric(
    fabric_name: &str,
    switches: &[ParsedSwitch],
    oui_table: &OuiTable,
    enclosures: &EnclosureInventory,
    stats: &ProcessingStats,
) -> FabricModel {
    let mut all_ports = Vec::new();
    let mut all_devices = Vec::new();
    let mut summaries = Vec::new();
    let mut pairing_candidates = Vec::new();

    let switch_ports: Vec<ports::SwitchPorts> = switches
        .iter()
        .map(|switch| ports::build_switch_ports(switch, oui_table, enclosures, stats))
        .collect();

    for (switch, sp) in switches.iter().zip(&switch_ports) {
        summaries.push(metrics::build_switch_summary(switch, &sp.ports));
        pairing_candidates.push(pairing_candidate(switch, &sp.devices, enclosures));
        all_ports.extend(sp.ports.iter().cloned());
        all_devices.extend(sp.devices.iter().cloned());
    }

    let link_input: Vec<(&ParsedSwitch, &ports::SwitchPorts)> =
        switches.iter().zip(switch_ports.iter()).collect();
    let links = links::build_fabric_links(&link_input, stats);

    debug!(
        "Aggregated fabric {}: {} ports, {} devices, {} links across {} switches",
        fabric_name,
        all_ports.len(),
        all_devices.len(),
        links.len(),
        switches.len()
    );

    FabricModel {
        fabric_name: fabric_name.to_string(),
        ports: all_ports,
        devices: all_devices,
        links,
        summaries,
        pairing_candidates,
    }
}

/// The label a device is matched under during overlap pairing: the most
/// specific stable name available.
fn device_label(device: &ConnectedDeviceRow) -> String {
    device
        .host_name
        .clone()
        .or_else(|| device.alias.clone())
        .or_else(|| device.serial.clone())
        .unwrap_or_else(|| device.port_wwn.clone())
}

fn pairing_candidate(
    switch: &ParsedSwitch,
    devices: &[ConnectedDeviceRow],
    enclosures: &EnclosureInventory,
) -> PairingCandidate {
    use crate::parser::descriptor::SECTION_SWITCHSHOW;

    let identity = &switch.dump.identity;
    let header = &switch.dump.section(SECTION_SWITCHSHOW).header;
    let switch_mode = header
        .get_first("switch_mode")
        .map(|m| m.split_whitespace().next().unwrap_or(m).to_string())
        .unwrap_or_else(|| "Native".to_string());

    let device_labels: BTreeSet<String> = devices.iter().map(device_label).collect();

    PairingCandidate {
        fabric: switch.fabric.clone(),
        switch_name: identity.switch_name.clone(),
        switch_wwn: identity.switch_wwn.clone(),
        switch_model: switch.dump.switch_model,
        switch_mode,
        device_labels,
        enclosure: enclosures.lookup(&identity.switch_wwn).map(|e| e.enclosure.clone()),
    }
}
