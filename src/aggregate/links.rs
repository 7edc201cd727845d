//! ISL link table construction.
//!
//! Joins performed per reporting switch, all on explicit key tuples:
//! - ISL → trunk membership: (local port index), with the trunk group id
//!   forward-filled from the master line across the member lines below it
//! - ISL → local SFP/port-config detail: (slot, port) via the port index
//! - ISL → remote switch: (fabric, remote WWN), then the remote SFP the
//!   same way on the remote side
//!
//! Every physical link is reported by both endpoint switches; exactly one
//! canonical row per link is kept, chosen by switch class (director >
//! enterprise > midrange > entry), then model number, then switch name.

use std::collections::HashMap;

use crate::error_handling::{InfoType, ProcessingStats};
use crate::models::{IslLinkRow, SpeedCheck, SwitchClass};
use crate::parser::descriptor::{
    SECTION_ISLSHOW, SECTION_PORTCFGSHOW, SECTION_SFPSHOW, SECTION_TRUNKSHOW,
};
use crate::parser::Record;
use crate::utils::ParsedSwitch;

use super::ports::SwitchPorts;

/// SFP measurements for one port.
#[derive(Debug, Clone, Default)]
struct SfpDetail {
    rx_power_dbm: Option<f64>,
    rx_power_uw: Option<f64>,
    tx_power_dbm: Option<f64>,
    tx_power_uw: Option<f64>,
    max_speed_gbps: Option<f64>,
}

/// Static port configuration for one port.
#[derive(Debug, Clone, Default)]
struct PortCfgDetail {
    trunk_enabled: Option<bool>,
    cfg_speed: Option<String>,
}

/// Per-switch link-side context shared by both dedup candidates.
struct SwitchSide<'a> {
    switch: &'a ParsedSwitch,
    ports: &'a SwitchPorts,
    sfp: HashMap<(u32, u32), SfpDetail>,
    portcfg: HashMap<(u32, u32), PortCfgDetail>,
    trunk: HashMap<u32, (Option<u32>, bool)>,
}

impl<'a> SwitchSide<'a> {
    fn new(switch: &'a ParsedSwitch, ports: &'a SwitchPorts) -> SwitchSide<'a> {
        SwitchSide {
            switch,
            ports,
            sfp: sfp_index(&switch.dump.section(SECTION_SFPSHOW).records),
            portcfg: portcfg_index(&switch.dump.section(SECTION_PORTCFGSHOW).records),
            trunk: trunk_index(&switch.dump.section(SECTION_TRUNKSHOW).records),
        }
    }

    fn sfp_for_port_index(&self, port_index: u32) -> Option<&SfpDetail> {
        let coords = self.ports.coordinates.get(&port_index)?;
        self.sfp.get(coords)
    }

    fn portcfg_for_port_index(&self, port_index: u32) -> Option<&PortCfgDetail> {
        let coords = self.ports.coordinates.get(&port_index)?;
        self.portcfg.get(coords)
    }

    /// Dedup precedence of this switch.
    fn rank(&self) -> (SwitchClass, u32, String) {
        let model = self.switch.dump.switch_model.unwrap_or(0);
        (
            SwitchClass::from_model(model),
            model,
            self.switch.dump.identity.switch_name.clone(),
        )
    }
}

/// Builds the deduplicated ISL table for one fabric.
pub fn build_fabric_links(
    switches: &[(&ParsedSwitch, &SwitchPorts)],
    stats: &ProcessingStats,
) -> Vec<IslLinkRow> {
    let sides: Vec<SwitchSide<'_>> = switches
        .iter()
        .map(|(switch, ports)| SwitchSide::new(switch, ports))
        .collect();
    let side_by_wwn: HashMap<String, &SwitchSide<'_>> = sides
        .iter()
        .map(|s| {
            (
                s.switch.dump.identity.switch_wwn.to_ascii_lowercase(),
                s,
            )
        })
        .collect();

    // canonical link key → (precedence rank, row)
    let mut canonical: HashMap<LinkKey, ((SwitchClass, u32, String), IslLinkRow)> = HashMap::new();

    for side in &sides {
        for record in &side.switch.dump.section(SECTION_ISLSHOW).records {
            let row = match build_link_row(side, &side_by_wwn, record) {
                Some(row) => row,
                None => continue,
            };
            let key = LinkKey::new(&row);
            let rank = side.rank();
            match canonical.get(&key) {
                Some((kept_rank, _)) if *kept_rank >= rank => {
                    stats.increment_info(InfoType::IslDeduplicated);
                }
                Some(_) => {
                    stats.increment_info(InfoType::IslDeduplicated);
                    canonical.insert(key, (rank, row));
                }
                None => {
                    canonical.insert(key, (rank, row));
                }
            }
        }
    }

    let mut links: Vec<IslLinkRow> = canonical.into_values().map(|(_, row)| row).collect();
    links.sort_by(|a, b| {
        (&a.switch_name, a.local_port).cmp(&(&b.switch_name, b.local_port))
    });
    links
}

/// Key identifying one physical link regardless of which endpoint reports
/// it: the sorted (WWN, port) endpoint tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LinkKey {
    low: (String, u32),
    high: (String, u32),
}

impl LinkKey {
    fn new(row: &IslLinkRow) -> LinkKey {
        let a = (row.switch_wwn.to_ascii_lowercase(), row.local_port);
        let b = (
            row.remote_switch_wwn.to_ascii_lowercase(),
            row.remote_port,
        );
        if a <= b {
            LinkKey { low: a, high: b }
        } else {
            LinkKey { low: b, high: a }
        }
    }
}

fn build_link_row(
    side: &SwitchSide<'_>,
    side_by_wwn: &HashMap<String, &SwitchSide<'_>>,
    record: &Record,
) -> Option<IslLinkRow> {
    let identity = &side.switch.dump.identity;
    let fabric = &side.switch.fabric;

    let local_port = record.get_u32("local_port")?;
    let remote_port = record.get_u32("remote_port")?;
    let remote_wwn = record.get_first("remote_wwn")?.to_string();

    let remote_side = side_by_wwn.get(&remote_wwn.to_ascii_lowercase()).copied();
    let remote_name = record
        .get_first("remote_name")
        .map(str::to_string)
        .or_else(|| remote_side.map(|s| s.switch.dump.identity.switch_name.clone()))
        .unwrap_or_default();

    let (trunk_id, trunk_master) = side
        .trunk
        .get(&local_port)
        .copied()
        .unwrap_or((None, true));

    let local_slot = side
        .ports
        .coordinates
        .get(&local_port)
        .map(|(slot, _)| *slot)
        .unwrap_or(0);

    let local_sfp = side.sfp_for_port_index(local_port);
    let remote_sfp = remote_side.and_then(|s| s.sfp_for_port_index(remote_port));
    let local_cfg = side.portcfg_for_port_index(local_port);
    let remote_cfg = remote_side.and_then(|s| s.portcfg_for_port_index(remote_port));

    let speed_gbps = record.get_f64("speed");
    let attenuation_db = attenuation_dbm(local_sfp, remote_sfp);
    let attenuation_db_linear = attenuation_linear(local_sfp, remote_sfp);

    let max_available_speed_gbps = max_available_speed(
        local_sfp,
        remote_sfp,
        side.switch.dump.switch_model,
        remote_side.and_then(|s| s.switch.dump.switch_model),
    );
    // Equality only: an actual speed above every ceiling is inconsistent
    // data, not a clean match
    let speed_check = match (speed_gbps, max_available_speed_gbps) {
        (Some(actual), Some(max)) if (actual - max).abs() < 1e-6 => SpeedCheck::Match,
        (Some(_), Some(_)) => SpeedCheck::Mismatch,
        _ => SpeedCheck::Unknown,
    };

    Some(IslLinkRow {
        fabric_name: fabric.fabric_name.clone(),
        fabric_label: fabric.fabric_label.clone(),
        chassis_name: identity.chassis_name.clone(),
        switch_name: identity.switch_name.clone(),
        switch_wwn: identity.switch_wwn.clone(),
        local_slot,
        local_port,
        remote_switch_name: remote_name,
        remote_switch_wwn: remote_wwn,
        remote_port,
        trunk_id,
        trunk_master,
        local_trunking_enabled: local_cfg.and_then(|c| c.trunk_enabled),
        remote_trunking_enabled: remote_cfg.and_then(|c| c.trunk_enabled),
        local_cfg_speed: local_cfg.and_then(|c| c.cfg_speed.clone()),
        remote_cfg_speed: remote_cfg.and_then(|c| c.cfg_speed.clone()),
        speed_gbps,
        bandwidth_gbps: record.get_f64("bandwidth"),
        attenuation_db,
        attenuation_db_linear,
        max_available_speed_gbps,
        speed_check,
    })
}

/// Attenuation local→remote by direct dBm subtraction.
fn attenuation_dbm(local: Option<&SfpDetail>, remote: Option<&SfpDetail>) -> Option<f64> {
    let tx = local?.tx_power_dbm?;
    let rx = remote?.rx_power_dbm?;
    Some(tx - rx)
}

/// Attenuation local→remote from the linear power ratio.
fn attenuation_linear(local: Option<&SfpDetail>, remote: Option<&SfpDetail>) -> Option<f64> {
    let tx = local?.tx_power_uw?;
    let rx = remote?.rx_power_uw?;
    if tx <= 0.0 || rx <= 0.0 {
        return None;
    }
    Some(10.0 * (tx / rx).log10())
}

/// Minimum of the known speed ceilings; None when no ceiling is known.
fn max_available_speed(
    local_sfp: Option<&SfpDetail>,
    remote_sfp: Option<&SfpDetail>,
    local_model: Option<u32>,
    remote_model: Option<u32>,
) -> Option<f64> {
    let ceilings = [
        local_sfp.and_then(|s| s.max_speed_gbps),
        remote_sfp.and_then(|s| s.max_speed_gbps),
        local_model.and_then(switch_hw_max),
        remote_model.and_then(switch_hw_max),
    ];
    ceilings
        .iter()
        .flatten()
        .copied()
        .fold(None, |acc: Option<f64>, v| {
            Some(acc.map_or(v, |a| a.min(v)))
        })
}

/// Hardware speed ceiling per switch model generation.
fn switch_hw_max(model: u32) -> Option<f64> {
    match model {
        // 8G platforms
        62 | 66 | 71 | 77 => Some(8.0),
        // 16G platforms
        109 | 118 | 120 | 121 | 129 | 133 | 134 => Some(16.0),
        // 32G platforms
        130 | 131 | 162 | 165 | 166 | 170 => Some(32.0),
        // 64G platforms
        178 | 179 | 180 | 183 => Some(64.0),
        _ => None,
    }
}

fn sfp_index(records: &[Record]) -> HashMap<(u32, u32), SfpDetail> {
    let mut index = HashMap::new();
    for record in records {
        let (slot, port) = match (record.get_u32("slot"), record.get_u32("port")) {
            (Some(s), Some(p)) => (s, p),
            _ => continue,
        };
        index.insert(
            (slot, port),
            SfpDetail {
                rx_power_dbm: record.get_f64("rx_power_dbm"),
                rx_power_uw: record.get_f64("rx_power_uw"),
                tx_power_dbm: record.get_f64("tx_power_dbm"),
                tx_power_uw: record.get_f64("tx_power_uw"),
                max_speed_gbps: record
                    .get_first("speed_caps")
                    .and_then(|caps| {
                        caps.split('_')
                            .filter_map(|t| t.parse::<f64>().ok())
                            .fold(None, |acc: Option<f64>, v| {
                                Some(acc.map_or(v, |a| a.max(v)))
                            })
                    }),
            },
        );
    }
    index
}

fn portcfg_index(records: &[Record]) -> HashMap<(u32, u32), PortCfgDetail> {
    let mut index = HashMap::new();
    for record in records {
        let (slot, port) = match (record.get_u32("slot"), record.get_u32("port")) {
            (Some(s), Some(p)) => (s, p),
            _ => continue,
        };
        index.insert(
            (slot, port),
            PortCfgDetail {
                trunk_enabled: record.get_first("trunk_port").map(|v| v == "ON"),
                cfg_speed: record.get_first("cfg_speed").map(str::to_string),
            },
        );
    }
    index
}

/// port index → (trunk group id, is-master), forward-filling the group id
/// from each master line across the member lines below it.
fn trunk_index(records: &[Record]) -> HashMap<u32, (Option<u32>, bool)> {
    let mut index = HashMap::new();
    let mut current_trunk: Option<u32> = None;
    for record in records {
        let master = record.get("master") == Some("1");
        if master {
            current_trunk = record.get_u32("trunk_id");
        }
        if let Some(port) = record.get_u32("local_port") {
            index.insert(port, (current_trunk, master));
        }
    }
    index
}
