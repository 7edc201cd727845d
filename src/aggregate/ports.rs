//! Port and connected-device joins.
//!
//! Builds the canonical Port and ConnectedDeviceRecord tables for one
//! fabric. All joins are keyed left-joins on explicit tuples:
//! - port → switch metadata: (switch WWN) from the identity stamp
//! - port → name-server login: (switch WWN, FC address area)
//! - device → FDMI detail: (port WWN)
//! - device → enclosure: (port WWN)
//! - device → alias: (port WWN)
//!
//! NPIV fan-in: several name-server logins can share one physical port
//! (same FC address domain+area, different AL_PA byte). The first login is
//! the port's direct peer; every further login duplicates the port row with
//! the `npiv` flag set.

use std::collections::{HashMap, HashSet};

use crate::classify::{classify, ClassifierInput, OuiTable};
use crate::decode::DescriptorDecodeResult;
use crate::error_handling::{InfoType, ProcessingStats, WarningType};
use crate::inputs::EnclosureInventory;
use crate::models::{ConnectedDeviceRow, DeviceClass, PortRow, PortType};
use crate::parser::descriptor::{
    SECTION_AGSHOW, SECTION_ALISHOW, SECTION_FDMISHOW, SECTION_NSSHOW, SECTION_SWITCHSHOW,
    SECTION_TRUNKSHOW,
};
use crate::parser::Record;
use crate::utils::ParsedSwitch;

/// Parses a switchshow/nsshow speed token ("N32", "32G", "16") to Gb/s.
pub fn parse_speed(token: &str) -> Option<f64> {
    let token = token.trim().trim_start_matches('N').trim_end_matches('G');
    let value: f64 = token.parse().ok()?;
    if value > 0.0 {
        Some(value)
    } else {
        None
    }
}

/// Port and device tables for one switch, plus lookup indexes the link
/// joins reuse.
pub struct SwitchPorts {
    /// Canonical port rows.
    pub ports: Vec<PortRow>,
    /// Canonical connected-device rows.
    pub devices: Vec<ConnectedDeviceRow>,
    /// port_index → (slot, port), for joining index-keyed sections.
    pub coordinates: HashMap<u32, (u32, u32)>,
}

/// Builds the port and device tables for one parsed switch.
pub fn build_switch_ports(
    switch: &ParsedSwitch,
    oui_table: &OuiTable,
    enclosures: &EnclosureInventory,
    stats: &ProcessingStats,
) -> SwitchPorts {
    let identity = &switch.dump.identity;
    let fabric = &switch.fabric;

    let ag_wwns: HashSet<String> = switch
        .dump
        .section(SECTION_AGSHOW)
        .records
        .iter()
        .filter_map(|r| r.get("ag_wwn"))
        .map(|w| w.to_ascii_lowercase())
        .collect();

    let alias_by_wwn = alias_index(&switch.dump.section(SECTION_ALISHOW).records);
    let fdmi_by_wwn = fdmi_index(&switch.dump.section(SECTION_FDMISHOW).records);
    let trunk_member_ports = trunk_member_index(&switch.dump.section(SECTION_TRUNKSHOW).records);

    // Name-server logins grouped by FC address area (domain+area bytes)
    let mut logins_by_area: HashMap<String, Vec<&Record>> = HashMap::new();
    for record in &switch.dump.section(SECTION_NSSHOW).records {
        if let Some(address) = record.get_first("fc_address") {
            if address.len() == 6 {
                logins_by_area
                    .entry(address[..4].to_ascii_lowercase())
                    .or_default()
                    .push(record);
            }
        }
    }

    let mut ports = Vec::new();
    let mut devices = Vec::new();
    let mut coordinates = HashMap::new();

    for record in &switch.dump.section(SECTION_SWITCHSHOW).records {
        let (port_index, slot, port) = match (
            record.get_u32("port_index"),
            record.get_u32("slot"),
            record.get_u32("port"),
        ) {
            (Some(i), Some(s), Some(p)) => (i, s, p),
            _ => continue,
        };
        coordinates.insert(port_index, (slot, port));

        let state = record.get_first("state").unwrap_or_default().to_string();
        let online = state.eq_ignore_ascii_case("online");
        let port_type = PortType::parse(record.get_first("port_type").unwrap_or_default());
        let fc_address = record.get_first("fc_address").unwrap_or_default().to_string();
        let area = fc_address
            .get(..4)
            .map(|a| a.to_ascii_lowercase())
            .unwrap_or_default();

        let logins = logins_by_area.get(&area).map(Vec::as_slice).unwrap_or(&[]);
        let direct_peer = record
            .get_first("peer_wwn")
            .map(str::to_string)
            .or_else(|| logins.first().and_then(|r| r.get_first("port_wwn")).map(str::to_string));

        let base_row = PortRow {
            fabric_name: fabric.fabric_name.clone(),
            fabric_label: fabric.fabric_label.clone(),
            chassis_name: identity.chassis_name.clone(),
            chassis_wwn: identity.chassis_wwn.clone(),
            switch_index: identity.switch_index,
            switch_name: identity.switch_name.clone(),
            switch_wwn: identity.switch_wwn.clone(),
            slot,
            port,
            port_index,
            fc_address: fc_address.clone(),
            port_type: port_type.as_str().to_string(),
            state,
            speed_gbps: record.get_first("speed").and_then(parse_speed),
            connected_wwn: direct_peer.clone(),
            npiv: false,
        };
        ports.push(base_row.clone());

        // NPIV fan-in duplicates the port row per extra login
        if online && matches!(port_type, PortType::F | PortType::N) && logins.len() > 1 {
            stats.increment_info(InfoType::NpivFanIn);
            for login in logins.iter().skip(1) {
                let mut row = base_row.clone();
                row.connected_wwn = login.get_first("port_wwn").map(str::to_string);
                row.npiv = true;
                ports.push(row);
            }
        }

        // One device row per login at this port
        let trunk_slave = trunk_member_ports.contains(&port_index);
        if logins.is_empty() {
            // A trunk-slave F-port with no login carries no device; nothing
            // to record either way
            continue;
        }
        for login in logins {
            if !online {
                continue;
            }
            if let Some(device) = build_device_row(
                switch,
                login,
                slot,
                port,
                port_type,
                trunk_slave,
                &alias_by_wwn,
                &fdmi_by_wwn,
                &ag_wwns,
                oui_table,
                enclosures,
                stats,
            ) {
                devices.push(device);
            }
        }
    }

    SwitchPorts {
        ports,
        devices,
        coordinates,
    }
}

#[allow(clippy::too_many_arguments)]
fn build_device_row(
    switch: &ParsedSwitch,
    login: &Record,
    slot: u32,
    port: u32,
    port_type: PortType,
    trunk_slave: bool,
    alias_by_wwn: &HashMap<String, String>,
    fdmi_by_wwn: &HashMap<String, FdmiDetail>,
    ag_wwns: &HashSet<String>,
    oui_table: &OuiTable,
    enclosures: &EnclosureInventory,
    stats: &ProcessingStats,
) -> Option<ConnectedDeviceRow> {
    let identity = &switch.dump.identity;
    let port_wwn = login.get_first("port_wwn")?.to_string();
    let key = port_wwn.to_ascii_lowercase();

    let empty_decode = DescriptorDecodeResult::default();
    let decode = switch.decodes.get(&key).unwrap_or(&empty_decode);
    let fdmi = fdmi_by_wwn.get(&key);

    let classification = classify(&ClassifierInput {
        connected_wwn: Some(&port_wwn),
        decode,
        port_type,
        online: true,
        remote_is_access_gateway: ag_wwns.contains(&key)
            || login
                .get_first("device_type")
                .map(|t| t.contains("NPIV"))
                .unwrap_or(false),
        trunk_slave,
        oui_table,
        enclosures,
    })?;

    if classification.class == DeviceClass::Unknown {
        stats.increment_warning(WarningType::UnknownDeviceClass);
    }

    Some(ConnectedDeviceRow {
        fabric_name: switch.fabric.fabric_name.clone(),
        fabric_label: switch.fabric.fabric_label.clone(),
        chassis_name: identity.chassis_name.clone(),
        switch_name: identity.switch_name.clone(),
        switch_wwn: identity.switch_wwn.clone(),
        slot,
        port,
        node_wwn: login.get_first("node_wwn").map(str::to_string),
        alias: alias_by_wwn.get(&key).cloned(),
        host_name: decode
            .host_name
            .clone()
            .or_else(|| fdmi.and_then(|f| f.host_name.clone())),
        device_class: classification.class.as_str().to_string(),
        device_subtype: classification.subtype,
        manufacturer: decode
            .manufacturer
            .clone()
            .or_else(|| fdmi.and_then(|f| f.manufacturer.clone())),
        model: decode
            .model
            .clone()
            .or_else(|| fdmi.and_then(|f| f.model.clone())),
        serial: decode
            .serial
            .clone()
            .or_else(|| fdmi.and_then(|f| f.serial.clone())),
        firmware: decode
            .firmware
            .clone()
            .or_else(|| fdmi.and_then(|f| f.firmware.clone())),
        host_os: decode.host_os.clone(),
        location: decode.location.clone(),
        descriptor_decoded: decode.used(),
        port_wwn,
    })
}

struct FdmiDetail {
    manufacturer: Option<String>,
    model: Option<String>,
    serial: Option<String>,
    firmware: Option<String>,
    host_name: Option<String>,
}

fn fdmi_index(records: &[Record]) -> HashMap<String, FdmiDetail> {
    let mut index = HashMap::new();
    for record in records {
        for wwn in record.get_all("port_wwn") {
            index.insert(
                wwn.to_ascii_lowercase(),
                FdmiDetail {
                    manufacturer: record.get_first("manufacturer").map(str::to_string),
                    model: record.get_first("model").map(str::to_string),
                    serial: record.get_first("serial").map(str::to_string),
                    firmware: record.get_first("firmware").map(str::to_string),
                    host_name: record.get_first("host_name").map(str::to_string),
                },
            );
        }
    }
    index
}

fn alias_index(records: &[Record]) -> HashMap<String, String> {
    let mut index = HashMap::new();
    for record in records {
        let alias = match record.get_first("alias") {
            Some(a) => a,
            None => continue,
        };
        for wwn in record.get_all("member_wwn") {
            index.insert(wwn.to_ascii_lowercase(), alias.to_string());
        }
    }
    index
}

fn trunk_member_index(records: &[Record]) -> HashSet<u32> {
    records
        .iter()
        .filter(|r| r.get("master") == Some("0"))
        .filter_map(|r| r.get_u32("local_port"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FabricKey;
    use crate::parser::{parse_dump, LogicalSwitchTarget, RawSwitchDump};
    use crate::utils::decode_switch;

    fn parsed(text: &str) -> ParsedSwitch {
        let dump = parse_dump(
            &RawSwitchDump {
                config_id: "dump01".into(),
                text: text.into(),
            },
            LogicalSwitchTarget::Any,
        );
        let stats = ProcessingStats::new();
        decode_switch(
            FabricKey {
                fabric_name: "PROD".into(),
                fabric_label: "A".into(),
            },
            dump,
            &stats,
        )
    }

    const DUMP: &str = r#"
** SS CMD START ** switchshow
switchName: SW_PROD_A1
switchType: 162.0
switchWwn: 10:00:00:05:1e:01:02:03
  0    0   010000   id    N32   Online      FC  F-Port  10:00:00:10:9b:aa:bb:cc
  1    1   010100   id    N16   Online      FC  F-Port  50:06:01:60:3b:a0:12:34
  2    2   010200   id    N32   No_Light
** SS CMD END **
** SS CMD START ** nsshow
 N    010000;      3;10:00:00:10:9b:aa:bb:cc;20:00:00:10:9b:aa:bb:cc; na
    PortSymb: [40] "Emulex LPe32002-M2 FV12.8 DV14.0 HN:esx-01 OS:VMware"
    Port Index: 0
 N    010001;      3;10:00:00:10:9b:aa:bb:cd;20:00:00:10:9b:aa:bb:cc; na
    Port Index: 0
 N    010100;      3;50:06:01:60:3b:a0:12:34;50:06:01:60:3b:a0:12:00; na
    NodeSymb: [20] "ACME X1 SN:S123"
    Port Index: 1
** SS CMD END **
** SS CMD START ** alishow
 alias: esx01_hba0
        10:00:00:10:9b:aa:bb:cc
** SS CMD END **
"#;

    #[test]
    fn test_port_rows_with_npiv_fan_in() {
        let switch = parsed(DUMP);
        let stats = ProcessingStats::new();
        let result = build_switch_ports(
            &switch,
            &OuiTable::builtin(),
            &EnclosureInventory::default(),
            &stats,
        );

        // 3 physical ports + 1 NPIV duplicate of port 0
        assert_eq!(result.ports.len(), 4);
        let npiv: Vec<&PortRow> = result.ports.iter().filter(|p| p.npiv).collect();
        assert_eq!(npiv.len(), 1);
        assert_eq!(npiv[0].port_index, 0);
        assert_eq!(
            npiv[0].connected_wwn.as_deref(),
            Some("10:00:00:10:9b:aa:bb:cd")
        );
        assert_eq!(stats.get_info_count(InfoType::NpivFanIn), 1);
    }

    #[test]
    fn test_device_rows_join_decode_and_alias() {
        let switch = parsed(DUMP);
        let stats = ProcessingStats::new();
        let result = build_switch_ports(
            &switch,
            &OuiTable::builtin(),
            &EnclosureInventory::default(),
            &stats,
        );

        // Two logins at port 0 plus one at port 1
        assert_eq!(result.devices.len(), 3);
        let server = result
            .devices
            .iter()
            .find(|d| d.port_wwn == "10:00:00:10:9b:aa:bb:cc")
            .unwrap();
        assert_eq!(server.device_class, "SRV");
        assert_eq!(server.host_name.as_deref(), Some("esx-01"));
        assert_eq!(server.alias.as_deref(), Some("esx01_hba0"));
        assert!(server.descriptor_decoded);

        let array = result
            .devices
            .iter()
            .find(|d| d.port_wwn == "50:06:01:60:3b:a0:12:34")
            .unwrap();
        assert_eq!(array.device_class, "STORAGE");
        assert_eq!(array.serial.as_deref(), Some("S123"));
    }

    #[test]
    fn test_offline_port_yields_no_device() {
        let switch = parsed(DUMP);
        let stats = ProcessingStats::new();
        let result = build_switch_ports(
            &switch,
            &OuiTable::builtin(),
            &EnclosureInventory::default(),
            &stats,
        );
        assert!(result
            .devices
            .iter()
            .all(|d| !(d.slot == 0 && d.port == 2)));
    }

    #[test]
    fn test_coordinates_index() {
        let switch = parsed(DUMP);
        let stats = ProcessingStats::new();
        let result = build_switch_ports(
            &switch,
            &OuiTable::builtin(),
            &EnclosureInventory::default(),
            &stats,
        );
        assert_eq!(result.coordinates.get(&1), Some(&(0, 1)));
    }

    #[test]
    fn test_parse_speed() {
        assert_eq!(parse_speed("N32"), Some(32.0));
        assert_eq!(parse_speed("16G"), Some(16.0));
        assert_eq!(parse_speed("8"), Some(8.0));
        assert_eq!(parse_speed("AN"), None);
        assert_eq!(parse_speed(""), None);
    }
}
