//! Canonical fabric model types.
//!
//! These are the typed rows that the aggregation phase produces and that
//! external report/diagram renderers consume. Every row carries its full
//! fabric-scoping key (fabric name, fabric label, chassis identity, switch
//! identity) so that any report can be re-derived purely by column
//! projection and filtering. No presentation formatting happens here.

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

/// Identifies one redundant plane of a logical fabric.
///
/// A fabric is typically deployed as two (or more) independent,
/// identically-structured planes; `fabric_label` distinguishes the planes
/// while `fabric_name` identifies the logical fabric they both serve. WWN
/// values may legitimately repeat across different fabrics, so all
/// WWN-keyed joins are scoped by this key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FabricKey {
    /// Logical fabric name shared by all redundant planes.
    pub fabric_name: String,
    /// Plane label (commonly "A" / "B").
    pub fabric_label: String,
}

/// The identity prefix stamped onto every parsed record of a switch.
///
/// Parsed records stay joinable after the parse phase because each one
/// carries this key, even when the record itself came from a section that
/// does not mention the switch at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchIdentity {
    /// Identifier of the configuration file (dump) this switch came from.
    pub config_id: String,
    /// Chassis name from `chassisshow`.
    pub chassis_name: String,
    /// Chassis WWN from `chassisshow`.
    pub chassis_wwn: String,
    /// Logical switch index (0 for non-virtual-fabric switches).
    pub switch_index: u32,
    /// Switch name from `switchshow`.
    pub switch_name: String,
    /// Switch WWN from `switchshow`.
    pub switch_wwn: String,
}

/// Device class vocabulary assigned by the classifier.
///
/// Classification is total for connected ports: when a port is online and
/// no class can be derived the classifier yields `Unknown` rather than
/// leaving the field empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum DeviceClass {
    /// Standalone server HBA.
    #[serde(rename = "SRV")]
    Srv,
    /// Server blade embedded in a blade enclosure.
    #[serde(rename = "SRV_BLADE")]
    SrvBlade,
    /// Server module in a composable (Synergy-style) frame.
    #[serde(rename = "SRV_SYNERGY")]
    SrvSynergy,
    /// Disk storage array port.
    #[serde(rename = "STORAGE")]
    Storage,
    /// Tape library / tape drive.
    #[serde(rename = "LIB")]
    Lib,
    /// Another Fibre Channel switch (native or access-gateway mode).
    #[serde(rename = "SWITCH")]
    Switch,
    /// Virtual Connect interconnect module.
    #[serde(rename = "VC")]
    Vc,
    /// Online port whose device could not be classified.
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl DeviceClass {
    /// Canonical table value for this class.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Srv => "SRV",
            DeviceClass::SrvBlade => "SRV_BLADE",
            DeviceClass::SrvSynergy => "SRV_SYNERGY",
            DeviceClass::Storage => "STORAGE",
            DeviceClass::Lib => "LIB",
            DeviceClass::Switch => "SWITCH",
            DeviceClass::Vc => "VC",
            DeviceClass::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A device classification: class plus an optional free-form subtype
/// (e.g. the enclosure bay for blade servers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Assigned device class.
    pub class: DeviceClass,
    /// Optional subtype detail.
    pub subtype: Option<String>,
}

impl Classification {
    /// Classification with no subtype detail.
    pub fn bare(class: DeviceClass) -> Classification {
        Classification {
            class,
            subtype: None,
        }
    }
}

/// Fibre Channel port operating type as reported by `switchshow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortType {
    /// Inter-switch link port.
    E,
    /// Fabric port with a device login.
    F,
    /// Node port (seen on access-gateway uplinks).
    N,
    /// Fibre Channel router port.
    Ex,
    /// Unlicensed / disabled / anything else.
    Other,
}

impl PortType {
    /// Parses the `switchshow` port type token (e.g. "F-Port").
    pub fn parse(token: &str) -> PortType {
        match token.trim().trim_end_matches("-Port") {
            "E" => PortType::E,
            "F" => PortType::F,
            "N" => PortType::N,
            "EX" => PortType::Ex,
            _ => PortType::Other,
        }
    }

    /// Canonical table value for this port type.
    pub fn as_str(&self) -> &'static str {
        match self {
            PortType::E => "E",
            PortType::F => "F",
            PortType::N => "N",
            PortType::Ex => "EX",
            PortType::Other => "OTHER",
        }
    }
}

/// Switch hardware tier, used as the ISL deduplication tie-break.
///
/// Ordering is significant: when both endpoints of a link report it, the
/// row kept is the one from the higher-class switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SwitchClass {
    /// Entry-level edge switch.
    Entry,
    /// Midrange switch.
    Midrange,
    /// Enterprise switch.
    Enterprise,
    /// Director-class chassis.
    Director,
}

impl SwitchClass {
    /// Maps a switch model number (the integer part of `switchType`) to a
    /// hardware tier. Unrecognized models fall back to `Entry`.
    pub fn from_model(model: u32) -> SwitchClass {
        match model {
            // Director chassis families
            62 | 77 | 120 | 121 | 165 | 166 | 179 | 180 => SwitchClass::Director,
            // Enterprise fixed-port
            109 | 133 | 134 | 162 | 170 | 178 | 183 => SwitchClass::Enterprise,
            // Midrange fixed-port
            66 | 71 | 118 | 129 | 130 | 131 => SwitchClass::Midrange,
            _ => SwitchClass::Entry,
        }
    }
}

/// One row of the canonical Port table.
///
/// A port belongs to exactly one switch and has at most one directly
/// logged-in WWN, except under NPIV fan-in where several rows share the
/// same physical `(slot, port)` coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortRow {
    /// Logical fabric name.
    pub fabric_name: String,
    /// Fabric plane label.
    pub fabric_label: String,
    /// Chassis name.
    pub chassis_name: String,
    /// Chassis WWN.
    pub chassis_wwn: String,
    /// Logical switch index.
    pub switch_index: u32,
    /// Switch name.
    pub switch_name: String,
    /// Switch WWN.
    pub switch_wwn: String,
    /// Slot number (0 on fixed-port switches).
    pub slot: u32,
    /// Port number within the slot.
    pub port: u32,
    /// Port index (unique per logical switch).
    pub port_index: u32,
    /// Fibre Channel address (6 hex digits), empty when not assigned.
    pub fc_address: String,
    /// Port type (E / F / N / EX / OTHER).
    pub port_type: String,
    /// Administrative/operational state (e.g. "Online", "No_Light").
    pub state: String,
    /// Negotiated speed in Gb/s, when online.
    pub speed_gbps: Option<f64>,
    /// WWN logged in at this port, when any.
    pub connected_wwn: Option<String>,
    /// True when this row is an NPIV fan-in duplicate of a physical port.
    pub npiv: bool,
}

/// One row of the canonical ConnectedDeviceRecord table.
///
/// The resolved identity of a device logged in at a port, merged from
/// name-server, FDMI, blade-enclosure and alias sources; each source may
/// independently be absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectedDeviceRow {
    /// Logical fabric name.
    pub fabric_name: String,
    /// Fabric plane label.
    pub fabric_label: String,
    /// Chassis name.
    pub chassis_name: String,
    /// Switch name.
    pub switch_name: String,
    /// Switch WWN.
    pub switch_wwn: String,
    /// Slot of the switch port the device is logged in at.
    pub slot: u32,
    /// Port of the switch port the device is logged in at.
    pub port: u32,
    /// Device port WWN.
    pub port_wwn: String,
    /// Device node WWN, when reported by the name server.
    pub node_wwn: Option<String>,
    /// Zoning alias, when defined.
    pub alias: Option<String>,
    /// Resolved host name (FDMI or decoded descriptor).
    pub host_name: Option<String>,
    /// Device class (always present; "UNKNOWN" when unresolvable).
    pub device_class: String,
    /// Device subtype detail, when derived.
    pub device_subtype: Option<String>,
    /// Decoded or FDMI manufacturer.
    pub manufacturer: Option<String>,
    /// Decoded or FDMI model.
    pub model: Option<String>,
    /// Decoded or FDMI serial number.
    pub serial: Option<String>,
    /// Decoded or FDMI firmware version.
    pub firmware: Option<String>,
    /// Decoded host operating system.
    pub host_os: Option<String>,
    /// Decoded location string, when present.
    pub location: Option<String>,
    /// True when at least one symbolic descriptor string decoded.
    pub descriptor_decoded: bool,
}

/// Ternary outcome of comparing actual link speed to the maximum the
/// hardware on both ends could support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedCheck {
    /// Link runs at the maximum available speed.
    #[serde(rename = "match")]
    Match,
    /// Link runs below the maximum available speed.
    #[serde(rename = "mismatch")]
    Mismatch,
    /// Not enough data to decide.
    #[serde(rename = "unknown")]
    Unknown,
}

/// One row of the canonical ISLLink table.
///
/// Each physical inter-switch link is observable from both endpoints; the
/// aggregator keeps exactly one canonical row per link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IslLinkRow {
    /// Logical fabric name.
    pub fabric_name: String,
    /// Fabric plane label.
    pub fabric_label: String,
    /// Chassis name of the reporting (kept) side.
    pub chassis_name: String,
    /// Switch name of the reporting side.
    pub switch_name: String,
    /// Switch WWN of the reporting side.
    pub switch_wwn: String,
    /// Local slot on the reporting side.
    pub local_slot: u32,
    /// Local port index on the reporting side.
    pub local_port: u32,
    /// Remote switch name.
    pub remote_switch_name: String,
    /// Remote switch WWN.
    pub remote_switch_wwn: String,
    /// Remote port index.
    pub remote_port: u32,
    /// Trunk group id when this ISL is a trunk member.
    pub trunk_id: Option<u32>,
    /// True for the trunk master link (or any non-trunked ISL).
    pub trunk_master: bool,
    /// Trunking enabled in the local port configuration.
    pub local_trunking_enabled: Option<bool>,
    /// Trunking enabled in the remote port configuration.
    pub remote_trunking_enabled: Option<bool>,
    /// Configured speed setting of the local port ("AN" or a fixed rate).
    pub local_cfg_speed: Option<String>,
    /// Configured speed setting of the remote port.
    pub remote_cfg_speed: Option<String>,
    /// Negotiated speed in Gb/s.
    pub speed_gbps: Option<f64>,
    /// Aggregate bandwidth in Gb/s (trunk master carries the group total).
    pub bandwidth_gbps: Option<f64>,
    /// Attenuation local→remote in dB, from dBm subtraction.
    pub attenuation_db: Option<f64>,
    /// Attenuation local→remote in dB, from linear power ratio.
    pub attenuation_db_linear: Option<f64>,
    /// Maximum speed the link could run at (min of the four ceilings).
    pub max_available_speed_gbps: Option<f64>,
    /// Actual vs. maximum speed comparison.
    pub speed_check: SpeedCheck,
}

/// Provenance of a proposed switch pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum PairingType {
    /// Paired because the two switches share connected device names.
    #[serde(rename = "device-overlap")]
    DeviceOverlap,
    /// Paired on normalized switch-name similarity.
    #[serde(rename = "name-similarity")]
    NameSimilarity,
    /// Paired because both (device-less) switches sit in the same
    /// enclosure/bay group.
    #[serde(rename = "colocation")]
    Colocation,
}

impl PairingType {
    /// Canonical table value for this pairing type.
    pub fn as_str(&self) -> &'static str {
        match self {
            PairingType::DeviceOverlap => "device-overlap",
            PairingType::NameSimilarity => "name-similarity",
            PairingType::Colocation => "colocation",
        }
    }
}

/// One row of the canonical SwitchPairResult table.
///
/// A final grouping of exactly two switch WWNs believed to form the
/// redundant partner pair for a logical switch identity. Ambiguous
/// resolutions keep multiple candidates and are flagged for manual review
/// instead of being broken arbitrarily.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchPairRow {
    /// Logical fabric name.
    pub fabric_name: String,
    /// Fabric plane label of the subject switch.
    pub fabric_label: String,
    /// Subject switch name.
    pub switch_name: String,
    /// Subject switch WWN.
    pub switch_wwn: String,
    /// Partner switch WWN, when exactly one was resolved.
    pub partner_wwn: Option<String>,
    /// All tied candidate WWNs when the resolution stayed ambiguous.
    pub candidate_wwns: Vec<String>,
    /// Strategy that produced the pairing, when any succeeded.
    pub pairing_type: Option<PairingType>,
    /// Confidence measure of the winning strategy (overlap ratio or
    /// similarity score; 1.0 for colocation).
    pub confidence: Option<f64>,
}
