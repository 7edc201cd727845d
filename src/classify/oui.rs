//! OUI-to-device-class lookup.
//!
//! The first three octets of a device WWN identify the adapter vendor
//! (IEEE organizationally unique identifier). Many vendors make exactly one
//! kind of Fibre Channel product, so the OUI alone often pins the device
//! class; vendors that make several (Brocade sells both switches and HBAs,
//! IBM sells both arrays and tape libraries) map to an ambiguous class set
//! that the rule cascade disambiguates with port-type and model evidence.
//!
//! A built-in table covering the common vendors is compiled in; an operator
//! table passed via `--oui-table` replaces it entirely.

use std::collections::HashMap;
use std::path::Path;

use log::info;

use crate::error_handling::InitializationError;
use crate::models::DeviceClass;

/// One OUI table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OuiEntry {
    /// Vendor name.
    pub vendor: String,
    /// Candidate device classes; one element means unambiguous.
    pub classes: Vec<DeviceClass>,
}

impl OuiEntry {
    /// The single class, when the entry is unambiguous.
    pub fn unambiguous(&self) -> Option<DeviceClass> {
        match self.classes.as_slice() {
            [single] => Some(*single),
            _ => None,
        }
    }
}

/// The loaded OUI table, keyed by lowercase colon-separated OUI.
#[derive(Debug)]
pub struct OuiTable {
    entries: HashMap<String, OuiEntry>,
}

// Compiled-in defaults. Kept deliberately small: operators with exotic
// hardware supply their own table.
const BUILTIN: &[(&str, &str, &[DeviceClass])] = &[
    ("00:10:9b", "Emulex", &[DeviceClass::Srv]),
    ("00:90:fa", "Emulex", &[DeviceClass::Srv]),
    ("00:24:ff", "QLogic", &[DeviceClass::Srv]),
    ("00:c0:dd", "QLogic", &[DeviceClass::Srv]),
    ("00:1b:32", "QLogic", &[DeviceClass::Srv]),
    ("00:60:69", "Brocade", &[DeviceClass::Switch]),
    ("00:0d:ec", "Cisco", &[DeviceClass::Switch]),
    // Brocade sold HBAs under the same OUI as its switches
    ("00:05:1e", "Brocade", &[DeviceClass::Switch, DeviceClass::Srv]),
    ("00:01:44", "EMC", &[DeviceClass::Storage]),
    ("00:60:16", "EMC", &[DeviceClass::Storage]),
    ("00:a0:98", "NetApp", &[DeviceClass::Storage]),
    ("00:04:cf", "Seagate", &[DeviceClass::Storage]),
    ("52:4a:93", "Pure Storage", &[DeviceClass::Storage]),
    // IBM uses one OUI for both arrays and tape drives
    ("00:05:07", "IBM", &[DeviceClass::Storage, DeviceClass::Lib]),
    ("00:21:5e", "IBM", &[DeviceClass::Storage, DeviceClass::Lib]),
    ("00:11:0a", "HPE", &[DeviceClass::Srv]),
    // HPE storage and tape share an OUI as well
    ("00:17:a4", "HPE", &[DeviceClass::Storage, DeviceClass::Lib]),
    ("00:9c:dc", "HPE Synergy", &[DeviceClass::SrvSynergy]),
    ("00:fd:45", "HPE Virtual Connect", &[DeviceClass::Vc]),
];

impl OuiTable {
    /// The compiled-in default table.
    pub fn builtin() -> OuiTable {
        let entries = BUILTIN
            .iter()
            .map(|(oui, vendor, classes)| {
                (
                    oui.to_string(),
                    OuiEntry {
                        vendor: vendor.to_string(),
                        classes: classes.to_vec(),
                    },
                )
            })
            .collect();
        OuiTable { entries }
    }

    /// Loads an operator table from CSV (`oui_prefix,vendor,class[|class...]`).
    ///
    /// An explicitly configured but unreadable or malformed table is a fatal
    /// configuration error: classifying a whole estate against a wrong table
    /// would be worse than not running.
    pub fn load(path: &Path) -> Result<OuiTable, InitializationError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| {
            InitializationError::OuiTableError(format!("{}: {}", path.display(), e))
        })?;
        let mut entries = HashMap::new();
        for row in reader.records() {
            let row = row.map_err(|e| {
                InitializationError::OuiTableError(format!("{}: {}", path.display(), e))
            })?;
            if row.len() != 3 {
                return Err(InitializationError::OuiTableError(format!(
                    "{}: expected 3 fields, got {}",
                    path.display(),
                    row.len()
                )));
            }
            let classes = row[2]
                .split('|')
                .map(parse_class)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|bad| {
                    InitializationError::OuiTableError(format!(
                        "{}: unknown device class '{}'",
                        path.display(),
                        bad
                    ))
                })?;
            entries.insert(
                row[0].trim().to_ascii_lowercase(),
                OuiEntry {
                    vendor: row[1].trim().to_string(),
                    classes,
                },
            );
        }
        info!("Loaded {} OUI entries from {}", entries.len(), path.display());
        Ok(OuiTable { entries })
    }

    /// Looks up the entry for a device WWN.
    pub fn lookup(&self, wwn: &str) -> Option<&OuiEntry> {
        let oui = extract_oui(wwn)?;
        self.entries.get(&oui)
    }

    /// Number of table entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_class(s: &str) -> Result<DeviceClass, String> {
    match s.trim() {
        "SRV" => Ok(DeviceClass::Srv),
        "SRV_BLADE" => Ok(DeviceClass::SrvBlade),
        "SRV_SYNERGY" => Ok(DeviceClass::SrvSynergy),
        "STORAGE" => Ok(DeviceClass::Storage),
        "LIB" => Ok(DeviceClass::Lib),
        "SWITCH" => Ok(DeviceClass::Switch),
        "VC" => Ok(DeviceClass::Vc),
        "UNKNOWN" => Ok(DeviceClass::Unknown),
        other => Err(other.to_string()),
    }
}

/// Extracts the vendor OUI from a colon-separated WWN.
///
/// NAA-1/2 WWNs (`1x:` / `2x:`) carry the OUI in octets 3-5. NAA-5/6 WWNs
/// pack it into the 24 bits after the leading nibble, shifted by 4 bits.
fn extract_oui(wwn: &str) -> Option<String> {
    let octets: Vec<&str> = wwn.trim().split(':').collect();
    if octets.len() != 8 || octets.iter().any(|o| o.len() != 2) {
        return None;
    }
    let first = u8::from_str_radix(octets[0], 16).ok()?;
    match first >> 4 {
        1 | 2 => Some(
            format!("{}:{}:{}", octets[2], octets[3], octets[4]).to_ascii_lowercase(),
        ),
        5 | 6 => {
            let hex: String = octets.iter().flat_map(|o| o.chars()).collect();
            let nibbles = &hex[1..7];
            let bytes: Vec<String> = nibbles
                .as_bytes()
                .chunks(2)
                .map(|c| String::from_utf8_lossy(c).to_ascii_lowercase())
                .collect();
            Some(bytes.join(":"))
        }
        _ => None,
    }
}
