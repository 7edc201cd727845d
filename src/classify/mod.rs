//! Device classification.
//!
//! Assigns each connected port a device class from the fixed vocabulary
//! (SRV, SRV_BLADE, SRV_SYNERGY, STORAGE, LIB, SWITCH, VC, UNKNOWN) using a
//! priority-ordered rule cascade over OUI lookup, decoded descriptor
//! evidence, port type, and adjacency. The cascade is order-sensitive:
//! rules are evaluated top to bottom and the first match wins, so ambiguous
//! OUIs resolve deterministically.

pub mod oui;

pub use oui::{OuiEntry, OuiTable};

use crate::decode::DescriptorDecodeResult;
use crate::inputs::{EnclosureInventory, EnclosureKind};
use crate::models::{Classification, DeviceClass, PortType};

/// Everything the cascade may consult for one connected port.
pub struct ClassifierInput<'a> {
    /// WWN logged in at the port, when any.
    pub connected_wwn: Option<&'a str>,
    /// Decoded symbolic descriptor evidence.
    pub decode: &'a DescriptorDecodeResult,
    /// Local port type.
    pub port_type: PortType,
    /// True when the port state is Online.
    pub online: bool,
    /// True when the remote side is a switch in access-gateway mode.
    pub remote_is_access_gateway: bool,
    /// True for a trunk-member F-port whose device logs in via the master.
    pub trunk_slave: bool,
    /// OUI lookup table.
    pub oui_table: &'a OuiTable,
    /// Enclosure/blade inventory.
    pub enclosures: &'a EnclosureInventory,
}

// Model-string hints used to split the storage-or-library ambiguous OUIs.
const LIBRARY_HINTS: &[&str] = &["ULT", "LTO", "TAPE", "MSL", "TS11", "TS21", "SCALAR", "DRIVE"];
const ARRAY_HINTS: &[&str] = &["SYMMETRIX", "VPLEX", "VNX", "FA-", "3PAR", "PRIMERA", "EVA", "XP"];

/// Classifies one connected port.
///
/// Returns `None` (no classification, distinct from UNKNOWN) only for
/// trunk-slave F-ports with no login, which are excluded from device counts
/// upstream.
pub fn classify(input: &ClassifierInput<'_>) -> Option<Classification> {
    // Rule 1: enclosure-embedded WWN
    if let Some(wwn) = input.connected_wwn {
        if let Some(entry) = input.enclosures.lookup(wwn) {
            let class = match entry.kind {
                EnclosureKind::Blade => DeviceClass::SrvBlade,
                EnclosureKind::Synergy => DeviceClass::SrvSynergy,
                EnclosureKind::Vc => DeviceClass::Vc,
            };
            return Some(Classification {
                class,
                subtype: Some(format!("{}/{}", entry.enclosure, entry.bay)),
            });
        }
    }

    let oui = input.connected_wwn.and_then(|wwn| input.oui_table.lookup(wwn));

    // Rule 2: unambiguous OUI
    if let Some(entry) = oui {
        if let Some(class) = entry.unambiguous() {
            return Some(Classification {
                class,
                subtype: Some(entry.vendor.clone()),
            });
        }
    }

    // Rule 3: ambiguous OUI, disambiguated by port type / adjacency / model
    if let Some(entry) = oui {
        if let Some(classification) = disambiguate(input, entry) {
            return Some(classification);
        }
    }

    // Rule 5 (checked here because it is the only rule for login-less
    // ports): trunk-slave F-port, device rides on the master
    if input.connected_wwn.is_none() && input.trunk_slave && input.port_type == PortType::F {
        return None;
    }

    // Rule 4: online F/N-port with no derivable class
    if input.online
        && matches!(input.port_type, PortType::F | PortType::N)
        && input.connected_wwn.is_some()
    {
        return Some(Classification::bare(DeviceClass::Unknown));
    }

    None
}

/// The hand-ordered sub-rules for ambiguous OUI groups.
fn disambiguate(input: &ClassifierInput<'_>, entry: &OuiEntry) -> Option<Classification> {
    let could_be = |class: DeviceClass| entry.classes.contains(&class);

    // E-port: the remote end is another switch, whatever else the vendor sells
    if could_be(DeviceClass::Switch) && input.port_type == PortType::E {
        return Some(Classification {
            class: DeviceClass::Switch,
            subtype: Some(entry.vendor.clone()),
        });
    }

    // Access-gateway uplink: N-port login from a switch-capable OUI
    if could_be(DeviceClass::Switch)
        && input.port_type == PortType::N
        && input.remote_is_access_gateway
    {
        return Some(Classification {
            class: DeviceClass::Switch,
            subtype: Some("access-gateway".into()),
        });
    }

    let model_text = model_evidence(input.decode);

    if could_be(DeviceClass::Lib) && has_hint(&model_text, LIBRARY_HINTS) {
        return Some(Classification {
            class: DeviceClass::Lib,
            subtype: input.decode.model.clone(),
        });
    }

    if could_be(DeviceClass::Storage)
        && (has_hint(&model_text, ARRAY_HINTS) || input.decode.serial.is_some())
    {
        return Some(Classification {
            class: DeviceClass::Storage,
            subtype: input.decode.model.clone(),
        });
    }

    // HBA inventory in the descriptor marks a plain server login
    if could_be(DeviceClass::Srv) && (input.decode.driver.is_some() || input.decode.host_name.is_some())
    {
        return Some(Classification {
            class: DeviceClass::Srv,
            subtype: Some(entry.vendor.clone()),
        });
    }

    None
}

fn model_evidence(decode: &DescriptorDecodeResult) -> String {
    let mut text = String::new();
    for field in [&decode.model, &decode.device_name, &decode.device_port] {
        if let Some(value) = field {
            text.push_str(&value.to_ascii_uppercase());
            text.push(' ');
        }
    }
    text
}

fn has_hint(text: &str, hints: &[&str]) -> bool {
    hints.iter().any(|h| text.contains(h))
}
