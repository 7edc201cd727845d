//! Vendor descriptor format recognizers.
//!
//! Each known vendor format is a pure function of the node symbolic string,
//! paired with a (possibly empty) port-string pass that fills in remaining
//! fields. The cascade order is significant and encodes precedence:
//! structured, disambiguating formats come before generic catch-alls.
//! Reordering the cascade is a behavior change, not a refactor.

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::DescriptorDecodeResult;

/// One recognized vendor format: a node recognizer plus the fixed
/// port-string pass used when this format wins.
pub struct NodeFormat {
    /// Short format name, for decode diagnostics.
    pub name: &'static str,
    /// Node-string recognizer; `Some` fixes the format.
    pub node: fn(&str) -> Option<DescriptorDecodeResult>,
    /// Port-string pass for this format; returns true when it consumed the
    /// port string.
    pub port: fn(&mut DescriptorDecodeResult, &str) -> bool,
}

/// The ordered recognizer cascade.
pub static NODE_FORMATS: Lazy<Vec<NodeFormat>> = Lazy::new(|| {
    vec![
        NodeFormat {
            name: "symmetrix",
            node: node_symmetrix,
            port: port_none,
        },
        NodeFormat {
            name: "vplex",
            node: node_vplex,
            port: port_none,
        },
        NodeFormat {
            name: "tape-library",
            node: node_tape_library,
            port: port_none,
        },
        NodeFormat {
            name: "array-controller",
            node: node_array_controller,
            port: port_array_location,
        },
        NodeFormat {
            name: "cna",
            node: node_cna,
            port: port_host_info,
        },
        NodeFormat {
            name: "hba",
            node: node_hba,
            port: port_host_info,
        },
        NodeFormat {
            name: "host-info",
            node: node_host_info,
            port: port_none,
        },
    ]
});

// --- node recognizers ---

static SYMMETRIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^SYMMETRIX::(\S+)::(\S+)").expect("invalid pattern"));

fn node_symmetrix(node: &str) -> Option<DescriptorDecodeResult> {
    let caps = SYMMETRIX.captures(node)?;
    Some(DescriptorDecodeResult {
        manufacturer: Some("EMC".into()),
        model: Some("SYMMETRIX".into()),
        serial: Some(caps[1].to_string()),
        location: Some(caps[2].to_string()),
        node_used: true,
        ..Default::default()
    })
}

static VPLEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^VPLEX\s+(\S+)\s+(director-\S+)").expect("invalid pattern"));

fn node_vplex(node: &str) -> Option<DescriptorDecodeResult> {
    let caps = VPLEX.captures(node)?;
    Some(DescriptorDecodeResult {
        manufacturer: Some("EMC".into()),
        model: Some(format!("VPLEX {}", &caps[1])),
        location: Some(caps[2].to_string()),
        node_used: true,
        ..Default::default()
    })
}

// Tape libraries report a fixed-width triple: vendor, model, serial,
// separated by runs of two or more spaces.
static TAPE_LIBRARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(IBM|HP|QUANTUM|STK)\s{2,}(\S[\S ]*?\S|\S)\s{2,}(\S+)\s*$")
        .expect("invalid pattern")
});

fn node_tape_library(node: &str) -> Option<DescriptorDecodeResult> {
    let caps = TAPE_LIBRARY.captures(node)?;
    Some(DescriptorDecodeResult {
        manufacturer: Some(caps[1].to_string()),
        model: Some(caps[2].to_string()),
        serial: Some(caps[3].to_string()),
        node_used: true,
        ..Default::default()
    })
}

static ARRAY_CONTROLLER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][\w-]*)\s+([\w-]+)\s+SN:(\S+)(?:\s+FW:(\S+))?\s*$")
        .expect("invalid pattern")
});

fn node_array_controller(node: &str) -> Option<DescriptorDecodeResult> {
    let caps = ARRAY_CONTROLLER.captures(node)?;
    Some(DescriptorDecodeResult {
        manufacturer: Some(caps[1].to_string()),
        model: Some(caps[2].to_string()),
        serial: Some(caps[3].to_string()),
        firmware: caps.get(4).map(|m| m.as_str().to_string()),
        node_used: true,
        ..Default::default()
    })
}

static CNA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(Emulex|QLogic|Brocade)\s+(\S+)\s+CNA\s+FV(\S+)\s+DV(\S+)")
        .expect("invalid pattern")
});

fn node_cna(node: &str) -> Option<DescriptorDecodeResult> {
    let caps = CNA.captures(node)?;
    let mut result = DescriptorDecodeResult {
        manufacturer: Some(caps[1].to_string()),
        model: Some(format!("{} CNA", &caps[2])),
        firmware: Some(caps[3].to_string()),
        driver: Some(caps[4].to_string()),
        node_used: true,
        ..Default::default()
    };
    extract_host_info(&mut result, node);
    Some(result)
}

static HBA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(Emulex|QLogic|Brocade)\s+(\S+)\s+FV(\S+)\s+DV(\S+)").expect("invalid pattern")
});

fn node_hba(node: &str) -> Option<DescriptorDecodeResult> {
    let caps = HBA.captures(node)?;
    let mut result = DescriptorDecodeResult {
        manufacturer: Some(caps[1].to_string()),
        model: Some(caps[2].to_string()),
        firmware: Some(caps[3].to_string()),
        driver: Some(caps[4].to_string()),
        node_used: true,
        ..Default::default()
    };
    extract_host_info(&mut result, node);
    Some(result)
}

static HOST_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bHN:(\S+)").expect("invalid pattern"));
static HOST_OS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bOS:(\S[\S ]*?)\s*$").expect("invalid pattern"));

fn node_host_info(node: &str) -> Option<DescriptorDecodeResult> {
    let mut result = DescriptorDecodeResult::default();
    if !extract_host_info(&mut result, node) {
        return None;
    }
    result.node_used = true;
    Some(result)
}

fn extract_host_info(result: &mut DescriptorDecodeResult, text: &str) -> bool {
    let mut any = false;
    if result.host_name.is_none() {
        if let Some(caps) = HOST_NAME.captures(text) {
            result.host_name = Some(caps[1].to_string());
            any = true;
        }
    }
    if result.host_os.is_none() {
        if let Some(caps) = HOST_OS.captures(text) {
            result.host_os = Some(caps[1].to_string());
            any = true;
        }
    }
    any
}

// --- port-string passes ---

fn port_none(_result: &mut DescriptorDecodeResult, _port: &str) -> bool {
    false
}

/// HBA/CNA port strings repeat the adapter inventory and often carry the
/// host fields the node string lacked.
fn port_host_info(result: &mut DescriptorDecodeResult, port: &str) -> bool {
    extract_host_info(result, port)
}

static ARRAY_PORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][\w-]*\s+[\w-]+\s+(\S+(?:\s+\S+)?)\s*$").expect("invalid pattern")
});

/// Array port strings repeat vendor/model and append the controller port
/// location (e.g. "CT0.FC1").
fn port_array_location(result: &mut DescriptorDecodeResult, port: &str) -> bool {
    if result.location.is_some() {
        return false;
    }
    match ARRAY_PORT.captures(port) {
        Some(caps) => {
            result.location = Some(caps[1].to_string());
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_controller_with_firmware() {
        let r = node_array_controller("ACME X1 SN:S123 FW:5.3.1").unwrap();
        assert_eq!(r.manufacturer.as_deref(), Some("ACME"));
        assert_eq!(r.model.as_deref(), Some("X1"));
        assert_eq!(r.serial.as_deref(), Some("S123"));
        assert_eq!(r.firmware.as_deref(), Some("5.3.1"));
        assert!(r.node_used);
    }

    #[test]
    fn test_array_controller_without_firmware() {
        let r = node_array_controller("ACME X1 SN:S123").unwrap();
        assert_eq!(r.serial.as_deref(), Some("S123"));
        assert_eq!(r.firmware, None);
    }

    #[test]
    fn test_symmetrix() {
        let r = node_symmetrix("SYMMETRIX::000194900123::SAF-7gB").unwrap();
        assert_eq!(r.manufacturer.as_deref(), Some("EMC"));
        assert_eq!(r.serial.as_deref(), Some("000194900123"));
        assert_eq!(r.location.as_deref(), Some("SAF-7gB"));
    }

    #[test]
    fn test_tape_library_fixed_width() {
        let r = node_tape_library("IBM     ULT3580-TD6     1068001234").unwrap();
        assert_eq!(r.manufacturer.as_deref(), Some("IBM"));
        assert_eq!(r.model.as_deref(), Some("ULT3580-TD6"));
        assert_eq!(r.serial.as_deref(), Some("1068001234"));
    }

    #[test]
    fn test_tape_library_rejects_single_spaces() {
        assert!(node_tape_library("IBM ULT3580-TD6 1068001234").is_none());
    }

    #[test]
    fn test_hba_with_host_fields() {
        let r = node_hba("Emulex LPe32002-M2 FV12.8.351.47 DV14.0.326.12 HN:esx-prod-01 OS:VMware ESXi 7.0").unwrap();
        assert_eq!(r.manufacturer.as_deref(), Some("Emulex"));
        assert_eq!(r.model.as_deref(), Some("LPe32002-M2"));
        assert_eq!(r.firmware.as_deref(), Some("12.8.351.47"));
        assert_eq!(r.driver.as_deref(), Some("14.0.326.12"));
        assert_eq!(r.host_name.as_deref(), Some("esx-prod-01"));
        assert_eq!(r.host_os.as_deref(), Some("VMware ESXi 7.0"));
    }

    #[test]
    fn test_cna_wins_over_hba() {
        // The cascade must list the CNA format before the generic HBA one
        let node = "Emulex OCe14102 CNA FV11.2 DV12.0";
        assert!(node_cna(node).is_some());
        let cna_pos = NODE_FORMATS.iter().position(|f| f.name == "cna").unwrap();
        let hba_pos = NODE_FORMATS.iter().position(|f| f.name == "hba").unwrap();
        assert!(cna_pos < hba_pos);
    }

    #[test]
    fn test_bare_host_info() {
        let r = node_host_info("HN:db-host-17 OS:AIX 7.2").unwrap();
        assert_eq!(r.host_name.as_deref(), Some("db-host-17"));
        assert_eq!(r.host_os.as_deref(), Some("AIX 7.2"));
    }

    #[test]
    fn test_port_pass_fills_missing_host_fields() {
        let mut r = node_hba("QLogic QLE2772 FV9.10 DV10.02").unwrap();
        assert_eq!(r.host_name, None);
        assert!(port_host_info(&mut r, "QLogic QLE2772 HN:ora-rac-02 OS:Linux"));
        assert_eq!(r.host_name.as_deref(), Some("ora-rac-02"));
        assert!(r.host_os.as_deref() == Some("Linux"));
    }

    #[test]
    fn test_array_port_location() {
        let mut r = node_array_controller("PURE FA-X70R3 SN:PURE-9912").unwrap();
        assert!(port_array_location(&mut r, "PURE FA-X70R3 CT0.FC1"));
        assert_eq!(r.location.as_deref(), Some("CT0.FC1"));
    }
}
