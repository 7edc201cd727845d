//! Section descriptors: one per supported diagnostic command.
//!
//! A `SectionDescriptor` specifies how to find a command's output inside a
//! dump (start/end marker patterns) and how to extract fields from the lines
//! inside it (an ordered line-pattern set). Pattern order within a section
//! is a fixed priority: the scanner takes the first match, not the longest
//! one, so more specific patterns must be listed before generic ones.
//!
//! The registry is compiled once per process. Sections the pipeline needs
//! must be registered here before parsing begins; the scanner makes a
//! single forward pass and never rewinds.

use once_cell::sync::Lazy;
use regex::Regex;

/// Section name for `switchshow`.
pub const SECTION_SWITCHSHOW: &str = "switchshow";
/// Section name for `chassisshow`.
pub const SECTION_CHASSISSHOW: &str = "chassisshow";
/// Section name for `fabricshow`.
pub const SECTION_FABRICSHOW: &str = "fabricshow";
/// Section name for `nsshow`.
pub const SECTION_NSSHOW: &str = "nsshow";
/// Section name for `fdmishow`.
pub const SECTION_FDMISHOW: &str = "fdmishow";
/// Section name for `islshow`.
pub const SECTION_ISLSHOW: &str = "islshow";
/// Section name for `trunkshow`.
pub const SECTION_TRUNKSHOW: &str = "trunkshow";
/// Section name for `sfpshow`.
pub const SECTION_SFPSHOW: &str = "sfpshow";
/// Section name for `portcfgshow`.
pub const SECTION_PORTCFGSHOW: &str = "portcfgshow";
/// Section name for `agshow`.
pub const SECTION_AGSHOW: &str = "agshow";
/// Section name for `alishow`.
pub const SECTION_ALISHOW: &str = "alishow";

/// How a matched line contributes to the section's records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Merge the captured fields into the section-level header record.
    Header,
    /// Begin a new record with the captured fields.
    Start,
    /// Merge the captured fields into the current record.
    Continue,
}

/// One (pattern, field-names) pair of a section's line-pattern set.
pub struct LinePattern {
    /// How a match contributes to records.
    pub kind: PatternKind,
    /// Pattern applied to each line; capture groups map onto `fields`.
    pub regex: Regex,
    /// Field name for each capture group, in order. Empty names skip the group.
    pub fields: &'static [&'static str],
    /// Constant fields set whenever this pattern matches.
    pub consts: &'static [(&'static str, &'static str)],
}

impl LinePattern {
    fn new(kind: PatternKind, pattern: &str, fields: &'static [&'static str]) -> LinePattern {
        LinePattern {
            kind,
            regex: Regex::new(pattern).expect("invalid section line pattern"),
            fields,
            consts: &[],
        }
    }

    fn with_consts(
        kind: PatternKind,
        pattern: &str,
        fields: &'static [&'static str],
        consts: &'static [(&'static str, &'static str)],
    ) -> LinePattern {
        LinePattern {
            kind,
            regex: Regex::new(pattern).expect("invalid section line pattern"),
            fields,
            consts,
        }
    }
}

/// Descriptor for one supported command section.
pub struct SectionDescriptor {
    /// Section name (also the key of the parse result map).
    pub name: &'static str,
    /// Start-marker pattern.
    pub start: Regex,
    /// End-marker pattern; `None` uses the generic command boundary.
    pub end: Option<Regex>,
    /// Mandatory sections get a `present=false` flag and a warning when absent.
    pub mandatory: bool,
    /// Ordered line-pattern set; first match wins.
    pub patterns: Vec<LinePattern>,
}

/// Matches the vendor-emitted command boundary that terminates any section.
pub static GENERIC_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\*\* SS CMD END \*\*").expect("invalid boundary pattern"));

/// Matches a logical-switch context banner: `CURRENT CONTEXT -- <index>, FID <fid>`.
///
/// Virtual-fabric dumps repeat this banner per command, so the scanner
/// re-checks it for every section rather than once per file.
pub static CONTEXT_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^CURRENT CONTEXT -- (\d+), FID (\d+)").expect("invalid context pattern")
});

fn start_marker(command: &str) -> Regex {
    Regex::new(&format!(r"^\*\* SS CMD START \*\* {}\s*$", command))
        .expect("invalid start marker pattern")
}

const WWN: &str = r"(?:[0-9a-fA-F]{2}:){7}[0-9a-fA-F]{2}";

/// The full Section Descriptor table, compiled once.
pub static SECTION_DESCRIPTORS: Lazy<Vec<SectionDescriptor>> = Lazy::new(|| {
    vec![
        switchshow(),
        chassisshow(),
        fabricshow(),
        nsshow(),
        fdmishow(),
        islshow(),
        trunkshow(),
        sfpshow(),
        portcfgshow(),
        agshow(),
        alishow(),
    ]
});

fn switchshow() -> SectionDescriptor {
    SectionDescriptor {
        name: SECTION_SWITCHSHOW,
        start: start_marker("switchshow"),
        end: None,
        mandatory: true,
        patterns: vec![
            LinePattern::new(
                PatternKind::Header,
                r"^switchName:\s*(\S+)",
                &["switch_name"],
            ),
            LinePattern::new(
                PatternKind::Header,
                r"^switchType:\s*(\d+)\.(\d+)",
                &["switch_model", "switch_rev"],
            ),
            LinePattern::new(
                PatternKind::Header,
                r"^switchState:\s*(\S+)",
                &["switch_state"],
            ),
            LinePattern::new(
                PatternKind::Header,
                r"^switchMode:\s*(.+?)\s*$",
                &["switch_mode"],
            ),
            LinePattern::new(
                PatternKind::Header,
                r"^switchRole:\s*(\S+)",
                &["switch_role"],
            ),
            LinePattern::new(
                PatternKind::Header,
                r"^switchDomain:\s*(\d+)",
                &["switch_domain"],
            ),
            LinePattern::new(
                PatternKind::Header,
                &format!(r"^switchWwn:\s*({})", WWN),
                &["switch_wwn"],
            ),
            // Bladed / virtual-fabric port line: index slot port address media speed state proto type [peer...]
            LinePattern::new(
                PatternKind::Start,
                &format!(
                    r"^\s*(\d+)\s+(\d+)\s+(\d+)\s+([0-9a-fA-F]{{6}})\s+(\S+)\s+(\S+)\s+(\S+)\s+FC\s+(\S+-Port)(?:\s+({}))?(?:\s+(.*))?$",
                    WWN
                ),
                &[
                    "port_index",
                    "slot",
                    "port",
                    "fc_address",
                    "media",
                    "speed",
                    "state",
                    "port_type",
                    "peer_wwn",
                    "extra",
                ],
            ),
            // Fixed-port line: index port address media speed state proto type [peer...]
            LinePattern::with_consts(
                PatternKind::Start,
                &format!(
                    r"^\s*(\d+)\s+(\d+)\s+([0-9a-fA-F]{{6}})\s+(\S+)\s+(\S+)\s+(\S+)\s+FC\s+(\S+-Port)(?:\s+({}))?(?:\s+(.*))?$",
                    WWN
                ),
                &[
                    "port_index",
                    "port",
                    "fc_address",
                    "media",
                    "speed",
                    "state",
                    "port_type",
                    "peer_wwn",
                    "extra",
                ],
                &[("slot", "0")],
            ),
            // Unconnected port line: no proto/type columns yet
            LinePattern::new(
                PatternKind::Start,
                r"^\s*(\d+)\s+(\d+)\s+(\d+)\s+([0-9a-fA-F]{6})\s+(\S+)\s+(\S+)\s+(\S+)\s*$",
                &[
                    "port_index",
                    "slot",
                    "port",
                    "fc_address",
                    "media",
                    "speed",
                    "state",
                ],
            ),
            LinePattern::with_consts(
                PatternKind::Start,
                r"^\s*(\d+)\s+(\d+)\s+([0-9a-fA-F]{6})\s+(\S+)\s+(\S+)\s+(\S+)\s*$",
                &["port_index", "port", "fc_address", "media", "speed", "state"],
                &[("slot", "0")],
            ),
        ],
    }
}

fn chassisshow() -> SectionDescriptor {
    SectionDescriptor {
        name: SECTION_CHASSISSHOW,
        start: start_marker("chassisshow"),
        end: None,
        mandatory: false,
        patterns: vec![
            LinePattern::new(
                PatternKind::Header,
                r"^Chassis Name:\s*(\S+)",
                &["chassis_name"],
            ),
            LinePattern::new(
                PatternKind::Header,
                &format!(r"^Chassis WWN:\s*({})", WWN),
                &["chassis_wwn"],
            ),
            LinePattern::new(
                PatternKind::Header,
                r"^Chassis Factory Serial Num:\s*(\S+)",
                &["chassis_serial"],
            ),
        ],
    }
}

fn fabricshow() -> SectionDescriptor {
    SectionDescriptor {
        name: SECTION_FABRICSHOW,
        start: start_marker("fabricshow"),
        end: None,
        mandatory: false,
        patterns: vec![LinePattern::new(
            PatternKind::Start,
            &format!(
                r#"^\s*(\d+):\s+(\w{{6}})\s+({})\s+(\S+)\s+(\S+)\s+(>?)"(.+)"\s*$"#,
                WWN
            ),
            &[
                "domain",
                "embedded_pid",
                "member_wwn",
                "enet_ip",
                "fc_ip",
                "principal",
                "member_name",
            ],
        )],
    }
}

fn nsshow() -> SectionDescriptor {
    SectionDescriptor {
        name: SECTION_NSSHOW,
        start: start_marker("nsshow"),
        end: None,
        mandatory: true,
        patterns: vec![
            LinePattern::new(
                PatternKind::Start,
                &format!(
                    r"^\s*(N|NL|U)\s+([0-9a-fA-F]{{6}});\s*(\d+);\s*({});\s*({});",
                    WWN, WWN
                ),
                &["ns_type", "fc_address", "cos", "port_wwn", "node_wwn"],
            ),
            LinePattern::new(
                PatternKind::Continue,
                r#"^\s*PortSymb:\s*\[\d+\]\s*"(.*)"\s*$"#,
                &["port_symb"],
            ),
            LinePattern::new(
                PatternKind::Continue,
                r#"^\s*NodeSymb:\s*\[\d+\]\s*"(.*)"\s*$"#,
                &["node_symb"],
            ),
            LinePattern::new(
                PatternKind::Continue,
                &format!(r"^\s*Fabric Port Name:\s*({})", WWN),
                &["fabric_port_name"],
            ),
            LinePattern::new(
                PatternKind::Continue,
                &format!(r"^\s*Permanent Port Name:\s*({})", WWN),
                &["permanent_port_name"],
            ),
            LinePattern::new(
                PatternKind::Continue,
                r"^\s*Device type:\s*(.+?)\s*$",
                &["device_type"],
            ),
            LinePattern::new(
                PatternKind::Continue,
                r"^\s*Port Index:\s*(\d+)",
                &["port_index"],
            ),
        ],
    }
}

fn fdmishow() -> SectionDescriptor {
    SectionDescriptor {
        name: SECTION_FDMISHOW,
        start: start_marker("fdmishow"),
        end: None,
        mandatory: false,
        patterns: vec![
            LinePattern::new(
                PatternKind::Start,
                &format!(r"^\s*HBA:\s*({})", WWN),
                &["hba_wwn"],
            ),
            LinePattern::new(
                PatternKind::Continue,
                &format!(r"^\s*Port:\s*({})", WWN),
                &["port_wwn"],
            ),
            LinePattern::new(
                PatternKind::Continue,
                r"^\s*Manufacturer:\s*(.+?)\s*$",
                &["manufacturer"],
            ),
            LinePattern::new(PatternKind::Continue, r"^\s*Model:\s*(.+?)\s*$", &["model"]),
            LinePattern::new(
                PatternKind::Continue,
                r"^\s*Serial Number:\s*(\S+)",
                &["serial"],
            ),
            LinePattern::new(
                PatternKind::Continue,
                r"^\s*Firmware Version:\s*(\S+)",
                &["firmware"],
            ),
            LinePattern::new(
                PatternKind::Continue,
                r"^\s*Host Name:\s*(\S+)",
                &["host_name"],
            ),
        ],
    }
}

fn islshow() -> SectionDescriptor {
    SectionDescriptor {
        name: SECTION_ISLSHOW,
        start: start_marker("islshow"),
        end: None,
        mandatory: false,
        patterns: vec![LinePattern::new(
            PatternKind::Start,
            &format!(
                r"^\s*(\d+):\s*(\d+)->\s*(\d+)\s+({})\s+(\d+)\s+(\S+)\s+sp:\s*([\d.]+)G\s+bw:\s*([\d.]+)G(?:\s+(.*))?$",
                WWN
            ),
            &[
                "isl_id",
                "local_port",
                "remote_port",
                "remote_wwn",
                "remote_domain",
                "remote_name",
                "speed",
                "bandwidth",
                "flags",
            ],
        )],
    }
}

fn trunkshow() -> SectionDescriptor {
    SectionDescriptor {
        name: SECTION_TRUNKSHOW,
        start: start_marker("trunkshow"),
        end: None,
        mandatory: false,
        patterns: vec![
            // Master line carries the trunk group id; member lines do not,
            // their group id is forward-filled during aggregation.
            LinePattern::with_consts(
                PatternKind::Start,
                &format!(
                    r"^\s*(\d+):\s*(\d+)->\s*(\d+)\s+({})\s+(\d+)\s+deskew\s+(\d+)\s+MASTER\s*$",
                    WWN
                ),
                &[
                    "trunk_id",
                    "local_port",
                    "remote_port",
                    "remote_wwn",
                    "remote_domain",
                    "deskew",
                ],
                &[("master", "1")],
            ),
            LinePattern::with_consts(
                PatternKind::Start,
                &format!(
                    r"^\s*(\d+)->\s*(\d+)\s+({})\s+(\d+)\s+deskew\s+(\d+)\s*$",
                    WWN
                ),
                &[
                    "local_port",
                    "remote_port",
                    "remote_wwn",
                    "remote_domain",
                    "deskew",
                ],
                &[("master", "0")],
            ),
        ],
    }
}

fn sfpshow() -> SectionDescriptor {
    SectionDescriptor {
        name: SECTION_SFPSHOW,
        start: start_marker("sfpshow"),
        end: None,
        mandatory: false,
        patterns: vec![
            LinePattern::new(
                PatternKind::Start,
                r"^Slot\s+(\d+)/Port\s+(\d+):",
                &["slot", "port"],
            ),
            LinePattern::with_consts(
                PatternKind::Start,
                r"^Port\s+(\d+):",
                &["port"],
                &[("slot", "0")],
            ),
            LinePattern::new(
                PatternKind::Continue,
                r"^\s*Speed:\s*(\S+?)_Gbps",
                &["speed_caps"],
            ),
            LinePattern::new(
                PatternKind::Continue,
                r"^\s*RX Power:\s*(-?[\d.]+)\s*dBm\s*\(([\d.]+)\s*uW\)",
                &["rx_power_dbm", "rx_power_uw"],
            ),
            LinePattern::new(
                PatternKind::Continue,
                r"^\s*TX Power:\s*(-?[\d.]+)\s*dBm\s*\(([\d.]+)\s*uW\)",
                &["tx_power_dbm", "tx_power_uw"],
            ),
        ],
    }
}

fn portcfgshow() -> SectionDescriptor {
    SectionDescriptor {
        name: SECTION_PORTCFGSHOW,
        start: start_marker("portcfgshow"),
        end: None,
        mandatory: false,
        patterns: vec![
            LinePattern::new(
                PatternKind::Start,
                r"^Slot\s+(\d+)/Port\s+(\d+):",
                &["slot", "port"],
            ),
            LinePattern::with_consts(
                PatternKind::Start,
                r"^Port\s+(\d+):",
                &["port"],
                &[("slot", "0")],
            ),
            LinePattern::new(
                PatternKind::Continue,
                r"^\s*Trunk Port:\s*(ON|OFF)",
                &["trunk_port"],
            ),
            LinePattern::new(
                PatternKind::Continue,
                r"^\s*Speed:\s*(\S+)",
                &["cfg_speed"],
            ),
        ],
    }
}

fn agshow() -> SectionDescriptor {
    SectionDescriptor {
        name: SECTION_AGSHOW,
        start: start_marker("agshow"),
        end: None,
        mandatory: false,
        patterns: vec![LinePattern::new(
            PatternKind::Start,
            &format!(
                r"^\s*(\S+)\s+(\d+)\s+(\S+)\s+(\S+)\s+(local|remote)\s+({})\s*$",
                WWN
            ),
            &[
                "ag_name",
                "ag_ports",
                "ag_ip",
                "ag_firmware",
                "locality",
                "ag_wwn",
            ],
        )],
    }
}

fn alishow() -> SectionDescriptor {
    SectionDescriptor {
        name: SECTION_ALISHOW,
        start: start_marker("alishow"),
        end: None,
        mandatory: false,
        patterns: vec![
            LinePattern::new(PatternKind::Start, r"^\s*alias:\s*(\S+)", &["alias"]),
            LinePattern::new(
                PatternKind::Continue,
                &format!(r"^\s*({})\s*$", WWN),
                &["member_wwn"],
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_compiles_and_names_are_unique() {
        let mut names: Vec<&str> = SECTION_DESCRIPTORS.iter().map(|d| d.name).collect();
        let before = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), before, "duplicate section names in registry");
    }

    #[test]
    fn test_mandatory_sections() {
        let mandatory: Vec<&str> = SECTION_DESCRIPTORS
            .iter()
            .filter(|d| d.mandatory)
            .map(|d| d.name)
            .collect();
        assert_eq!(mandatory, vec![SECTION_SWITCHSHOW, SECTION_NSSHOW]);
    }

    #[test]
    fn test_start_marker_matches() {
        let d = SECTION_DESCRIPTORS
            .iter()
            .find(|d| d.name == SECTION_SWITCHSHOW)
            .unwrap();
        assert!(d.start.is_match("** SS CMD START ** switchshow"));
        assert!(!d.start.is_match("** SS CMD START ** switchshow_iscsi"));
        assert!(!d.start.is_match("** SS CMD START ** nsshow"));
    }

    #[test]
    fn test_context_marker_captures_index() {
        let caps = CONTEXT_MARKER
            .captures("CURRENT CONTEXT -- 1, FID 20")
            .unwrap();
        assert_eq!(&caps[1], "1");
        assert_eq!(&caps[2], "20");
    }

    #[test]
    fn test_switchshow_bladed_port_line() {
        let d = SECTION_DESCRIPTORS
            .iter()
            .find(|d| d.name == SECTION_SWITCHSHOW)
            .unwrap();
        let line = " 12    1   12   010c00   id    N16   Online      FC  F-Port  10:00:00:10:9b:1a:2b:3c";
        // Bladed pattern must win before the fixed-port pattern
        let matched = d
            .patterns
            .iter()
            .find(|p| p.regex.is_match(line))
            .expect("port line should match");
        assert_eq!(matched.fields[1], "slot");
        let caps = matched.regex.captures(line).unwrap();
        assert_eq!(caps.get(2).unwrap().as_str(), "1");
        assert_eq!(caps.get(4).unwrap().as_str(), "010c00");
        assert_eq!(caps.get(5).unwrap().as_str(), "id");
    }

    #[test]
    fn test_switchshow_fixed_port_line_sets_slot_zero() {
        let d = SECTION_DESCRIPTORS
            .iter()
            .find(|d| d.name == SECTION_SWITCHSHOW)
            .unwrap();
        let line = "  5    5   010500   id    N32   Online      FC  E-Port  10:00:00:05:1e:04:05:06 \"SW_CORE\"";
        let matched = d
            .patterns
            .iter()
            .find(|p| p.regex.is_match(line))
            .expect("fixed-port line should match");
        assert_eq!(matched.consts, &[("slot", "0")]);
    }

    #[test]
    fn test_nsshow_block_patterns() {
        let d = SECTION_DESCRIPTORS
            .iter()
            .find(|d| d.name == SECTION_NSSHOW)
            .unwrap();
        let start = " N    010c00;      3;10:00:00:10:9b:1a:2b:3c;20:00:00:10:9b:1a:2b:3c; na";
        let p = &d.patterns[0];
        assert_eq!(p.kind, PatternKind::Start);
        let caps = p.regex.captures(start).expect("ns start line should match");
        assert_eq!(caps.get(4).unwrap().as_str(), "10:00:00:10:9b:1a:2b:3c");

        let symb = r#"    PortSymb: [35] "Emulex LPe32002-M2 FV12.8 DV14.0""#;
        assert!(d.patterns.iter().any(|p| p.regex.is_match(symb)));
    }

    #[test]
    fn test_islshow_line() {
        let d = SECTION_DESCRIPTORS
            .iter()
            .find(|d| d.name == SECTION_ISLSHOW)
            .unwrap();
        let line = "  1:  12->  36 10:00:00:05:1e:04:05:06   2 SW_CORE sp:  16.000G  bw:  32.000G  TRUNK QOS";
        let caps = d.patterns[0]
            .regex
            .captures(line)
            .expect("isl line should match");
        assert_eq!(caps.get(2).unwrap().as_str(), "12");
        assert_eq!(caps.get(7).unwrap().as_str(), "16.000");
        assert_eq!(caps.get(9).unwrap().as_str(), "TRUNK QOS");
    }

    #[test]
    fn test_trunkshow_master_and_member_lines() {
        let d = SECTION_DESCRIPTORS
            .iter()
            .find(|d| d.name == SECTION_TRUNKSHOW)
            .unwrap();
        let master = "  1: 12-> 36 10:00:00:05:1e:04:05:06   2 deskew 15 MASTER";
        let member = "     13-> 37 10:00:00:05:1e:04:05:06   2 deskew 16";
        assert!(d.patterns[0].regex.is_match(master));
        assert!(!d.patterns[0].regex.is_match(member));
        assert!(d.patterns[1].regex.is_match(member));
        assert!(!d.patterns[1].regex.is_match(master));
    }

    #[test]
    fn test_sfpshow_power_lines() {
        let d = SECTION_DESCRIPTORS
            .iter()
            .find(|d| d.name == SECTION_SFPSHOW)
            .unwrap();
        let rx = "      RX Power: -3.1 dBm (489.8 uW)";
        let matched = d.patterns.iter().find(|p| p.regex.is_match(rx)).unwrap();
        let caps = matched.regex.captures(rx).unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "-3.1");
        assert_eq!(caps.get(2).unwrap().as_str(), "489.8");
    }

    #[test]
    fn test_fabricshow_principal_flag() {
        let d = SECTION_DESCRIPTORS
            .iter()
            .find(|d| d.name == SECTION_FABRICSHOW)
            .unwrap();
        let line = r#"  1: fffc01 10:00:00:05:1e:01:02:03 10.1.1.1        0.0.0.0        >"SW_PROD_A1""#;
        let caps = d.patterns[0].regex.captures(line).unwrap();
        assert_eq!(caps.get(6).unwrap().as_str(), ">");
        assert_eq!(caps.get(7).unwrap().as_str(), "SW_PROD_A1");
    }
}
