//! Per-switch derived metrics.

use serde::{Deserialize, Serialize};

use crate::models::{PortRow, SwitchClass};
use crate::parser::descriptor::SECTION_FABRICSHOW;
use crate::utils::ParsedSwitch;

/// Per-switch summary with the N:E ratio metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchSummary {
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
    /// Switch model number, when reported.
    pub switch_model: Option<u32>,
    /// Fabric domain id, from the fabric membership list.
    pub domain: Option<u32>,
    /// True when this switch is the fabric principal.
    pub principal: bool,
    /// Online device-facing (F/N) port count.
    pub f_port_count: usize,
    /// Online inter-switch (E) port count.
    pub e_port_count: usize,
    /// Aggregate device-facing bandwidth in Gb/s.
    pub f_bandwidth_gbps: f64,
    /// Aggregate inter-switch bandwidth in Gb/s.
    pub e_bandwidth_gbps: f64,
    /// N:E port-count ratio, or a degenerate-case sentinel.
    pub ne_port_ratio: String,
    /// N:E bandwidth ratio, or a degenerate-case sentinel.
    pub ne_bandwidth_ratio: String,
}

/// Builds the summary row for one switch from its canonical port rows.
///
/// NPIV duplicate rows are excluded: the ratio describes physical links.
pub fn build_switch_summary(switch: &ParsedSwitch, ports: &[PortRow]) -> SwitchSummary {
    let identity = &switch.dump.identity;
    let wwn = &identity.switch_wwn;

    let own_physical = |p: &&PortRow| {
        &p.switch_wwn == wwn && !p.npiv && p.state.eq_ignore_ascii_case("online")
    };
    let f_ports: Vec<&PortRow> = ports
        .iter()
        .filter(own_physical)
        .filter(|p| p.port_type == "F" || p.port_type == "N")
        .collect();
    let e_ports: Vec<&PortRow> = ports
        .iter()
        .filter(own_physical)
        .filter(|p| p.port_type == "E" || p.port_type == "EX")
        .collect();

    let f_bandwidth: f64 = f_ports.iter().filter_map(|p| p.speed_gbps).sum();
    let e_bandwidth: f64 = e_ports.iter().filter_map(|p| p.speed_gbps).sum();

    // The switch's own entry in the fabric membership list carries its
    // domain id and the principal marker
    let mut domain = None;
    let mut principal = false;
    for record in &switch.dump.section(SECTION_FABRICSHOW).records {
        let own = record
            .get_first("member_wwn")
            .map_or(false, |w| w.eq_ignore_ascii_case(wwn));
        if own {
            domain = record.get_u32("domain");
            principal = record.get_first("principal") == Some(">");
            break;
        }
    }

    SwitchSummary {
        fabric_name: switch.fabric.fabric_name.clone(),
        fabric_label: switch.fabric.fabric_label.clone(),
        chassis_name: identity.chassis_name.clone(),
        switch_name: identity.switch_name.clone(),
        switch_wwn: identity.switch_wwn.clone(),
        switch_model: switch.dump.switch_model,
        domain,
        principal,
        f_port_count: f_ports.len(),
        e_port_count: e_ports.len(),
        f_bandwidth_gbps: f_bandwidth,
        e_bandwidth_gbps: e_bandwidth,
        ne_port_ratio: ratio_label(f_ports.len() as f64, e_ports.len() as f64),
        ne_bandwidth_ratio: ratio_label(f_bandwidth, e_bandwidth),
    }
}

impl SwitchSummary {
    /// Hardware tier of this switch.
    pub fn switch_class(&self) -> SwitchClass {
        SwitchClass::from_model(self.switch_model.unwrap_or(0))
    }
}

/// Labeled N:E ratio with explicit sentinels for the degenerate cases.
/// Never divides by zero.
fn ratio_label(n_side: f64, e_side: f64) -> String {
    match (n_side > 0.0, e_side > 0.0) {
        (false, false) => "No connected ports".to_string(),
        (true, false) => "No E-Ports".to_string(),
        (false, true) => "No F-Ports".to_string(),
        (true, true) => {
            if n_side >= e_side {
                format!("{:.1}:1", n_side / e_side)
            } else {
                format!("1:{:.1}", e_side / n_side)
            }
        }
    }
}
