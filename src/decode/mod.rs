//! Symbolic descriptor decoding.
//!
//! Name-server entries carry two vendor-emitted free-text fields, the port
//! symbolic name and the node symbolic name. Neither has a specified
//! format; each vendor and firmware generation encodes manufacturer, model,
//! serial, firmware and host information its own way. This module recovers
//! those fields through an ordered cascade of format recognizers.

mod recognizers;
mod types;

pub use types::DescriptorDecodeResult;

use recognizers::NODE_FORMATS;

use crate::config::MAX_DESCRIPTOR_LENGTH;

/// Decodes a (port symbolic, node symbolic) descriptor pair.
///
/// Node recognizers are tried in cascade order; the first match fixes the
/// format and selects that format's port-string pass. When no node format
/// matches, the cascade runs again over the port string alone: many
/// name-server rows carry the full inventory in the port symbolic name with
/// an empty or unstructured node string. Only when neither string matches
/// any format are the raw strings copied verbatim into the device-name /
/// device-port fields with both `used` flags false. Pure and idempotent.
pub fn decode_descriptor(port_symb: &str, node_symb: &str) -> DescriptorDecodeResult {
    let port_symb = clamp(port_symb);
    let node_symb = clamp(node_symb);

    for format in NODE_FORMATS.iter() {
        if let Some(mut result) = (format.node)(node_symb) {
            if !port_symb.is_empty() {
                result.port_used = (format.port)(&mut result, port_symb);
            }
            return result;
        }
    }

    for format in NODE_FORMATS.iter() {
        if let Some(mut result) = (format.node)(port_symb) {
            result.node_used = false;
            result.port_used = true;
            if !node_symb.is_empty() {
                result.device_name = Some(node_symb.to_string());
            }
            return result;
        }
    }

    // Best effort, no structure
    let mut result = DescriptorDecodeResult::default();
    if !node_symb.is_empty() {
        result.device_name = Some(node_symb.to_string());
    }
    if !port_symb.is_empty() {
        result.device_port = Some(port_symb.to_string());
    }
    result
}

/// True when the pair should be reported as a decode miss: at least one
/// input was non-empty and no recognizer consumed either string.
pub fn is_decode_miss(port_symb: &str, node_symb: &str, result: &DescriptorDecodeResult) -> bool {
    !result.used() && (!port_symb.trim().is_empty() || !node_symb.trim().is_empty())
}

// Descriptor fields are operator-visible strings from untrusted dumps;
// pathological lengths are truncated before any regex runs.
fn clamp(s: &str) -> &str {
    let s = s.trim();
    if s.len() <= MAX_DESCRIPTOR_LENGTH {
        return s;
    }
    let mut end = MAX_DESCRIPTOR_LENGTH;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
