//! Decoded descriptor result type.

/// Fields recovered from a (port symbolic, node symbolic) descriptor pair.
///
/// `node_used` / `port_used` record which of the two input strings a
/// recognizer actually consumed. A result where neither flag is set and at
/// least one input was non-empty is a decode miss, which the pipeline
/// reports for manual review; empty inputs are expected misses and are not
/// reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorDecodeResult {
    /// Device manufacturer.
    pub manufacturer: Option<String>,
    /// Device model.
    pub model: Option<String>,
    /// Device serial number.
    pub serial: Option<String>,
    /// Firmware version.
    pub firmware: Option<String>,
    /// Driver version (HBA formats).
    pub driver: Option<String>,
    /// Host name.
    pub host_name: Option<String>,
    /// Host operating system.
    pub host_os: Option<String>,
    /// Free-form location detail (e.g. array director/port).
    pub location: Option<String>,
    /// Verbatim device-name fallback when no recognizer matched.
    pub device_name: Option<String>,
    /// Verbatim device-port fallback when no recognizer matched.
    pub device_port: Option<String>,
    /// True when a recognizer consumed the node symbolic string.
    pub node_used: bool,
    /// True when a recognizer consumed the port symbolic string.
    pub port_used: bool,
}

impl DescriptorDecodeResult {
    /// True when at least one input string was structurally decoded.
    pub fn used(&self) -> bool {
        self.node_used || self.port_used
    }
}
