//! Enclosure / blade inventory.
//!
//! Optional CSV supplying embedded-server HBA WWNs and enclosure/bay
//! colocation groups:
//!
//! ```text
//! enclosure,bay,kind,port_wwn
//! ENC-FRAME-01,3,blade,10:00:9c:dc:71:aa:bb:cc
//! ```
//!
//! `kind` is `blade`, `synergy` or `vc`. The classifier resolves
//! SRV_BLADE / SRV_SYNERGY membership against this inventory, and the
//! pairing resolver uses enclosure groups as its zero-device colocation
//! fallback.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error_handling::InitializationError;

/// Kind of enclosure a WWN is embedded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnclosureKind {
    /// Classic blade enclosure.
    Blade,
    /// Composable (Synergy-style) frame.
    Synergy,
    /// Virtual Connect interconnect module.
    Vc,
}

/// One enclosure inventory entry.
#[derive(Debug, Clone, Deserialize)]
pub struct EnclosureEntry {
    /// Enclosure identifier.
    pub enclosure: String,
    /// Bay number within the enclosure.
    pub bay: u32,
    /// Enclosure kind.
    pub kind: EnclosureKind,
    /// Embedded port WWN.
    pub port_wwn: String,
}

/// The loaded inventory, indexed by lowercase port WWN.
#[derive(Debug, Default)]
pub struct EnclosureInventory {
    by_wwn: HashMap<String, EnclosureEntry>,
}

impl EnclosureInventory {
    /// Loads the inventory from a CSV file. An explicitly configured but
    /// unreadable file is a fatal configuration error.
    pub fn load(path: &Path) -> Result<EnclosureInventory, InitializationError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| {
            InitializationError::EnclosureInventoryError(format!("{}: {}", path.display(), e))
        })?;
        let mut inventory = EnclosureInventory::default();
        for row in reader.deserialize() {
            let entry: EnclosureEntry = row.map_err(|e| {
                InitializationError::EnclosureInventoryError(format!("{}: {}", path.display(), e))
            })?;
            inventory
                .by_wwn
                .insert(entry.port_wwn.to_ascii_lowercase(), entry);
        }
        Ok(inventory)
    }

    /// Looks up the enclosure entry embedding a port WWN.
    pub fn lookup(&self, port_wwn: &str) -> Option<&EnclosureEntry> {
        self.by_wwn.get(&port_wwn.to_ascii_lowercase())
    }

    /// Enclosure/bay colocation group of a WWN, when embedded.
    pub fn colocation_group(&self, port_wwn: &str) -> Option<String> {
        self.lookup(port_wwn)
            .map(|e| format!("{}/{}", e.enclosure, e.bay))
    }

    /// Number of inventory entries.
    pub fn len(&self) -> usize {
        self.by_wwn.len()
    }

    /// True when no inventory was loaded.
    pub fn is_empty(&self) -> bool {
        self.by_wwn.is_empty()
    }
}
