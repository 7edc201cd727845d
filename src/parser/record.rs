//! Flat parsed records.
//!
//! A `Record` is a flat mapping of named string fields extracted from one
//! logical entry of a command section. After the identity sections of a dump
//! have been scanned, every record is stamped with the owning switch's
//! identity key so records remain joinable downstream without any positional
//! context.

use std::collections::HashMap;

use crate::models::SwitchIdentity;

/// Field name carrying the dump/configuration file id.
pub const FIELD_CONFIG_ID: &str = "config_id";
/// Field name carrying the chassis name.
pub const FIELD_CHASSIS_NAME: &str = "chassis_name";
/// Field name carrying the chassis WWN.
pub const FIELD_CHASSIS_WWN: &str = "chassis_wwn";
/// Field name carrying the logical switch index.
pub const FIELD_SWITCH_INDEX: &str = "switch_index";
/// Field name carrying the switch name.
pub const FIELD_SWITCH_NAME: &str = "switch_name";
/// Field name carrying the switch WWN.
pub const FIELD_SWITCH_WWN: &str = "switch_wwn";

/// A flat mapping of named string fields extracted from section lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Record {
        Record {
            fields: HashMap::new(),
        }
    }

    /// Sets a field, appending with `;` when the field already holds a
    /// different value. Repeated identical values are collapsed.
    ///
    /// Appending (rather than overwriting) matters for sections where a
    /// continuation line repeats per member, e.g. alias WWN membership.
    pub fn set(&mut self, key: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        match self.fields.get_mut(key) {
            Some(existing) if existing.as_str() == value => {}
            Some(existing) => {
                existing.push(';');
                existing.push_str(value);
            }
            None => {
                self.fields.insert(key.to_string(), value.to_string());
            }
        }
    }

    /// Overwrites a field unconditionally.
    pub fn set_replace(&mut self, key: &str, value: &str) {
        self.fields.insert(key.to_string(), value.trim().to_string());
    }

    /// Returns a field value, when present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(|s| s.as_str())
    }

    /// Returns the first `;`-separated element of a field, when present.
    pub fn get_first(&self, key: &str) -> Option<&str> {
        self.get(key).map(|v| v.split(';').next().unwrap_or(v))
    }

    /// Returns all `;`-separated elements of a field.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.get(key)
            .map(|v| v.split(';').collect())
            .unwrap_or_default()
    }

    /// Parses a field as `u32`, when present and numeric.
    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    /// Parses a field as `f64`, when present and numeric.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    /// True when the record has no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Stamps the owning switch identity onto this record.
    ///
    /// Identity fields always overwrite: a section's own text never wins
    /// over the resolved identity of the dump being parsed.
    pub fn stamp_identity(&mut self, identity: &SwitchIdentity) {
        self.set_replace(FIELD_CONFIG_ID, &identity.config_id);
        self.set_replace(FIELD_CHASSIS_NAME, &identity.chassis_name);
        self.set_replace(FIELD_CHASSIS_WWN, &identity.chassis_wwn);
        self.set_replace(FIELD_SWITCH_INDEX, &identity.switch_index.to_string());
        self.set_replace(FIELD_SWITCH_NAME, &identity.switch_name);
        self.set_replace(FIELD_SWITCH_WWN, &identity.switch_wwn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut r = Record::new();
        r.set("name", "SW01");
        assert_eq!(r.get("name"), Some("SW01"));
        assert_eq!(r.get("missing"), None);
    }

    #[test]
    fn test_set_appends_distinct_values() {
        let mut r = Record::new();
        r.set("member_wwn", "10:00:00:00:00:00:00:01");
        r.set("member_wwn", "10:00:00:00:00:00:00:02");
        assert_eq!(
            r.get("member_wwn"),
            Some("10:00:00:00:00:00:00:01;10:00:00:00:00:00:00:02")
        );
        assert_eq!(r.get_first("member_wwn"), Some("10:00:00:00:00:00:00:01"));
        assert_eq!(r.get_all("member_wwn").len(), 2);
    }

    #[test]
    fn test_set_collapses_repeated_value() {
        let mut r = Record::new();
        r.set("state", "Online");
        r.set("state", "Online");
        assert_eq!(r.get("state"), Some("Online"));
    }

    #[test]
    fn test_set_ignores_empty_value() {
        let mut r = Record::new();
        r.set("state", "   ");
        assert_eq!(r.get("state"), None);
        assert!(r.is_empty());
    }

    #[test]
    fn test_numeric_accessors() {
        let mut r = Record::new();
        r.set("port", "12");
        r.set("speed", "16.5");
        r.set("junk", "abc");
        assert_eq!(r.get_u32("port"), Some(12));
        assert_eq!(r.get_f64("speed"), Some(16.5));
        assert_eq!(r.get_u32("junk"), None);
    }

    #[test]
    fn test_stamp_identity_overwrites() {
        let mut r = Record::new();
        r.set(FIELD_SWITCH_NAME, "stale");
        let identity = SwitchIdentity {
            config_id: "dump01".into(),
            chassis_name: "CHS01".into(),
            chassis_wwn: "10:00:00:05:1e:00:00:01".into(),
            switch_index: 2,
            switch_name: "SW01".into(),
            switch_wwn: "10:00:00:05:1e:00:00:02".into(),
        };
        r.stamp_identity(&identity);
        assert_eq!(r.get(FIELD_SWITCH_NAME), Some("SW01"));
        assert_eq!(r.get_u32(FIELD_SWITCH_INDEX), Some(2));
        assert_eq!(r.get(FIELD_CONFIG_ID), Some("dump01"));
    }
}
