//! One row of QAP results keyed by column name.

use serde::{Deserialize, Serialize};

/// Identity column holding the subject label.
pub const SUBJECT_FIELD: &str = "subject";
/// Identity column holding the imaging session label.
pub const SESSION_FIELD: &str = "session";
/// Identity column holding the composite scan label (e.g. `scan_3`).
pub const SCAN_FIELD: &str = "scan";

/// Field names every input table must provide.
pub const REQUIRED_FIELDS: [&str; 3] = [SUBJECT_FIELD, SESSION_FIELD, SCAN_FIELD];

/// A flat mapping of field name to raw string value.
///
/// Fields keep the order of the source header. Inserting an existing key
/// replaces its value in place, so a key is never stored twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == key)
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Iterates fields in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_existing_value() {
        let mut record = Record::new();
        record.insert("snr", "1.0");
        record.insert("efc", "0.4");
        record.insert("snr", "2.0");

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("snr"), Some("2.0"));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["snr", "efc"]);
    }

    #[test]
    fn test_from_iter_preserves_order() {
        let record: Record = [("subject", "S01"), ("session", "MR1"), ("scan", "scan_1")]
            .into_iter()
            .collect();

        assert_eq!(
            record.iter().collect::<Vec<_>>(),
            vec![("subject", "S01"), ("session", "MR1"), ("scan", "scan_1")]
        );
        assert!(record.contains_key("scan"));
        assert!(!record.contains_key("snr"));
    }
}
