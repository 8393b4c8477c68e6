//! Flat annotation map
//!
//! The only artifact that crosses the transport boundary. Keys are unique,
//! values are fully rendered strings; nested structures (call stacks, log
//! snapshots, process lists) must be serialized into a single string value
//! before insertion to satisfy the transport's flat-record contract.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Insertion-ordered flat key→value string mapping.
///
/// Inserting an existing key replaces its value in place, preserving the
/// key's original position, so the uniqueness invariant always holds.
#[derive(Debug, Clone, Default)]
pub struct AnnotationMap {
    entries: Vec<(String, String)>,
}

impl AnnotationMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an annotation.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Look up an annotation by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of annotations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no annotations were recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for AnnotationMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut map = AnnotationMap::new();
        map.insert("Crash reason", "segfault in renderer");
        assert_eq!(map.get("Crash reason"), Some("segfault in renderer"));
        assert_eq!(map.get("missing"), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn duplicate_key_replaces_value_keeping_position() {
        let mut map = AnnotationMap::new();
        map.insert("a", "1");
        map.insert("b", "2");
        map.insert("a", "3");

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some("3"));
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn serializes_as_flat_json_object() {
        let mut map = AnnotationMap::new();
        map.insert("Crash reason", "boom");
        map.insert("CPU usage", "12%");

        let json = serde_json::to_value(&map).unwrap();
        assert!(json.is_object());
        assert_eq!(json["Crash reason"], "boom");
        assert_eq!(json["CPU usage"], "12%");
        // Flat contract: every value is a plain string
        assert!(json.as_object().unwrap().values().all(|v| v.is_string()));
    }
}
