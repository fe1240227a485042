use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// An order-preserving multimap.
///
/// Entries are stored as a flat sequence in insertion order, with a derived
/// key index on the side. Inserting under an existing key **appends** —
/// nothing is ever overwritten — which makes the "repeated key accumulates
/// values" contract explicit rather than an artifact of map behavior.
#[derive(Debug)]
pub struct Multimap<V> {
    entries: Vec<(String, V)>,
    index: IndexMap<String, Vec<usize>>,
}

impl<V> Multimap<V> {
    /// Create an empty multimap.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: IndexMap::new(),
        }
    }

    /// Append `value` under `key`. Existing values for the key are kept.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        let position = self.entries.len();
        self.index.entry(key.clone()).or_default().push(position);
        self.entries.push((key, value));
    }

    /// The first value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.index
            .get(key)
            .and_then(|positions| positions.first())
            .map(|&i| &self.entries[i].1)
    }

    /// All values stored under `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> Vec<&V> {
        self.index
            .get(key)
            .map(|positions| positions.iter().map(|&i| &self.entries[i].1).collect())
            .unwrap_or_default()
    }

    /// Iterate over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over distinct keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Total number of entries (repeated keys counted per entry).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no entries have been inserted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for Multimap<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializes as a JSON map entry per stored pair, in insertion order.
/// Repeated keys are emitted repeatedly; deduplication is the consumer's
/// decision, not the collection's.
impl<V: Serialize> Serialize for Multimap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Tests (unit)
// ---------------------------------------------------------------------------
