//! Ordered key/value listing that serializes as a JSON object.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Key/value pairs kept in rank order.
///
/// Serializes as a JSON object whose keys appear in rank order, so callers
/// see histograms and rankings the way they were sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<V>(Vec<(String, V)>);

impl<V> Ranked<V> {
    #[must_use]
    pub fn new(entries: Vec<(String, V)>) -> Self {
        Self(entries)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<(String, V)> {
        self.0
    }
}

impl<V> Default for Ranked<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V> FromIterator<(String, V)> for Ranked<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<V: Serialize> Serialize for Ranked<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
