//! Case-insensitive, insertion-ordered string map.
//!
//! Header and parameter storage for [`Request`](crate::Request). Lookups fold
//! the key to lowercase while the map keeps the casing each key was last
//! inserted with, so a crawl request can be serialized back out exactly as it
//! was described.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordered `String -> String` map with case-insensitive key resolution.
///
/// Entries iterate in insertion order. Re-inserting a key (under any casing)
/// replaces the old entry and moves the pair to the end, keeping only the
/// newest casing. Lookup goes through a side index from the folded
/// (lowercased) key to the stored key, so `get("content-type")` finds an
/// entry inserted as `Content-Type`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseInsensitiveMap {
    /// Stored key -> value, in insertion order.
    entries: IndexMap<String, String>,
    /// Folded key -> stored key. Holds exactly one entry per stored key.
    index: HashMap<String, String>,
}

fn fold(key: &str) -> String {
    key.to_lowercase()
}

impl CaseInsensitiveMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `key -> value`, returning the value displaced by any existing
    /// entry whose key differs only in case.
    ///
    /// The displaced entry is removed before the new one is appended, so the
    /// map never holds two keys with the same folded form and the pair ends
    /// up at the end of the iteration order.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let displaced = match self.index.insert(fold(&key), key.clone()) {
            Some(old_key) => self.entries.shift_remove(&old_key),
            None => None,
        };
        self.entries.insert(key, value.into());
        displaced
    }

    /// Looks up a value by key, ignoring case.
    pub fn get(&self, key: &str) -> Option<&str> {
        let stored = self.index.get(&fold(key))?;
        self.entries.get(stored).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        match self.index.get(&fold(key)) {
            Some(stored) => self.entries.contains_key(stored),
            None => false,
        }
    }

    /// Removes the entry matching `key` (ignoring case), returning its value.
    /// The relative order of the remaining entries is preserved.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let stored = self.index.remove(&fold(key))?;
        self.entries.shift_remove(&stored)
    }

    /// Inserts every pair of `other` through [`insert`](Self::insert), in
    /// `other`'s iteration order.
    pub fn insert_all<I, K, V>(&mut self, other: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in other {
            self.insert(key, value);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Iterates `(key, value)` pairs in insertion order, keys in their stored
    /// casing.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }
}

impl<K, V> Extend<(K, V)> for CaseInsensitiveMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.insert_all(iter);
    }
}

impl<K, V> FromIterator<(K, V)> for CaseInsensitiveMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.insert_all(iter);
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for CaseInsensitiveMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for CaseInsensitiveMap {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a CaseInsensitiveMap {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for CaseInsensitiveMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CaseInsensitiveMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MapVisitor;

        impl<'de> Visitor<'de> for MapVisitor {
            type Value = CaseInsensitiveMap;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of string keys to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = CaseInsensitiveMap::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(MapVisitor)
    }
}
