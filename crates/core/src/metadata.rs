//! The Model Spec metadata mapping
//!
//! A [`Metadata`] is the string-to-string table stored under the reserved
//! `__metadata__` entry of a container header. Keys written by the builder
//! are namespaced `modelspec.<field>`; a mapping read back from disk may also
//! carry foreign keys written by other tools, and those are kept as-is.
//!
//! Keys iterate in lexicographic order. Values are always strings: numbers,
//! resolutions and dates are formatted before insertion.

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Namespace prefix shared by every Model Spec key.
pub const NAMESPACE: &str = "modelspec.";

/// Fully-qualified Model Spec keys.
pub mod keys {
    /// Model Spec format version
    pub const SAI_MODEL_SPEC: &str = "modelspec.sai_model_spec";
    /// Architecture, optionally suffixed with `/<adapter>`
    pub const ARCHITECTURE: &str = "modelspec.architecture";
    /// Implementation the weights target
    pub const IMPLEMENTATION: &str = "modelspec.implementation";
    /// Human-readable title
    pub const TITLE: &str = "modelspec.title";
    /// Creation date (ISO-8601, local time)
    pub const DATE: &str = "modelspec.date";
    /// Thumbnail data URI
    pub const THUMBNAIL: &str = "modelspec.thumbnail";
    /// Training resolution as `<w>x<h>`
    pub const RESOLUTION: &str = "modelspec.resolution";
    /// Prediction type
    pub const PREDICTION_TYPE: &str = "modelspec.prediction_type";
    /// Timestep range as `<lo>,<hi>`
    pub const TIMESTEP_RANGE: &str = "modelspec.timestep_range";
    /// Encoder layer (clip skip)
    pub const ENCODER_LAYER: &str = "modelspec.encoder_layer";
    /// Combined integrity hash
    pub const HASH_SHA256: &str = "modelspec.hash_sha256";
}

/// Current Model Spec format version written into every built mapping.
pub const SPEC_VERSION: &str = "1.0.0";

/// Ordered `modelspec.*` string mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Build the namespaced key for a bare field name.
    pub fn key_for(field: &str) -> String {
        format!("{}{}", NAMESPACE, field)
    }

    /// Look up a value by fully-qualified key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Insert a value under a fully-qualified key, returning the old value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Insert a value under `modelspec.<field>`.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) {
        self.0.insert(Self::key_for(field), value.into());
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Returns `true` if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Overlay `other` onto `self`.
    ///
    /// Every key of `other` is inserted or overwritten; keys only present in
    /// `self` are left unchanged.
    pub fn merge(&mut self, other: &Metadata) {
        for (key, value) in other.iter() {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Keep only namespaced `modelspec.*` keys.
    pub fn modelspec_only(&self) -> Metadata {
        self.0
            .iter()
            .filter(|(k, _)| k.starts_with(NAMESPACE))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    /// Consume into the underlying map.
    pub fn into_map(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl From<BTreeMap<String, String>> for Metadata {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Metadata {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Metadata {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
