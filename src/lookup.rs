//! Static key → label lookup tables used for enrichment.
//!
//! A [`Lookup`] is immutable once built. Keys are normalized (trimmed and
//! lowercased) on insertion and on probe, matching what the normalizer stage
//! does to key columns, so `" Chile "` and `"chile"` resolve identically.
//!
//! The bundled country → continent table lives in `assets/continents.json`
//! and is embedded at compile time; [`continents`] parses it once per process.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;

use crate::error::PrepResult;
use crate::processing::normalize::normalized;

/// Immutable mapping from normalized key to category label.
#[derive(Debug, Clone, Default)]
pub struct Lookup {
    map: HashMap<String, String>,
}

impl Lookup {
    /// Build a lookup from key/label pairs. Keys are normalized; labels are
    /// kept verbatim. Later duplicates of a key win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let map = pairs
            .into_iter()
            .map(|(k, v)| (normalized(k.as_ref()), v.into()))
            .collect();
        Self { map }
    }

    /// Parse a lookup from a JSON object of `{"key": "label", ...}`.
    pub fn from_json_str(s: &str) -> PrepResult<Self> {
        let raw: HashMap<String, String> = serde_json::from_str(s)?;
        Ok(Self::from_pairs(raw))
    }

    /// Read and parse a JSON lookup file.
    pub fn from_path(path: impl AsRef<Path>) -> PrepResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Look up a label by key. The probe key is normalized before the lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(&normalized(key)).map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the lookup has no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

static CONTINENTS_JSON: &str = include_str!("../assets/continents.json");

static CONTINENTS: Lazy<Lookup> = Lazy::new(|| {
    Lookup::from_json_str(CONTINENTS_JSON).expect("embedded continent table is valid json")
});

/// The bundled country → continent lookup.
pub fn continents() -> &'static Lookup {
    &CONTINENTS
}
