//! Location table and resolver.
//!
//! The search endpoint does not accept free-text locations on their own; it
//! needs a numeric `geoId` plus a list of populated-place facets (`f_PP`).
//! [`LocationTable`] holds that mapping as read-only configuration that is
//! passed explicitly to whoever needs it. Lookups are exact: a name missing
//! from the table is an [`UnknownLocation`] error, never a guess.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ConfigError;

/// Raised when a location string is not present in the [`LocationTable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown location \"{0}\": not present in the location table")]
pub struct UnknownLocation(pub String);

/// Geographic parameters the search endpoint needs for one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoParameters {
    pub geo_id: u64,
    /// Populated-place refinement facets, in table order.
    pub facets: Vec<u64>,
}

impl GeoParameters {
    /// Facets joined with `,` as the endpoint expects them (before percent-encoding).
    #[must_use]
    pub fn joined_facets(&self) -> String {
        self.facets
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationEntry {
    pub name: String,
    pub geo_id: u64,
    #[serde(default)]
    pub facets: Vec<u64>,
}

#[derive(Debug, Deserialize)]
struct LocationsFile {
    locations: Vec<LocationEntry>,
}

/// Shipped defaults: (name, geo id, populated-place facets).
const BUILTIN_LOCATIONS: &[(&str, u64, &[u64])] = &[
    ("Denmark", 104_514_075, &[102_194_656, 100_926_626, 106_013_036]),
    ("Sweden", 105_117_694, &[100_907_646, 102_006_593, 100_270_214]),
    ("Norway", 103_819_153, &[105_719_246, 103_251_106]),
    ("Finland", 100_456_013, &[106_591_199, 101_597_744]),
    ("Germany", 101_282_230, &[106_967_730, 100_477_049, 102_299_470]),
    ("Netherlands", 102_890_719, &[102_011_674, 106_754_074]),
    ("United Kingdom", 101_165_590, &[102_257_491, 106_224_186]),
    ("United States", 103_644_278, &[105_080_838, 102_277_331, 104_116_203]),
];

/// Read-only mapping from location name to [`GeoParameters`].
#[derive(Debug, Clone)]
pub struct LocationTable {
    entries: Vec<LocationEntry>,
    index: HashMap<String, usize>,
}

impl LocationTable {
    /// Builds a table from entries, rejecting blank or duplicate names and zero geo ids.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when an entry is invalid.
    pub fn new(entries: Vec<LocationEntry>) -> Result<Self, ConfigError> {
        let mut index = HashMap::with_capacity(entries.len());
        let mut seen = HashSet::new();

        for (i, entry) in entries.iter().enumerate() {
            let name = entry.name.trim();
            if name.is_empty() {
                return Err(ConfigError::Validation(
                    "location name must be non-empty".to_string(),
                ));
            }
            if entry.geo_id == 0 {
                return Err(ConfigError::Validation(format!(
                    "location '{name}' has geo_id 0"
                )));
            }
            if !seen.insert(name.to_string()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate location name: '{name}'"
                )));
            }
            index.insert(name.to_string(), i);
        }

        Ok(Self { entries, index })
    }

    /// The table compiled into the crate.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = BUILTIN_LOCATIONS
            .iter()
            .map(|(name, geo_id, facets)| LocationEntry {
                name: (*name).to_string(),
                geo_id: *geo_id,
                facets: facets.to_vec(),
            })
            .collect::<Vec<_>>();
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), i))
            .collect();
        Self { entries, index }
    }

    /// Loads the table from `path` when given, otherwise returns [`Self::builtin`].
    ///
    /// # Errors
    ///
    /// Propagates any error from [`load_locations`].
    pub fn from_optional_path(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => load_locations(p),
            None => Ok(Self::builtin()),
        }
    }

    /// Maps a location name to its geo parameters.
    ///
    /// Surrounding whitespace is ignored; the match is otherwise exact and
    /// case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownLocation`] when the name is absent from the table.
    pub fn resolve(&self, location: &str) -> Result<GeoParameters, UnknownLocation> {
        let entry = self
            .index
            .get(location.trim())
            .map(|&i| &self.entries[i])
            .ok_or_else(|| UnknownLocation(location.to_string()))?;

        Ok(GeoParameters {
            geo_id: entry.geo_id,
            facets: entry.facets.clone(),
        })
    }

    #[must_use]
    pub fn contains(&self, location: &str) -> bool {
        self.index.contains_key(location.trim())
    }

    pub fn entries(&self) -> impl Iterator<Item = &LocationEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LocationTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Load and validate a location table from a YAML file.
///
/// ```yaml
/// locations:
///   - name: Denmark
///     geo_id: 104514075
///     facets: [102194656, 100926626]
/// ```
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_locations(path: &Path) -> Result<LocationTable, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LocationsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: LocationsFile = serde_yaml::from_str(&content)?;
    LocationTable::new(file.locations)
}

#[cfg(test)]
#[path = "locations_test.rs"]
mod tests;
