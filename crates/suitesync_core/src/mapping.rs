//! Persistent identity mapping between remote suite ids and local folders.
//!
//! The mapping file is the only durable cross-reference between a suite's
//! stable remote identifier and its (mutable) local folder name. It is read
//! once at the start of a run and written back at defined checkpoints; there
//! is no locking, concurrent runs against the same file are not supported.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// Default mapping file name, resolved relative to the base directory.
pub const DEFAULT_MAPPING_FILE: &str = "suite-mapping.json";

/// Mapping `suite id -> folder name`, persisted as a single JSON object.
///
/// Entries are created on first observation of a suite, mutated when the
/// remote display name changes, and never deleted automatically. Insertion
/// order is preserved so the persisted file stays diff-stable across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuiteMapping {
    entries: IndexMap<String, String>,
}

impl SuiteMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last-known folder name for a suite, if the suite has been seen before.
    pub fn folder_name(&self, suite_id: &str) -> Option<&str> {
        self.entries.get(suite_id).map(String::as_str)
    }

    /// Record (or replace) the folder name for a suite.
    pub fn set_folder_name(&mut self, suite_id: &str, folder_name: &str) {
        self.entries
            .insert(suite_id.to_string(), folder_name.to_string());
    }

    /// Iterate over `(suite id, folder name)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of known suites.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no suites are known yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load the mapping from `path`.
    ///
    /// An absent file means "no suites known yet" and yields an empty mapping;
    /// an unreadable or unparseable file is an error (the mapping is the
    /// single shared store, so corruption is run-fatal).
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let contents = fs::read_to_string(path).map_err(|source| SyncError::MappingRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| SyncError::MappingParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Persist the full mapping to `path`, overwriting any prior state.
    ///
    /// There is no partial merge: callers read-modify-write the complete
    /// structure.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut contents = serde_json::to_string_pretty(self)?;
        contents.push('\n');
        fs::write(path, contents).map_err(|source| SyncError::MappingWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_absent_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mapping = SuiteMapping::load(&dir.path().join("suite-mapping.json")).unwrap();
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_save_load_roundtrip_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suite-mapping.json");

        let mut mapping = SuiteMapping::new();
        mapping.set_folder_name("s2", "Checkout");
        mapping.set_folder_name("s1", "Login");
        mapping.save(&path).unwrap();

        let loaded = SuiteMapping::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.folder_name("s1"), Some("Login"));
        assert_eq!(loaded.folder_name("s2"), Some("Checkout"));

        let pairs: Vec<_> = loaded.iter().collect();
        assert_eq!(pairs, vec![("s2", "Checkout"), ("s1", "Login")]);
    }

    #[test]
    fn test_set_folder_name_replaces() {
        let mut mapping = SuiteMapping::new();
        mapping.set_folder_name("s1", "Login");
        mapping.set_folder_name("s1", "Login Flow");
        assert_eq!(mapping.folder_name("s1"), Some("Login Flow"));
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn test_load_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suite-mapping.json");
        fs::write(&path, "{not json").unwrap();

        let err = SuiteMapping::load(&path).unwrap_err();
        assert!(matches!(err, SyncError::MappingParse { .. }));
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("suite-mapping.json");

        let mut mapping = SuiteMapping::new();
        mapping.set_folder_name("s1", "Login");
        mapping.save(&path).unwrap();

        assert_eq!(
            SuiteMapping::load(&path).unwrap().folder_name("s1"),
            Some("Login")
        );
    }
}
