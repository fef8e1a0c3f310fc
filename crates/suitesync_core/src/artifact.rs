//! Artifact records, name-keyed snapshots, and the local folder reader.
//!
//! The artifact name is the only join key between the local and remote
//! representations: local files carry it in their document's `name` field,
//! remote records carry it alongside an opaque identifier.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::warn;
use serde_json::Value;

use crate::error::Result;

/// Reserved file name for the suite metadata document inside a suite folder.
///
/// This file is never part of the artifact snapshot on either side.
pub const SUITE_METADATA_FILE: &str = "suite.json";

/// File extension of artifact documents.
pub const ARTIFACT_EXTENSION: &str = "json";

/// Server-assigned fields stripped before structural comparison.
const VOLATILE_FIELDS: [&str; 4] = ["_id", "dateCreated", "dateUpdated", "suite"];

/// An artifact as it exists on the local side: a named JSON document.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalArtifact {
    /// Unique (within a suite, case-sensitive) artifact name.
    pub name: String,
    /// The full document as read from disk.
    pub document: Value,
}

/// An artifact as it exists on the remote side.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteArtifact {
    /// Opaque, stable remote identifier.
    pub remote_id: String,
    /// Artifact name (the join key).
    pub name: String,
    /// Full document, when fetched. Push only fetches documents for names
    /// that also exist locally; remote-only entries stay identity-only.
    pub document: Option<Value>,
}

/// Name-keyed snapshot of one suite's local artifacts.
pub type LocalSnapshot = BTreeMap<String, LocalArtifact>;

/// Name-keyed snapshot of one suite's remote artifacts.
pub type RemoteSnapshot = BTreeMap<String, RemoteArtifact>;

/// Return a copy of `document` with volatile server-assigned fields removed.
pub fn normalize(document: &Value) -> Value {
    let mut doc = document.clone();
    if let Value::Object(map) = &mut doc {
        for field in VOLATILE_FIELDS {
            map.remove(field);
        }
    }
    doc
}

/// Structural equality of two documents, ignoring volatile fields on both
/// sides. Any other difference, however small, counts as a mismatch.
pub fn documents_match(local: &Value, remote: &Value) -> bool {
    normalize(local) == normalize(remote)
}

/// True for `.json` files that are not the reserved suite metadata file.
pub fn is_artifact_file(path: &Path) -> bool {
    path.extension().map(|e| e == ARTIFACT_EXTENSION).unwrap_or(false)
        && path
            .file_name()
            .map(|n| n != SUITE_METADATA_FILE)
            .unwrap_or(false)
}

/// Read a suite folder into a name-keyed snapshot.
///
/// Scans immediate files only, includes only artifact files, and derives each
/// record's name from the document's `name` field. Files that cannot be read
/// or parsed, or whose document lacks a string `name`, are skipped with a
/// warning. An absent folder yields an empty snapshot; callers skip the suite
/// downstream.
///
/// Files are visited in lexicographic order, so if two files claim the same
/// name the later one wins.
pub fn read_folder(path: &Path) -> Result<LocalSnapshot> {
    let mut snapshot = LocalSnapshot::new();
    if !path.is_dir() {
        return Ok(snapshot);
    }

    let mut files: Vec<_> = fs::read_dir(path)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();
    files.sort();

    for file in files {
        if !file.is_file() || !is_artifact_file(&file) {
            continue;
        }
        let contents = match fs::read_to_string(&file) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("skipping unreadable artifact file {}: {}", file.display(), e);
                continue;
            }
        };
        let document: Value = match serde_json::from_str(&contents) {
            Ok(document) => document,
            Err(e) => {
                warn!(
                    "skipping unparseable artifact file {}: {}",
                    file.display(),
                    e
                );
                continue;
            }
        };
        let Some(name) = document.get("name").and_then(|v| v.as_str()) else {
            warn!(
                "skipping artifact file without a name field: {}",
                file.display()
            );
            continue;
        };
        let name = name.to_string();
        snapshot.insert(
            name.clone(),
            LocalArtifact { name, document },
        );
    }

    Ok(snapshot)
}
