//! Shared testing infrastructure.
//!
//! Provides an in-memory [`RemoteApi`] implementation used by the pull and
//! push applier tests, plus a helper to build export archives.

use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Write};
use std::sync::Mutex;

use serde_json::Value;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::{Result, SyncError};
use crate::remote::{RemoteApi, SuiteSummary, TestSummary};

/// A mutation recorded against the mock remote, for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    /// `import_test` was called.
    Import {
        /// Target suite.
        suite_id: String,
        /// Posted document.
        document: Value,
    },
    /// `update_test` was called.
    Update {
        /// Target artifact.
        remote_id: String,
        /// Posted document.
        document: Value,
    },
    /// `delete_test` was called.
    Delete {
        /// Target artifact.
        remote_id: String,
    },
}

/// In-memory remote service for tests.
///
/// Populate it with builder-style `add_*`/`set_*` calls, inject failures with
/// the `fail_*` calls, and assert on the mutations it records.
#[derive(Default)]
pub struct MockRemote {
    suites: Vec<SuiteSummary>,
    suite_docs: HashMap<String, Value>,
    exports: HashMap<String, Vec<u8>>,
    listings: HashMap<String, Vec<TestSummary>>,
    test_docs: HashMap<String, Value>,
    failing_exports: HashSet<String>,
    failing_imports: HashSet<String>,
    failing_updates: HashSet<String>,
    failing_deletes: HashSet<String>,
    /// Mutations issued against the remote, in call order.
    pub calls: Mutex<Vec<RemoteCall>>,
}

impl MockRemote {
    /// Create an empty mock remote.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a suite with its metadata document.
    pub fn add_suite(&mut self, suite_id: &str, display_name: &str, document: Value) {
        self.suites.push(SuiteSummary {
            suite_id: suite_id.to_string(),
            display_name: display_name.to_string(),
        });
        self.suite_docs.insert(suite_id.to_string(), document);
    }

    /// Set the export archive returned for a suite.
    pub fn set_export(&mut self, suite_id: &str, bytes: Vec<u8>) {
        self.exports.insert(suite_id.to_string(), bytes);
    }

    /// Register a remote artifact (listing entry plus full document).
    pub fn add_test(&mut self, suite_id: &str, remote_id: &str, name: &str, document: Value) {
        self.listings
            .entry(suite_id.to_string())
            .or_default()
            .push(TestSummary {
                remote_id: remote_id.to_string(),
                name: name.to_string(),
            });
        self.test_docs.insert(remote_id.to_string(), document);
    }

    /// Register a listing entry with no fetchable document, so `get_test`
    /// for it returns a not-found error.
    pub fn add_listing_only(&mut self, suite_id: &str, remote_id: &str, name: &str) {
        self.listings
            .entry(suite_id.to_string())
            .or_default()
            .push(TestSummary {
                remote_id: remote_id.to_string(),
                name: name.to_string(),
            });
    }

    /// Make `export_suite` fail for a suite.
    pub fn fail_export(&mut self, suite_id: &str) {
        self.failing_exports.insert(suite_id.to_string());
    }

    /// Make `import_test` fail for documents with this `name`.
    pub fn fail_import_of(&mut self, name: &str) {
        self.failing_imports.insert(name.to_string());
    }

    /// Make `update_test` fail for this artifact id.
    pub fn fail_update_of(&mut self, remote_id: &str) {
        self.failing_updates.insert(remote_id.to_string());
    }

    /// Make `delete_test` fail for this artifact id.
    pub fn fail_delete_of(&mut self, remote_id: &str) {
        self.failing_deletes.insert(remote_id.to_string());
    }

    /// Snapshot of the recorded mutations.
    pub fn recorded_calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    fn server_error(what: &str) -> SyncError {
        SyncError::RemoteStatus {
            status: 500,
            url: format!("mock://{what}"),
        }
    }

    fn not_found(what: &str) -> SyncError {
        SyncError::RemoteStatus {
            status: 404,
            url: format!("mock://{what}"),
        }
    }
}

impl RemoteApi for MockRemote {
    fn list_suites(&self, _folder_id: &str) -> Result<Vec<SuiteSummary>> {
        Ok(self.suites.clone())
    }

    fn get_suite(&self, suite_id: &str) -> Result<Value> {
        self.suite_docs
            .get(suite_id)
            .cloned()
            .ok_or_else(|| Self::not_found(suite_id))
    }

    fn export_suite(&self, suite_id: &str) -> Result<Vec<u8>> {
        if self.failing_exports.contains(suite_id) {
            return Err(Self::server_error(suite_id));
        }
        self.exports
            .get(suite_id)
            .cloned()
            .ok_or_else(|| Self::not_found(suite_id))
    }

    fn list_tests(&self, suite_id: &str) -> Result<Vec<TestSummary>> {
        Ok(self.listings.get(suite_id).cloned().unwrap_or_default())
    }

    fn get_test(&self, remote_id: &str) -> Result<Value> {
        self.test_docs
            .get(remote_id)
            .cloned()
            .ok_or_else(|| Self::not_found(remote_id))
    }

    fn import_test(&self, suite_id: &str, document: &Value) -> Result<()> {
        let name = document.get("name").and_then(|v| v.as_str()).unwrap_or("");
        if self.failing_imports.contains(name) {
            return Err(Self::server_error(name));
        }
        self.calls.lock().unwrap().push(RemoteCall::Import {
            suite_id: suite_id.to_string(),
            document: document.clone(),
        });
        Ok(())
    }

    fn update_test(&self, remote_id: &str, document: &Value) -> Result<()> {
        if self.failing_updates.contains(remote_id) {
            return Err(Self::server_error(remote_id));
        }
        self.calls.lock().unwrap().push(RemoteCall::Update {
            remote_id: remote_id.to_string(),
            document: document.clone(),
        });
        Ok(())
    }

    fn delete_test(&self, remote_id: &str) -> Result<()> {
        if self.failing_deletes.contains(remote_id) {
            return Err(Self::server_error(remote_id));
        }
        self.calls.lock().unwrap().push(RemoteCall::Delete {
            remote_id: remote_id.to_string(),
        });
        Ok(())
    }
}

/// Build a zip export archive from `(file name, document)` pairs.
pub fn build_export(files: &[(&str, &Value)]) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(&mut cursor);
    let options = SimpleFileOptions::default();
    for (name, document) in files {
        zip.start_file(*name, options).unwrap();
        zip.write_all(serde_json::to_string_pretty(document).unwrap().as_bytes())
            .unwrap();
    }
    zip.finish().unwrap();
    cursor.into_inner()
}
