//! Remote service interface.
//!
//! The remote HTTP API is a collaborator, not part of the core: this module
//! defines only the operations the sync engines need, and the CLI crate
//! provides the `reqwest`-backed implementation. Tests substitute an
//! in-memory mock.

use serde_json::Value;

use crate::artifact::{RemoteArtifact, RemoteSnapshot};
use crate::error::Result;

/// A suite as returned by the remote folder listing.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteSummary {
    /// Opaque, globally unique, stable suite identifier.
    pub suite_id: String,
    /// Current display name (mirrored to the local folder name).
    pub display_name: String,
}

/// An artifact as returned by the per-suite listing: identity and name only.
#[derive(Debug, Clone, PartialEq)]
pub struct TestSummary {
    /// Opaque remote artifact identifier.
    pub remote_id: String,
    /// Artifact name (the join key against local files).
    pub name: String,
}

/// Operations the remote test-artifact service exposes.
///
/// Any non-success response surfaces as an error; the appliers decide how far
/// a failure propagates (suite-fatal for reads, per-entry for plan
/// application).
pub trait RemoteApi {
    /// List the suites contained in a remote folder.
    fn list_suites(&self, folder_id: &str) -> Result<Vec<SuiteSummary>>;

    /// Fetch a suite's metadata document, including its display name.
    fn get_suite(&self, suite_id: &str) -> Result<Value>;

    /// Fetch the zip export of all artifact documents in a suite.
    fn export_suite(&self, suite_id: &str) -> Result<Vec<u8>>;

    /// List a suite's artifacts by identity and name.
    fn list_tests(&self, suite_id: &str) -> Result<Vec<TestSummary>>;

    /// Fetch a single artifact document.
    fn get_test(&self, remote_id: &str) -> Result<Value>;

    /// Create an artifact in a suite from a local document.
    fn import_test(&self, suite_id: &str, document: &Value) -> Result<()>;

    /// Replace an artifact's document.
    fn update_test(&self, remote_id: &str, document: &Value) -> Result<()>;

    /// Delete an artifact.
    fn delete_test(&self, remote_id: &str) -> Result<()>;
}

/// Build a name-keyed remote snapshot from a listing, without documents.
///
/// Two remote artifacts sharing a name within one suite is a degenerate case
/// the service allows; the last listed entry wins, matching the snapshot's
/// name-unique invariant.
pub fn snapshot_from_listing(listing: Vec<TestSummary>) -> RemoteSnapshot {
    let mut snapshot = RemoteSnapshot::new();
    for test in listing {
        snapshot.insert(
            test.name.clone(),
            RemoteArtifact {
                remote_id: test.remote_id,
                name: test.name,
                document: None,
            },
        );
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_listing_duplicate_names_last_wins() {
        let listing = vec![
            TestSummary {
                remote_id: "id-1".to_string(),
                name: "pay".to_string(),
            },
            TestSummary {
                remote_id: "id-2".to_string(),
                name: "pay".to_string(),
            },
        ];

        let snapshot = snapshot_from_listing(listing);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("pay").unwrap().remote_id, "id-2");
    }
}
