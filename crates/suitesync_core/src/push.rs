//! Push applier: reconcile local suite folders against the remote service.
//!
//! Push walks the identity mapping, reads each suite's local snapshot, lists
//! the remote side, runs the diff engine, and applies the resulting plan.
//! Plan application is best-effort per entry: one bad artifact must not block
//! sibling artifacts in the same suite.

use std::path::{Path, PathBuf};

use log::{error, info, warn};

use crate::artifact::read_folder;
use crate::diff::{diff, SyncPlan};
use crate::error::Result;
use crate::mapping::SuiteMapping;
use crate::remote::{snapshot_from_listing, RemoteApi};
use crate::run::RunSummary;

/// Settings for a push run.
#[derive(Debug, Clone)]
pub struct PushConfig {
    /// Directory containing the suite folders.
    pub base_dir: PathBuf,
    /// Path to the persisted identity mapping.
    pub mapping_file: PathBuf,
}

/// Push every suite in the identity mapping, strictly sequentially.
///
/// Suites whose local folder is missing are skipped (logged, not failed).
/// A suite counts as failed if a remote read aborts it or if any plan entry
/// failed to apply; either way the remaining suites still run.
pub fn push_all(remote: &dyn RemoteApi, config: &PushConfig) -> Result<RunSummary> {
    let mapping = SuiteMapping::load(&config.mapping_file)?;
    if mapping.is_empty() {
        info!("no suites known yet; nothing to push");
        return Ok(RunSummary::default());
    }

    let mut summary = RunSummary::default();
    for (suite_id, folder_name) in mapping.iter() {
        let folder = config.base_dir.join(folder_name);
        if !folder.is_dir() {
            warn!(
                "suite {}: folder '{}' does not exist, skipping",
                suite_id, folder_name
            );
            summary.skipped += 1;
            continue;
        }
        match push_suite(remote, suite_id, folder_name, &folder) {
            Ok(0) => summary.succeeded += 1,
            Ok(failures) => {
                error!(
                    "suite {} ({}): {} entries failed to apply",
                    suite_id, folder_name, failures
                );
                summary.failed += 1;
            }
            Err(e) => {
                error!("suite {} ({}) failed: {}", suite_id, folder_name, e);
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

/// Reconcile one suite. Returns the number of plan entries that failed.
///
/// Remote documents are fetched only for names that exist on both sides: the
/// diff needs content there, identity is enough everywhere else. A failure in
/// any of these reads aborts the suite before anything is applied.
pub fn push_suite(
    remote: &dyn RemoteApi,
    suite_id: &str,
    folder_name: &str,
    folder: &Path,
) -> Result<usize> {
    let local = read_folder(folder)?;
    let listing = remote.list_tests(suite_id)?;
    let mut remote_snapshot = snapshot_from_listing(listing);

    for (name, artifact) in remote_snapshot.iter_mut() {
        if local.contains_key(name) {
            artifact.document = Some(remote.get_test(&artifact.remote_id)?);
        }
    }

    let plan = diff(&local, &remote_snapshot);
    if plan.is_empty() {
        info!("suite {} ({}): up to date", suite_id, folder_name);
        return Ok(0);
    }
    info!(
        "suite {} ({}): {} to create, {} to update, {} to delete",
        suite_id,
        folder_name,
        plan.to_create.len(),
        plan.to_update.len(),
        plan.to_delete.len()
    );

    Ok(apply_plan(remote, suite_id, folder_name, &plan))
}

/// Apply a plan best-effort. Every entry is attempted; failures are logged
/// and counted without stopping sibling entries or the other categories.
pub fn apply_plan(
    remote: &dyn RemoteApi,
    suite_id: &str,
    folder_name: &str,
    plan: &SyncPlan,
) -> usize {
    let mut failures = 0;

    for artifact in &plan.to_create {
        match remote.import_test(suite_id, &artifact.document) {
            Ok(()) => info!(
                "suite {} ({}): created '{}'",
                suite_id, folder_name, artifact.name
            ),
            Err(e) => {
                error!(
                    "suite {} ({}): failed to create '{}': {}",
                    suite_id, folder_name, artifact.name, e
                );
                failures += 1;
            }
        }
    }

    for (artifact, remote_id) in &plan.to_update {
        match remote.update_test(remote_id, &artifact.document) {
            Ok(()) => info!(
                "suite {} ({}): updated '{}' ({})",
                suite_id, folder_name, artifact.name, remote_id
            ),
            Err(e) => {
                error!(
                    "suite {} ({}): failed to update '{}' ({}): {}",
                    suite_id, folder_name, artifact.name, remote_id, e
                );
                failures += 1;
            }
        }
    }

    for remote_id in &plan.to_delete {
        match remote.delete_test(remote_id) {
            Ok(()) => info!("suite {} ({}): deleted {}", suite_id, folder_name, remote_id),
            Err(e) => {
                error!(
                    "suite {} ({}): failed to delete {}: {}",
                    suite_id, folder_name, remote_id, e
                );
                failures += 1;
            }
        }
    }

    failures
}
