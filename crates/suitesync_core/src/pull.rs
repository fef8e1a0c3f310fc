//! Pull applier: mirror remote suites onto the local filesystem.
//!
//! Pull makes each suite's folder an exact mirror of the remote suite's
//! current artifacts and metadata: full-folder replace-in-place, folder
//! renames driven by remote display-name changes, and the suite metadata
//! document written to the reserved `suite.json`. Running it twice with
//! unchanged remote state leaves the folder byte-identical.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};

use crate::archive::{decode_export, ExportEntry};
use crate::artifact::{is_artifact_file, SUITE_METADATA_FILE};
use crate::error::{Result, SyncError};
use crate::mapping::SuiteMapping;
use crate::remote::RemoteApi;
use crate::run::RunSummary;

/// Settings for a pull run.
#[derive(Debug, Clone)]
pub struct PullConfig {
    /// Directory containing the suite folders.
    pub base_dir: PathBuf,
    /// Path to the persisted identity mapping.
    pub mapping_file: PathBuf,
    /// Remote folder whose suites are mirrored.
    pub folder_id: String,
}

/// Mirror every suite in the configured remote folder, strictly sequentially.
///
/// One suite's failure is logged and counted while the remaining suites still
/// run. The mapping is saved after each suite that completes, so an
/// interrupted run never records a suite whose apply failed. A failure in the
/// shared mapping load/save or in the folder listing itself is run-fatal.
pub fn pull_folder(remote: &dyn RemoteApi, config: &PullConfig) -> Result<RunSummary> {
    let mut mapping = SuiteMapping::load(&config.mapping_file)?;
    let suites = remote.list_suites(&config.folder_id)?;
    info!(
        "pulling {} suites from remote folder {}",
        suites.len(),
        config.folder_id
    );

    let mut summary = RunSummary::default();
    for suite in suites {
        match pull_suite(remote, &mut mapping, &config.base_dir, &suite.suite_id) {
            Ok(folder_name) => {
                mapping.save(&config.mapping_file)?;
                info!("suite {} mirrored to '{}'", suite.suite_id, folder_name);
                summary.succeeded += 1;
            }
            Err(e) => {
                error!(
                    "suite {} ({}) failed: {}",
                    suite.suite_id, suite.display_name, e
                );
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

/// Mirror a single suite into `base_dir`. Returns the folder name the suite
/// now lives under.
///
/// The in-memory mapping entry is only touched once the folder contents are
/// fully in place; the caller persists it afterwards.
pub fn pull_suite(
    remote: &dyn RemoteApi,
    mapping: &mut SuiteMapping,
    base_dir: &Path,
    suite_id: &str,
) -> Result<String> {
    let suite_doc = remote.get_suite(suite_id)?;
    let display_name = suite_doc
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| SyncError::MissingDisplayName {
            suite_id: suite_id.to_string(),
        })?
        .to_string();

    // Remote rename: move the existing folder to the new display name before
    // mirroring into it.
    if let Some(stored) = mapping.folder_name(suite_id) {
        if stored != display_name {
            let old_path = base_dir.join(stored);
            let new_path = base_dir.join(&display_name);
            if old_path.is_dir() {
                fs::rename(&old_path, &new_path).map_err(|source| SyncError::FolderRename {
                    from: old_path.clone(),
                    to: new_path.clone(),
                    source,
                })?;
                info!(
                    "suite {}: renamed folder '{}' -> '{}'",
                    suite_id, stored, display_name
                );
            }
        }
    }

    // Fetch and decode before touching the folder, so a failed export leaves
    // the local side as it was.
    let export = remote.export_suite(suite_id)?;
    let entries = decode_export(&export)?;

    let folder = base_dir.join(&display_name);
    fs::create_dir_all(&folder)?;
    mirror_folder(&folder, &entries, suite_id)?;

    let mut metadata = serde_json::to_string_pretty(&suite_doc)?;
    metadata.push('\n');
    write_if_changed(&folder.join(SUITE_METADATA_FILE), metadata.as_bytes())?;

    mapping.set_folder_name(suite_id, &display_name);
    Ok(display_name)
}

/// Replace the folder's artifact files with exactly the export's entries.
///
/// Delete-then-write semantics: anything locally present that is not in the
/// export is removed. The reserved metadata file is outside the mirror set.
fn mirror_folder(folder: &Path, entries: &[ExportEntry], suite_id: &str) -> Result<()> {
    let keep: BTreeSet<&str> = entries.iter().map(|e| e.file_name.as_str()).collect();

    for dir_entry in fs::read_dir(folder)? {
        let Ok(dir_entry) = dir_entry else { continue };
        let path = dir_entry.path();
        if !path.is_file() || !is_artifact_file(&path) {
            continue;
        }
        let file_name = dir_entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        if !keep.contains(file_name) {
            fs::remove_file(&path)?;
            info!("suite {}: removed stale artifact file '{}'", suite_id, file_name);
        }
    }

    for entry in entries {
        if entry.file_name == SUITE_METADATA_FILE {
            warn!(
                "suite {}: export contains an entry named '{}', ignoring it",
                suite_id, SUITE_METADATA_FILE
            );
            continue;
        }
        if write_if_changed(&folder.join(&entry.file_name), &entry.contents)? {
            info!("suite {}: wrote artifact file '{}'", suite_id, entry.file_name);
        }
    }

    Ok(())
}

/// Write `contents` unless the file already holds exactly those bytes.
///
/// Skipping identical writes is what keeps a no-op pull byte-identical on
/// disk. Returns whether a write happened.
fn write_if_changed(path: &Path, contents: &[u8]) -> Result<bool> {
    if let Ok(existing) = fs::read(path) {
        if existing == contents {
            return Ok(false);
        }
    }
    fs::write(path, contents)?;
    Ok(true)
}
