//! Diff engine: partition two name-keyed snapshots into a sync plan.
//!
//! The diff is a pure three-way set partition on artifact names: local-only
//! names become creates, common names become updates when their normalized
//! documents differ, remote-only names become deletes. Snapshots are never
//! mutated.

use crate::artifact::{documents_match, LocalArtifact, LocalSnapshot, RemoteSnapshot};

/// The set of remote operations needed to make the remote side match local.
///
/// Computed fresh on every push and never persisted. Entries within one plan
/// act on disjoint names, so the three lists may be applied in any relative
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncPlan {
    /// Local artifacts with no remote counterpart, to be imported.
    pub to_create: Vec<LocalArtifact>,
    /// Changed artifacts paired with the remote id to post the update to.
    pub to_update: Vec<(LocalArtifact, String)>,
    /// Remote ids with no local counterpart, to be deleted.
    pub to_delete: Vec<String>,
}

impl SyncPlan {
    /// True when the plan contains no operations.
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }

    /// Total number of operations in the plan.
    pub fn len(&self) -> usize {
        self.to_create.len() + self.to_update.len() + self.to_delete.len()
    }
}

/// Compute the plan that converges `remote` towards `local`.
///
/// Common names are compared structurally after stripping volatile
/// server-assigned fields from both documents; any difference triggers a full
/// update. A common-name remote entry whose document was never fetched cannot
/// be compared and is conservatively classified as an update.
///
/// Both snapshots are ordered by name, so the resulting plan is deterministic.
pub fn diff(local: &LocalSnapshot, remote: &RemoteSnapshot) -> SyncPlan {
    let mut plan = SyncPlan::default();

    for (name, artifact) in local {
        match remote.get(name) {
            None => plan.to_create.push(artifact.clone()),
            Some(remote_artifact) => {
                let changed = match &remote_artifact.document {
                    Some(remote_doc) => !documents_match(&artifact.document, remote_doc),
                    None => true,
                };
                if changed {
                    plan.to_update
                        .push((artifact.clone(), remote_artifact.remote_id.clone()));
                }
            }
        }
    }

    for (name, remote_artifact) in remote {
        if !local.contains_key(name) {
            plan.to_delete.push(remote_artifact.remote_id.clone());
        }
    }

    plan
}
