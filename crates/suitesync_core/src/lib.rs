//! Core library for suitesync.
//!
//! Keeps local folders of JSON test artifacts (one folder per suite, one file
//! per artifact) synchronized with a remote service that stores the same
//! artifacts under opaque identifiers. Two independent directions share the
//! identity mapping and the diff engine:
//!
//! - **Pull** ([`pull`]) mirrors each remote suite onto the local filesystem,
//!   renaming folders when the remote display name changed.
//! - **Push** ([`push`]) reconciles local folders against the remote service
//!   with a name-keyed create/update/delete plan.
//!
//! The remote service itself is a collaborator behind the [`remote::RemoteApi`]
//! trait; the `suitesync` CLI crate provides the HTTP implementation.

#![warn(missing_docs)]

/// Export archive decoding
pub mod archive;

/// Artifact records, snapshots, and the local folder reader
pub mod artifact;

/// Diff engine (three-way name partition into a sync plan)
pub mod diff;

/// Error (common error types)
pub mod error;

/// Identity mapping store (suite id -> folder name)
pub mod mapping;

/// Pull applier (remote -> local mirror)
pub mod pull;

/// Push applier (local -> remote reconciliation)
pub mod push;

/// Remote service interface
pub mod remote;

/// Run summaries shared by the appliers
pub mod run;

#[cfg(test)]
pub mod test_utils;
