use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for suitesync operations
#[derive(Debug, Error)]
pub enum SyncError {
    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Identity mapping errors (run-fatal: the mapping is the single shared
    // store, so a broken load/save aborts the whole run)
    #[error("Failed to read mapping file '{path}': {source}")]
    MappingRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Mapping file '{path}' is not valid JSON: {source}")]
    MappingParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write mapping file '{path}': {source}")]
    MappingWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    // Remote errors
    #[error("Remote request failed with status {status}: {url}")]
    RemoteStatus { status: u16, url: String },

    #[error("Remote transport error: {0}")]
    RemoteTransport(String),

    #[error("Malformed remote response: {0}")]
    RemoteResponse(String),

    #[error("Suite '{suite_id}' has no display name")]
    MissingDisplayName { suite_id: String },

    // Export archive errors
    #[error("Export archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    // Local filesystem errors
    #[error("Failed to rename folder '{from}' to '{to}': {source}")]
    FolderRename {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for suitesync operations
pub type Result<T> = std::result::Result<T, SyncError>;
