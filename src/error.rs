use std::path::PathBuf;
use thiserror::Error;

use crate::data::ProjectId;

/// The main error type for export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse data store snapshot {path}: {source}")]
    StoreParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write COCO JSON to {path}: {source}")]
    CocoJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Failed to collect files under {path}: {message}")]
    ArchiveWalk { path: PathBuf, message: String },

    #[error("Failed to render export report: {0}")]
    ReportRender(#[source] serde_json::Error),

    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
