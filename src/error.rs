use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum XcnavError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("No Xcode project found at {0}")]
    ProjectNotFound(PathBuf),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Unreadable property list: {0}")]
    Plist(#[from] plist::Error),
    #[error("Invalid JSON descriptor: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Malformed project descriptor: {0}")]
    Descriptor(String),
    #[error("Invalid ignore pattern: {0}")]
    Pattern(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}
impl XcnavError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        XcnavError::Io {
            path: path.into(),
            source,
        }
    }
}

/// A problem met while assembling the navigator tree.
///
/// None of these stop the build: the affected node is skipped or emitted
/// with fewer children and the warning is kept on the resulting tree.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraversalWarning {
    #[error("object {id} is referenced but not defined")]
    DescriptorLookup { id: String },
    #[error("object {id} has unsupported kind {isa}")]
    UnrecognizedKind { id: String, isa: String },
    #[error("group {id} is reachable more than once")]
    Revisited { id: String },
    #[error("cannot read {path}: {message}")]
    FileSystemAccess { path: PathBuf, message: String },
    #[error("target {target} for {group} has no product reference")]
    TargetProductUnresolved { group: String, target: String },
}
