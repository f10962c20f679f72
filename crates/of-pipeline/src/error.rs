//! Error types for pipeline construction and loading.

use of_types::TableId;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors raised while building or loading a pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Two tables share an id.
    #[error("Duplicate table id: {0}")]
    DuplicateTable(TableId),

    /// A table chains on miss to a table the pipeline does not contain.
    #[error("Table {table} has miss target {target} which is not in the pipeline")]
    UnknownMissTarget { table: TableId, target: TableId },

    /// A table chains on miss to itself.
    #[error("Table {0} lists itself as its miss target")]
    SelfMissTarget(TableId),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Pipeline file extension is neither JSON nor YAML.
    #[error("Unsupported pipeline file format: {0}")]
    UnsupportedFormat(String),
}
