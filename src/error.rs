//! Error types for the export pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an export run before any output is produced.
#[derive(Error, Debug)]
pub enum PostError {
    /// The option string could not be parsed.
    #[error("Invalid post processor arguments: {0}")]
    InvalidArguments(String),

    /// The requested controller preset is not registered.
    #[error("Unknown preset '{0}'")]
    UnknownPreset(String),

    /// A top-level node carries no tool path.
    #[error("The object {label} is not a path. Please select only paths and compounds.")]
    NotAPath { label: String },

    /// Writing the output target failed.
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
