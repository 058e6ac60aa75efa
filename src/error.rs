// ==============================================================================
// error.rs - Aggregation Errors
// ==============================================================================
// Description: Error taxonomy shared by all loaders; every variant names the
//              source file that failed
// Created: 2026-10-18
// Modified: 2026-10-18
// Version: 1.0.0
// ==============================================================================

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading pipeline outputs
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Source not found: {}", path.display())]
    MissingSource { path: PathBuf },

    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parsing error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed row in {} at line {line}: {details}", path.display())]
    MalformedRow {
        path: PathBuf,
        line: usize,
        details: String,
    },

    #[error("Missing column '{column}' in {}", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("Missing header row in {}", path.display())]
    MissingHeader { path: PathBuf },

    #[error("Invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl DataError {
    /// Map an IO error to `MissingSource` when the path does not exist
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            DataError::MissingSource {
                path: path.to_path_buf(),
            }
        } else {
            DataError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Map a CSV error; a vanished file still reports as `MissingSource`
    pub fn from_csv(path: &Path, source: csv::Error) -> Self {
        if let csv::ErrorKind::Io(io) = source.kind() {
            if io.kind() == std::io::ErrorKind::NotFound {
                return DataError::MissingSource {
                    path: path.to_path_buf(),
                };
            }
        }
        DataError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Path of the source file that failed
    pub fn path(&self) -> &Path {
        match self {
            DataError::MissingSource { path }
            | DataError::Io { path, .. }
            | DataError::Csv { path, .. }
            | DataError::MalformedRow { path, .. }
            | DataError::MissingColumn { path, .. }
            | DataError::MissingHeader { path }
            | DataError::Config { path, .. } => path,
        }
    }
}
