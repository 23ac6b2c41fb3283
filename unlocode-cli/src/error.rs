//! Error types emitted by the UN/LOCODE CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use unlocode_core::{SqliteLocodeStoreError, UnsupportedFunction};

/// Errors emitted by the UN/LOCODE CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (pass <{field}> or set {env})")]
    MissingArgument {
        /// Argument name.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// The database path does not exist.
    #[error("database {path:?} does not exist")]
    MissingDatabase {
        /// Configured database path.
        path: Utf8PathBuf,
    },
    /// The database path exists but is not a file.
    #[error("database {path:?} exists but is not a file")]
    DatabaseNotFile {
        /// Configured database path.
        path: Utf8PathBuf,
    },
    /// The database path could not be inspected due to an IO error.
    #[error("failed to inspect database path {path:?}: {source}")]
    InspectDatabase {
        /// Configured database path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite store failed.
    #[error("failed to open locode database {path:?}: {source}")]
    OpenStore {
        /// Configured database path.
        path: Utf8PathBuf,
        /// Underlying store error.
        #[source]
        source: SqliteLocodeStoreError,
    },
    /// The requested function is not part of the supported vocabulary.
    #[error(transparent)]
    UnsupportedFunction(#[from] UnsupportedFunction),
    /// A lookup against the store failed.
    #[error("lookup failed: {0}")]
    Query(#[source] SqliteLocodeStoreError),
    /// Serialising the results failed.
    #[error("failed to serialise results: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the results failed.
    #[error("failed to write results: {0}")]
    WriteOutput(#[source] std::io::Error),
}
