//! Error types emitted by the NearCare CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use nearcare_core::{DirectoryError, StoreError, ValidationError};
use thiserror::Error;

/// Errors emitted by the NearCare CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name of the missing option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// The directory holding the database could not be created.
    #[error("failed to prepare database directory for {path:?}: {source}")]
    PrepareDatabase {
        /// Database path whose parent was being created.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Opening the provider database failed.
    #[error("failed to open provider database at {path:?}: {source}")]
    OpenDatabase {
        /// Database path that was opened.
        path: Utf8PathBuf,
        /// Store failure.
        #[source]
        source: StoreError,
    },
    /// A directory operation failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    /// Opening a seed file failed.
    #[error("failed to open seed file at {path:?}: {source}")]
    OpenSeedFile {
        /// Seed file path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Seed JSON could not be decoded.
    #[error("failed to parse seed JSON at {path:?}: {source}")]
    ParseSeedFile {
        /// Seed file path.
        path: Utf8PathBuf,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// The bundled sample data could not be decoded.
    #[error("failed to parse bundled sample providers: {0}")]
    ParseBundledSeed(#[source] serde_json::Error),
    /// A seed entry failed validation; nothing was inserted.
    #[error("seed entry {index} is invalid: {source}")]
    InvalidSeedRecord {
        /// Zero-based position of the entry in the seed list.
        index: usize,
        /// Validation failure.
        #[source]
        source: ValidationError,
    },
    /// Serializing command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
