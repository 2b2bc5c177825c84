//! Errors raised while generating types or importing a manifest.
//!
//! Every variant is fatal for the run that raised it. The only recoverable
//! condition, an ABI parameter type without a mapping, is not an error at
//! all: the handler generator reports it as an [`UnmappedParam`] warning.
//!
//! [`UnmappedParam`]: crate::codegen::UnmappedParam

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodegenError>;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("TypeScript type not found for scalar `{scalar}` (field `{entity}.{field}`)")]
    UnmappableScalar {
        entity: String,
        field: String,
        scalar: String,
    },

    #[error("Unable to generate type for list field `{entity}.{field}`")]
    UnmappableListElement { entity: String, field: String },

    #[error("Failed to parse GraphQL schema: {0}")]
    SchemaParse(String),

    #[error("Entity `{0}` is defined more than once")]
    DuplicateEntity(String),

    #[error("Failed to parse ABI {}: {reason}", path.display())]
    AbiParse { path: PathBuf, reason: String },

    #[error("No manifest found in {} (looked for {})", dir.display(), candidates.join(", "))]
    ManifestNotFound {
        dir: PathBuf,
        candidates: Vec<String>,
    },

    #[error("Failed to parse manifest {}: {reason}", path.display())]
    ManifestParse { path: PathBuf, reason: String },

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Invalid data source #{index} ({name}): {reason}")]
    InvalidDataSource {
        index: usize,
        name: String,
        reason: String,
    },

    #[error("Unhandled network name `{network}` for source `{source_name}`")]
    UnknownNetwork {
        source_name: String,
        network: String,
    },

    #[error("ABI path not found for source: {source_name}")]
    AbiPathNotFound { source_name: String },

    #[error("File not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("Invalid project config {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CodegenError {
    /// Wrap an I/O error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CodegenError::Io {
            path: path.into(),
            source,
        }
    }
}
