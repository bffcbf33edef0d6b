use std::path::PathBuf;

use thiserror::Error;

/// Fatal pipeline failures.
///
/// Per-sample problems (extraction errors, missing labels) never surface
/// here; they are logged and the sample is skipped.
#[derive(Debug, Error)]
pub enum PrepError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("manifest {path} has no '{column}' column")]
    ManifestColumn { path: PathBuf, column: String },

    #[error("failed to open sample container {path}: {source}")]
    Container {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no usable samples: {0}")]
    EmptyDataset(String),

    #[error("class balancing needs at least 2 classes, found {0}")]
    SingleClass(usize),

    #[error(
        "class {class} has {count} samples but oversampling needs at least {required} \
         (k_neighbors + 1)"
    )]
    InsufficientNeighbors {
        class: usize,
        count: usize,
        required: usize,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("label '{0}' was not seen when the encoder was fitted")]
    UnknownLabel(String),

    #[error("class id {id} out of range for {classes} classes")]
    UnknownClass { id: usize, classes: usize },

    #[error("failed to persist {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, PrepError>;

impl PrepError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PrepError::Io {
            path: path.into(),
            source,
        }
    }
}
