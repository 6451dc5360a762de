// File: crates/tabula-core/src/error.rs
// Summary: Error taxonomy for loading datasets and building charts.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate; defaults to [`ChartError`].
pub type Result<T, E = ChartError> = std::result::Result<T, E>;

/// Failure to obtain a typed record set from a source.
/// Terminal for the chart that requested the dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read dataset `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed delimited text: {0}")]
    Csv(#[from] csv::Error),

    #[error("schema field `{0}` is not present in the header")]
    MissingColumn(String),

    #[error("dataset has no header row")]
    EmptyHeader,
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("dimension index {index} out of range (have {len})")]
    DimensionIndex { index: usize, len: usize },

    #[error("{kind:?} scale needs a {expected} domain")]
    DomainMismatch {
        kind: crate::scale::ScaleKind,
        expected: &'static str,
    },

    #[error("invalid color `{0}`")]
    Color(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("template error: {0}")]
    Template(#[from] tinytemplate::error::Error),
}
