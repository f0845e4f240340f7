//! Error types for batch conversion.

use rowcast_arrow::ArrowConvertError;
use rowcast_convert::ConvertError;
use rowcast_core::AccessError;

/// Errors produced by the batch helpers in this crate.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// A row failed to convert; `row` is its position in the batch.
    #[error("row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: ConvertError,
    },

    /// The Arrow schema does not have one column per bound field.
    #[error("schema has {actual} columns but the converter is bound to {expected} fields")]
    ColumnCount { expected: usize, actual: usize },

    /// Arrow builder or record batch failure.
    #[error(transparent)]
    Arrow(#[from] ArrowConvertError),

    /// A delimited line could not be completed or written.
    #[error("row {row}: {source}")]
    Line {
        row: usize,
        #[source]
        source: AccessError,
    },
}

impl BatchError {
    /// Position of the failing row, if the failure is row-level.
    pub fn row(&self) -> Option<usize> {
        match self {
            BatchError::Row { row, .. } | BatchError::Line { row, .. } => Some(*row),
            BatchError::ColumnCount { .. } | BatchError::Arrow(_) => None,
        }
    }
}
