//! Bind-time and row-time error types.

use rowcast_core::{AccessError, CastError, LogicalTypeRoot};

/// A schema descriptor cannot be bound to a converter.
///
/// Raised by [`RowConverterBuilder::build`](crate::RowConverterBuilder::build)
/// before any row is processed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// The field's logical type root has no registered handling.
    #[error("unsupported type {type_root} for field {index} ('{name}')")]
    UnsupportedType {
        index: usize,
        name: String,
        type_root: LogicalTypeRoot,
    },

    /// The declared precision is outside what the type root can carry.
    #[error("precision {precision} out of range for {type_root} field {index} ('{name}')")]
    InvalidPrecision {
        index: usize,
        name: String,
        type_root: LogicalTypeRoot,
        precision: u32,
    },
}

/// A row could not be converted.
///
/// Field-level failures carry the field position and name so the pipeline
/// can attribute them.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// A value is not representable in the kind the field requires.
    #[error("field {index} ('{name}'): {source}")]
    Cast {
        index: usize,
        name: String,
        #[source]
        source: CastError,
    },

    /// The external reader or writer failed.
    #[error("field {index} ('{name}'): {source}")]
    Access {
        index: usize,
        name: String,
        #[source]
        source: AccessError,
    },

    /// The row's width differs from the bound schema.
    #[error("row has {actual} values but the converter is bound to {expected} fields")]
    Arity { expected: usize, actual: usize },
}

impl ConvertError {
    /// Position of the failing field, if the failure is field-level.
    pub fn field_index(&self) -> Option<usize> {
        match self {
            ConvertError::Cast { index, .. } | ConvertError::Access { index, .. } => Some(*index),
            ConvertError::Arity { .. } => None,
        }
    }

    /// The originating cast failure, if any.
    pub fn cast_error(&self) -> Option<&CastError> {
        match self {
            ConvertError::Cast { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Failure raised inside a per-field closure, before field attribution.
#[derive(Debug)]
pub(crate) enum FieldFailure {
    Cast(CastError),
    Access(AccessError),
}

impl FieldFailure {
    pub(crate) fn at(self, index: usize, name: &str) -> ConvertError {
        match self {
            FieldFailure::Cast(source) => ConvertError::Cast {
                index,
                name: name.to_string(),
                source,
            },
            FieldFailure::Access(source) => ConvertError::Access {
                index,
                name: name.to_string(),
                source,
            },
        }
    }
}

impl From<CastError> for FieldFailure {
    fn from(e: CastError) -> Self {
        Self::Cast(e)
    }
}

impl From<AccessError> for FieldFailure {
    fn from(e: AccessError) -> Self {
        Self::Access(e)
    }
}
