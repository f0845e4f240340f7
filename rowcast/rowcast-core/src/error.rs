//! Error types for the value layer.

use std::fmt;

use crate::value::ColumnKind;

/// The value held by a [`ColumnValue`](crate::ColumnValue) cannot be
/// represented in the requested target kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot cast {from} to {to}: [{value}]")]
pub struct CastError {
    pub from: ColumnKind,
    pub to: TargetKind,
    pub value: String,
}

impl CastError {
    pub fn new(from: ColumnKind, to: TargetKind, value: impl Into<String>) -> Self {
        Self {
            from,
            to,
            value: value.into(),
        }
    }
}

/// Target kinds a column value can be reinterpreted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Decimal,
    String,
    Bytes,
    Date,
    Time,
    Timestamp,
}

impl TargetKind {
    pub fn name(&self) -> &'static str {
        match self {
            TargetKind::Bool => "bool",
            TargetKind::I8 => "i8",
            TargetKind::I16 => "i16",
            TargetKind::I32 => "i32",
            TargetKind::I64 => "i64",
            TargetKind::F32 => "f32",
            TargetKind::F64 => "f64",
            TargetKind::Decimal => "decimal",
            TargetKind::String => "string",
            TargetKind::Bytes => "bytes",
            TargetKind::Date => "date",
            TargetKind::Time => "time",
            TargetKind::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure raised by an external [`RowReader`](crate::RowReader) or
/// [`RowWriter`](crate::RowWriter) implementation.
///
/// This is the collaborator's channel (a closed stream, a missing column, a
/// driver-level type mismatch) and is kept apart from [`CastError`].
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct AccessError {
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AccessError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

impl From<std::io::Error> for AccessError {
    fn from(e: std::io::Error) -> Self {
        Self::with_source("I/O error while reading external value", e)
    }
}
