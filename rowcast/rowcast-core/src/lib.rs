//! Connector-independent value model for `rowcast`.
//!
//! This crate provides the canonical cell value ([`ColumnValue`]), the row
//! container ([`Row`]), the schema descriptor ([`FieldDefs`]) and the
//! positional [`RowReader`] / [`RowWriter`] contracts that connectors
//! implement. It performs no I/O.

mod access;
mod decimal;
mod error;
mod row;
mod schema;
mod text;
mod value;

pub use access::{RowReader, RowWriter};
pub use decimal::{Decimal, MAX_RESCALE_DIGITS, ParseDecimalError};
pub use error::{AccessError, CastError, TargetKind};
pub use row::Row;
pub use schema::{FieldDef, FieldDefs, LogicalTypeRoot, format_field_defs};
pub use text::materialize_text;
pub use value::{
    ColumnKind, ColumnValue, DEFAULT_TIMESTAMP_PRECISION, Datum, MAX_TIMESTAMP_PRECISION,
};
