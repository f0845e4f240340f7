//! Typed column values and schema-bound row converters.
//!
//! This crate bundles the `rowcast` layers:
//! - [`core`]: the column value model, rows, schema descriptors and the
//!   positional reader/writer traits connectors implement.
//! - [`convert`]: [`RowConverter`], bound once per schema.
//! - [`arrow`]: Arrow schema mapping and `RecordBatch` reader/writer.
//!
//! plus batch helpers built on them: [`read_record_batch`],
//! [`write_record_batch`] and the delimited line format used by bulk-load
//! sinks ([`DelimitedRowWriter`], [`write_delimited`]).
//!
//! # Typical Flow
//! ```rust
//! use std::sync::Arc;
//!
//! use rowcast::{RowConverter, read_record_batch, write_record_batch};
//! use rowcast::arrow::field_defs_to_arrow_schema;
//! use rowcast::core::{ColumnValue, FieldDef, FieldDefs, LogicalTypeRoot, Row};
//!
//! let fields = FieldDefs::new(vec![
//!     FieldDef::new("id", LogicalTypeRoot::BigInt, false),
//!     FieldDef::new("name", LogicalTypeRoot::VarChar, true),
//! ]);
//! let converter = RowConverter::new(fields.clone()).unwrap();
//! let schema = Arc::new(field_defs_to_arrow_schema(&fields).unwrap());
//!
//! let rows = vec![Row::new(vec![ColumnValue::big_int(1), ColumnValue::null()])];
//! let batch = write_record_batch(&converter, &rows, schema).unwrap();
//! assert_eq!(read_record_batch(&converter, &batch).unwrap(), rows);
//! ```
mod batch;
mod delimited;
mod error;

pub use batch::{read_record_batch, write_record_batch};
pub use delimited::{DelimitedFormat, DelimitedRowWriter, write_delimited};
pub use error::BatchError;
pub use rowcast_arrow as arrow;
pub use rowcast_convert as convert;
pub use rowcast_convert::{BindError, ConvertError, RowConverter};
pub use rowcast_core as core;
pub use rowcast_core::{ColumnValue, Row};
