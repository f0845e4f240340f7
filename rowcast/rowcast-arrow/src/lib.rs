//! Arrow integration layer for `rowcast`.
//!
//! This crate provides the Arrow side of a conversion:
//! 1. Convert `rowcast-core` schema descriptors (`FieldDefs`) to an Arrow `Schema`.
//! 2. Read one row of a `RecordBatch` through [`BatchRowReader`].
//! 3. Build a `RecordBatch` row by row through [`BatchRowWriter`].
//!
//! Zone-aware timestamp columns carry the `+00:00` timezone.
//!
//! # Typical Flow
//! ```rust
//! use std::sync::Arc;
//!
//! use rowcast_arrow::{BatchRowWriter, field_defs_to_arrow_schema};
//! use rowcast_core::{FieldDef, FieldDefs, LogicalTypeRoot, RowWriter};
//!
//! let fields = FieldDefs::new(vec![FieldDef::new("id", LogicalTypeRoot::Integer, false)]);
//! let schema = Arc::new(field_defs_to_arrow_schema(&fields).unwrap());
//! let mut writer = BatchRowWriter::new(schema, 1).unwrap();
//! writer.set_i32(0, 7).unwrap();
//! writer.end_row().unwrap();
//! let batch = writer.finish().unwrap();
//! assert_eq!(batch.num_rows(), 1);
//! ```
pub mod error;
pub mod reader;
pub mod schema_convert;
pub mod writer;

/// Re-export of [`error::ArrowConvertError`].
pub use error::ArrowConvertError;
/// Re-export of [`reader::BatchRowReader`].
pub use reader::BatchRowReader;
/// Re-export of [`schema_convert::field_defs_to_arrow_schema`].
pub use schema_convert::field_defs_to_arrow_schema;
/// Re-export of [`writer::BatchRowWriter`].
pub use writer::BatchRowWriter;

pub(crate) const TIMESTAMP_TZ: &str = "+00:00";
