//! Schema-bound converters between external records and `rowcast` rows.
//!
//! A [`RowConverter`] is built once from a [`FieldDefs`] schema. Building
//! inspects every field's [`LogicalTypeRoot`] and stores one deserialization
//! and one serialization closure per field; unsupported roots fail here, as
//! a [`BindError`], before any row is seen. Afterwards
//! [`RowConverter::deserialize`] and [`RowConverter::serialize`] apply the
//! stored closures by position, with no per-row type inspection.
//!
//! # Typical Flow
//! ```rust
//! use rowcast_convert::RowConverter;
//! use rowcast_core::{FieldDef, LogicalTypeRoot};
//!
//! let converter = RowConverter::new(vec![
//!     FieldDef::new("id", LogicalTypeRoot::BigInt, false),
//!     FieldDef::new("name", LogicalTypeRoot::VarChar, true),
//! ])
//! .expect("scalar roots are supported");
//! assert_eq!(converter.len(), 2);
//! ```
//!
//! [`FieldDefs`]: rowcast_core::FieldDefs
//! [`LogicalTypeRoot`]: rowcast_core::LogicalTypeRoot

mod converter;
mod dispatch;
mod error;
mod policy;

pub use converter::{RowConverter, RowConverterBuilder};
pub use error::{BindError, ConvertError};
pub use policy::{BooleanPolicy, TinyIntPolicy};
