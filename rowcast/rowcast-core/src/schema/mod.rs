//! Schema descriptor: ordered field metadata defining a row shape.

mod format;
mod types;

pub use format::format_field_defs;
pub use types::{FieldDef, FieldDefs, LogicalTypeRoot};
