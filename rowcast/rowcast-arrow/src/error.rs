use arrow::{datatypes::DataType, error::ArrowError};
use rowcast_core::LogicalTypeRoot;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArrowConvertError {
    #[error("field '{name}' has type {type_root}, which has no Arrow mapping")]
    UnsupportedType {
        name: String,
        type_root: LogicalTypeRoot,
    },
    #[error("field '{name}' has decimal precision {precision}, beyond what Arrow can hold")]
    UnsupportedPrecision { name: String, precision: u32 },
    #[error("unsupported Arrow data type for row writer: {0}")]
    UnsupportedDataType(DataType),
    #[error("row {row} is incomplete: column {column} was not written")]
    IncompleteRow { row: usize, column: usize },
    #[error(transparent)]
    Arrow(#[from] ArrowError),
}
