//! Positional accessors implemented by connectors.
//!
//! Converters are built against these shapes: a [`RowReader`] exposes one
//! external record field by field, a [`RowWriter`] receives one record field
//! by field (a statement binder, a columnar builder, a line encoder).

use std::io::BufRead;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::{decimal::Decimal, error::AccessError, schema::LogicalTypeRoot};

/// Read access to one external record.
///
/// Typed getters are only called for fields where [`RowReader::is_null`]
/// returned `false`.
pub trait RowReader {
    fn is_null(&self, index: usize) -> Result<bool, AccessError>;

    fn get_bool(&self, index: usize) -> Result<bool, AccessError>;

    fn get_i8(&self, index: usize) -> Result<i8, AccessError>;

    fn get_i16(&self, index: usize) -> Result<i16, AccessError>;

    fn get_i32(&self, index: usize) -> Result<i32, AccessError>;

    fn get_i64(&self, index: usize) -> Result<i64, AccessError>;

    fn get_f32(&self, index: usize) -> Result<f32, AccessError>;

    fn get_f64(&self, index: usize) -> Result<f64, AccessError>;

    fn get_decimal(&self, index: usize) -> Result<Decimal, AccessError>;

    fn get_string(&self, index: usize) -> Result<String, AccessError>;

    fn get_bytes(&self, index: usize) -> Result<Vec<u8>, AccessError>;

    fn get_date(&self, index: usize) -> Result<NaiveDate, AccessError>;

    fn get_time(&self, index: usize) -> Result<NaiveTime, AccessError>;

    /// Zone-aware sources return the instant in UTC.
    fn get_timestamp(&self, index: usize) -> Result<NaiveDateTime, AccessError>;

    /// Stream over a large-object text field.
    fn get_character_stream(&self, index: usize) -> Result<Box<dyn BufRead + '_>, AccessError>;
}

/// Write access to one external record (e.g. a prepared-statement binder).
pub trait RowWriter {
    fn set_null(&mut self, index: usize, type_root: LogicalTypeRoot) -> Result<(), AccessError>;

    fn set_bool(&mut self, index: usize, v: bool) -> Result<(), AccessError>;

    fn set_i8(&mut self, index: usize, v: i8) -> Result<(), AccessError>;

    fn set_i16(&mut self, index: usize, v: i16) -> Result<(), AccessError>;

    fn set_i32(&mut self, index: usize, v: i32) -> Result<(), AccessError>;

    fn set_i64(&mut self, index: usize, v: i64) -> Result<(), AccessError>;

    fn set_f32(&mut self, index: usize, v: f32) -> Result<(), AccessError>;

    fn set_f64(&mut self, index: usize, v: f64) -> Result<(), AccessError>;

    fn set_decimal(&mut self, index: usize, v: Decimal) -> Result<(), AccessError>;

    fn set_string(&mut self, index: usize, v: &str) -> Result<(), AccessError>;

    fn set_bytes(&mut self, index: usize, v: &[u8]) -> Result<(), AccessError>;

    fn set_date(&mut self, index: usize, v: NaiveDate) -> Result<(), AccessError>;

    fn set_time(&mut self, index: usize, v: NaiveTime) -> Result<(), AccessError>;

    fn set_timestamp(&mut self, index: usize, v: NaiveDateTime) -> Result<(), AccessError>;
}
