//! [`RowWriter`] that accumulates rows into Arrow array builders.

use arrow::{
    array::{
        ArrayBuilder, ArrayRef, BinaryBuilder, BooleanBuilder, Date32Builder, Decimal128Builder,
        Decimal256Builder, Float32Builder, Float64Builder, Int8Builder, Int16Builder,
        Int32Builder, Int64Builder, LargeBinaryBuilder, LargeStringBuilder, StringBuilder,
        Time32MillisecondBuilder, Time32SecondBuilder, Time64MicrosecondBuilder,
        Time64NanosecondBuilder, TimestampMicrosecondBuilder, TimestampMillisecondBuilder,
        TimestampNanosecondBuilder, TimestampSecondBuilder,
    },
    datatypes::{DataType, SchemaRef, TimeUnit, i256},
    record_batch::{RecordBatch, RecordBatchOptions},
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use num_bigint::{BigInt, Sign};
use rowcast_core::{AccessError, Decimal, LogicalTypeRoot, RowWriter};

use crate::error::ArrowConvertError;

fn make_builder(
    dt: &DataType,
    capacity: usize,
) -> Result<Box<dyn ArrayBuilder>, ArrowConvertError> {
    let builder: Box<dyn ArrayBuilder> = match dt {
        DataType::Boolean => Box::new(BooleanBuilder::with_capacity(capacity)),
        DataType::Int8 => Box::new(Int8Builder::with_capacity(capacity)),
        DataType::Int16 => Box::new(Int16Builder::with_capacity(capacity)),
        DataType::Int32 => Box::new(Int32Builder::with_capacity(capacity)),
        DataType::Int64 => Box::new(Int64Builder::with_capacity(capacity)),
        DataType::Float32 => Box::new(Float32Builder::with_capacity(capacity)),
        DataType::Float64 => Box::new(Float64Builder::with_capacity(capacity)),
        DataType::Decimal128(..) => {
            Box::new(Decimal128Builder::with_capacity(capacity).with_data_type(dt.clone()))
        }
        DataType::Decimal256(..) => {
            Box::new(Decimal256Builder::with_capacity(capacity).with_data_type(dt.clone()))
        }
        DataType::Utf8 => Box::new(StringBuilder::with_capacity(capacity, 64)),
        DataType::LargeUtf8 => Box::new(LargeStringBuilder::with_capacity(capacity, 1024)),
        DataType::Binary => Box::new(BinaryBuilder::with_capacity(capacity, 64)),
        DataType::LargeBinary => Box::new(LargeBinaryBuilder::with_capacity(capacity, 1024)),
        DataType::Date32 => Box::new(Date32Builder::with_capacity(capacity)),
        DataType::Time32(TimeUnit::Second) => {
            Box::new(Time32SecondBuilder::with_capacity(capacity))
        }
        DataType::Time32(TimeUnit::Millisecond) => {
            Box::new(Time32MillisecondBuilder::with_capacity(capacity))
        }
        DataType::Time64(TimeUnit::Microsecond) => {
            Box::new(Time64MicrosecondBuilder::with_capacity(capacity))
        }
        DataType::Time64(TimeUnit::Nanosecond) => {
            Box::new(Time64NanosecondBuilder::with_capacity(capacity))
        }
        DataType::Timestamp(TimeUnit::Second, _) => {
            Box::new(TimestampSecondBuilder::with_capacity(capacity).with_data_type(dt.clone()))
        }
        DataType::Timestamp(TimeUnit::Millisecond, _) => Box::new(
            TimestampMillisecondBuilder::with_capacity(capacity).with_data_type(dt.clone()),
        ),
        DataType::Timestamp(TimeUnit::Microsecond, _) => Box::new(
            TimestampMicrosecondBuilder::with_capacity(capacity).with_data_type(dt.clone()),
        ),
        DataType::Timestamp(TimeUnit::Nanosecond, _) => Box::new(
            TimestampNanosecondBuilder::with_capacity(capacity).with_data_type(dt.clone()),
        ),
        other => return Err(ArrowConvertError::UnsupportedDataType(other.clone())),
    };
    Ok(builder)
}

/// A value staged for the current row, in its column's physical form.
#[derive(Debug)]
enum Cell {
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    I128(i128),
    I256(i256),
    Str(String),
    Bytes(Vec<u8>),
}

/// Moves `cell` into `builder`. `None` if the cell does not fit `dt`.
fn append(builder: &mut dyn ArrayBuilder, dt: &DataType, cell: Cell) -> Option<()> {
    let any = builder.as_any_mut();
    macro_rules! put {
        ($B:ty, $v:expr) => {
            any.downcast_mut::<$B>()?.append_value($v)
        };
    }
    macro_rules! null {
        ($B:ty) => {
            any.downcast_mut::<$B>()?.append_null()
        };
    }
    match (dt, cell) {
        (DataType::Boolean, Cell::Null) => null!(BooleanBuilder),
        (DataType::Int8, Cell::Null) => null!(Int8Builder),
        (DataType::Int16, Cell::Null) => null!(Int16Builder),
        (DataType::Int32, Cell::Null) => null!(Int32Builder),
        (DataType::Int64, Cell::Null) => null!(Int64Builder),
        (DataType::Float32, Cell::Null) => null!(Float32Builder),
        (DataType::Float64, Cell::Null) => null!(Float64Builder),
        (DataType::Decimal128(..), Cell::Null) => null!(Decimal128Builder),
        (DataType::Decimal256(..), Cell::Null) => null!(Decimal256Builder),
        (DataType::Utf8, Cell::Null) => null!(StringBuilder),
        (DataType::LargeUtf8, Cell::Null) => null!(LargeStringBuilder),
        (DataType::Binary, Cell::Null) => null!(BinaryBuilder),
        (DataType::LargeBinary, Cell::Null) => null!(LargeBinaryBuilder),
        (DataType::Date32, Cell::Null) => null!(Date32Builder),
        (DataType::Time32(TimeUnit::Second), Cell::Null) => null!(Time32SecondBuilder),
        (DataType::Time32(TimeUnit::Millisecond), Cell::Null) => null!(Time32MillisecondBuilder),
        (DataType::Time64(TimeUnit::Microsecond), Cell::Null) => null!(Time64MicrosecondBuilder),
        (DataType::Time64(TimeUnit::Nanosecond), Cell::Null) => null!(Time64NanosecondBuilder),
        (DataType::Timestamp(TimeUnit::Second, _), Cell::Null) => null!(TimestampSecondBuilder),
        (DataType::Timestamp(TimeUnit::Millisecond, _), Cell::Null) => {
            null!(TimestampMillisecondBuilder)
        }
        (DataType::Timestamp(TimeUnit::Microsecond, _), Cell::Null) => {
            null!(TimestampMicrosecondBuilder)
        }
        (DataType::Timestamp(TimeUnit::Nanosecond, _), Cell::Null) => {
            null!(TimestampNanosecondBuilder)
        }

        (DataType::Boolean, Cell::Bool(v)) => put!(BooleanBuilder, v),
        (DataType::Int8, Cell::I8(v)) => put!(Int8Builder, v),
        (DataType::Int16, Cell::I16(v)) => put!(Int16Builder, v),
        (DataType::Int32, Cell::I32(v)) => put!(Int32Builder, v),
        (DataType::Int64, Cell::I64(v)) => put!(Int64Builder, v),
        (DataType::Float32, Cell::F32(v)) => put!(Float32Builder, v),
        (DataType::Float64, Cell::F64(v)) => put!(Float64Builder, v),
        (DataType::Decimal128(..), Cell::I128(v)) => put!(Decimal128Builder, v),
        (DataType::Decimal256(..), Cell::I256(v)) => put!(Decimal256Builder, v),
        (DataType::Utf8, Cell::Str(v)) => put!(StringBuilder, v),
        (DataType::LargeUtf8, Cell::Str(v)) => put!(LargeStringBuilder, v),
        (DataType::Binary, Cell::Bytes(v)) => put!(BinaryBuilder, v),
        (DataType::LargeBinary, Cell::Bytes(v)) => put!(LargeBinaryBuilder, v),
        (DataType::Date32, Cell::I32(v)) => put!(Date32Builder, v),
        (DataType::Time32(TimeUnit::Second), Cell::I32(v)) => put!(Time32SecondBuilder, v),
        (DataType::Time32(TimeUnit::Millisecond), Cell::I32(v)) => {
            put!(Time32MillisecondBuilder, v)
        }
        (DataType::Time64(TimeUnit::Microsecond), Cell::I64(v)) => {
            put!(Time64MicrosecondBuilder, v)
        }
        (DataType::Time64(TimeUnit::Nanosecond), Cell::I64(v)) => {
            put!(Time64NanosecondBuilder, v)
        }
        (DataType::Timestamp(TimeUnit::Second, _), Cell::I64(v)) => {
            put!(TimestampSecondBuilder, v)
        }
        (DataType::Timestamp(TimeUnit::Millisecond, _), Cell::I64(v)) => {
            put!(TimestampMillisecondBuilder, v)
        }
        (DataType::Timestamp(TimeUnit::Microsecond, _), Cell::I64(v)) => {
            put!(TimestampMicrosecondBuilder, v)
        }
        (DataType::Timestamp(TimeUnit::Nanosecond, _), Cell::I64(v)) => {
            put!(TimestampNanosecondBuilder, v)
        }
        _ => return None,
    }
    Some(())
}

/// Builds a `RecordBatch` one row at a time.
///
/// Setters stage the row; [`end_row`] appends it to the builders once every
/// column is set. Setting a column twice keeps the last value, and
/// [`discard_row`] drops whatever is staged, so a row that fails part-way
/// never reaches the batch.
///
/// Setters check the column's Arrow type: `set_i16` needs an `Int16`
/// column, `set_string` a `Utf8` or `LargeUtf8` column, and so on.
///
/// [`end_row`]: BatchRowWriter::end_row
/// [`discard_row`]: BatchRowWriter::discard_row
pub struct BatchRowWriter {
    schema: SchemaRef,
    builders: Vec<Box<dyn ArrayBuilder>>,
    staged: Vec<Option<Cell>>,
    rows: usize,
}

impl BatchRowWriter {
    pub fn new(schema: SchemaRef, capacity: usize) -> Result<Self, ArrowConvertError> {
        let builders = schema
            .fields()
            .iter()
            .map(|f| make_builder(f.data_type(), capacity))
            .collect::<Result<Vec<_>, _>>()?;
        let staged = builders.iter().map(|_| None).collect();
        Ok(Self {
            schema,
            builders,
            staged,
            rows: 0,
        })
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Number of completed rows.
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Appends the staged row; fails if any column was left unset.
    pub fn end_row(&mut self) -> Result<(), ArrowConvertError> {
        if let Some(column) = self.staged.iter().position(Option::is_none) {
            return Err(ArrowConvertError::IncompleteRow {
                row: self.rows,
                column,
            });
        }
        let fields = self.schema.fields();
        let columns = self.builders.iter_mut().zip(&mut self.staged);
        for (index, (builder, slot)) in columns.enumerate() {
            let data_type = fields[index].data_type();
            // Setters only stage cells that fit their column.
            if let Some(cell) = slot.take() {
                append(builder.as_mut(), data_type, cell).ok_or_else(|| {
                    ArrowConvertError::UnsupportedDataType(data_type.clone())
                })?;
            }
        }
        self.rows += 1;
        Ok(())
    }

    /// Drops the values staged for the current row.
    pub fn discard_row(&mut self) {
        self.staged.iter_mut().for_each(|slot| *slot = None);
    }

    pub fn finish(mut self) -> Result<RecordBatch, ArrowConvertError> {
        if let Some(column) = self.staged.iter().position(Option::is_some) {
            return Err(ArrowConvertError::IncompleteRow {
                row: self.rows,
                column,
            });
        }
        let columns: Vec<ArrayRef> = self.builders.iter_mut().map(|b| b.finish()).collect();
        let options = RecordBatchOptions::new().with_row_count(Some(self.rows));
        Ok(RecordBatch::try_new_with_options(
            self.schema,
            columns,
            &options,
        )?)
    }

    fn data_type(&self, index: usize) -> Result<&DataType, AccessError> {
        self.schema
            .fields()
            .get(index)
            .map(|f| f.data_type())
            .ok_or_else(|| {
                AccessError::new(format!(
                    "column {index} out of range ({} columns)",
                    self.builders.len()
                ))
            })
    }

    fn stage(&mut self, index: usize, cell: Cell) -> Result<(), AccessError> {
        self.data_type(index)?;
        self.staged[index] = Some(cell);
        Ok(())
    }
}

fn rejects(index: usize, dt: &DataType, what: &str) -> AccessError {
    AccessError::new(format!(
        "column {index} has Arrow type {dt}, which does not accept {what}"
    ))
}

fn epoch_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

fn nanos_of_day(v: NaiveTime) -> i64 {
    i64::from(v.num_seconds_from_midnight()) * 1_000_000_000 + i64::from(v.nanosecond())
}

fn to_i256(v: &BigInt) -> Option<i256> {
    let bytes = v.to_signed_bytes_le();
    if bytes.len() > 32 {
        return None;
    }
    let fill = if v.sign() == Sign::Minus { 0xff } else { 0 };
    let mut buf = [fill; 32];
    buf[..bytes.len()].copy_from_slice(&bytes);
    Some(i256::from_le_bytes(buf))
}

/// Checks `v` against a `Decimal128`/`Decimal256` column and returns its
/// unscaled value at the column scale.
fn fit_decimal(index: usize, v: &Decimal, precision: u8, scale: i8) -> Result<BigInt, AccessError> {
    let out_of_range = || {
        AccessError::new(format!(
            "column {index}: decimal {v} does not fit precision {precision} scale {scale}"
        ))
    };
    let rescaled = v.rescale(i64::from(scale)).ok_or_else(out_of_range)?;
    if rescaled.precision() > u64::from(precision) {
        return Err(out_of_range());
    }
    Ok(rescaled.unscaled())
}

impl RowWriter for BatchRowWriter {
    fn set_null(&mut self, index: usize, _type_root: LogicalTypeRoot) -> Result<(), AccessError> {
        self.stage(index, Cell::Null)
    }

    fn set_bool(&mut self, index: usize, v: bool) -> Result<(), AccessError> {
        match self.data_type(index)? {
            DataType::Boolean => self.stage(index, Cell::Bool(v)),
            dt => Err(rejects(index, dt, "a boolean")),
        }
    }

    fn set_i8(&mut self, index: usize, v: i8) -> Result<(), AccessError> {
        match self.data_type(index)? {
            DataType::Int8 => self.stage(index, Cell::I8(v)),
            dt => Err(rejects(index, dt, "an i8")),
        }
    }

    fn set_i16(&mut self, index: usize, v: i16) -> Result<(), AccessError> {
        match self.data_type(index)? {
            DataType::Int16 => self.stage(index, Cell::I16(v)),
            dt => Err(rejects(index, dt, "an i16")),
        }
    }

    fn set_i32(&mut self, index: usize, v: i32) -> Result<(), AccessError> {
        match self.data_type(index)? {
            DataType::Int32 => self.stage(index, Cell::I32(v)),
            dt => Err(rejects(index, dt, "an i32")),
        }
    }

    fn set_i64(&mut self, index: usize, v: i64) -> Result<(), AccessError> {
        match self.data_type(index)? {
            DataType::Int64 => self.stage(index, Cell::I64(v)),
            dt => Err(rejects(index, dt, "an i64")),
        }
    }

    fn set_f32(&mut self, index: usize, v: f32) -> Result<(), AccessError> {
        match self.data_type(index)? {
            DataType::Float32 => self.stage(index, Cell::F32(v)),
            dt => Err(rejects(index, dt, "an f32")),
        }
    }

    fn set_f64(&mut self, index: usize, v: f64) -> Result<(), AccessError> {
        match self.data_type(index)? {
            DataType::Float64 => self.stage(index, Cell::F64(v)),
            dt => Err(rejects(index, dt, "an f64")),
        }
    }

    fn set_decimal(&mut self, index: usize, v: Decimal) -> Result<(), AccessError> {
        let cell = match *self.data_type(index)? {
            DataType::Decimal128(precision, scale) => {
                let unscaled = fit_decimal(index, &v, precision, scale)?;
                let unscaled = i128::try_from(&unscaled)
                    .map_err(|e| AccessError::new(format!("column {index}: {e}")))?;
                Cell::I128(unscaled)
            }
            DataType::Decimal256(precision, scale) => {
                let unscaled = fit_decimal(index, &v, precision, scale)?;
                Cell::I256(to_i256(&unscaled).ok_or_else(|| {
                    AccessError::new(format!("column {index}: decimal {v} exceeds 256 bits"))
                })?)
            }
            ref dt => return Err(rejects(index, dt, "a decimal")),
        };
        self.stage(index, cell)
    }

    fn set_string(&mut self, index: usize, v: &str) -> Result<(), AccessError> {
        match self.data_type(index)? {
            DataType::Utf8 | DataType::LargeUtf8 => self.stage(index, Cell::Str(v.to_string())),
            dt => Err(rejects(index, dt, "a string")),
        }
    }

    fn set_bytes(&mut self, index: usize, v: &[u8]) -> Result<(), AccessError> {
        match self.data_type(index)? {
            DataType::Binary | DataType::LargeBinary => {
                self.stage(index, Cell::Bytes(v.to_vec()))
            }
            dt => Err(rejects(index, dt, "bytes")),
        }
    }

    fn set_date(&mut self, index: usize, v: NaiveDate) -> Result<(), AccessError> {
        match self.data_type(index)? {
            DataType::Date32 => {
                let days = i32::try_from((v - epoch_date()).num_days()).map_err(|_| {
                    AccessError::new(format!("column {index}: date {v} out of range"))
                })?;
                self.stage(index, Cell::I32(days))
            }
            dt => Err(rejects(index, dt, "a date")),
        }
    }

    fn set_time(&mut self, index: usize, v: NaiveTime) -> Result<(), AccessError> {
        let nanos = nanos_of_day(v);
        let cell = match self.data_type(index)? {
            DataType::Time32(TimeUnit::Second) => Cell::I32((nanos / 1_000_000_000) as i32),
            DataType::Time32(TimeUnit::Millisecond) => Cell::I32((nanos / 1_000_000) as i32),
            DataType::Time64(TimeUnit::Microsecond) => Cell::I64(nanos / 1_000),
            DataType::Time64(TimeUnit::Nanosecond) => Cell::I64(nanos),
            dt => return Err(rejects(index, dt, "a time")),
        };
        self.stage(index, cell)
    }

    fn set_timestamp(&mut self, index: usize, v: NaiveDateTime) -> Result<(), AccessError> {
        let utc = v.and_utc();
        let ticks = match self.data_type(index)? {
            DataType::Timestamp(TimeUnit::Second, _) => utc.timestamp(),
            DataType::Timestamp(TimeUnit::Millisecond, _) => utc.timestamp_millis(),
            DataType::Timestamp(TimeUnit::Microsecond, _) => utc.timestamp_micros(),
            DataType::Timestamp(TimeUnit::Nanosecond, _) => {
                utc.timestamp_nanos_opt().ok_or_else(|| {
                    AccessError::new(format!(
                        "column {index}: timestamp {v} out of nanosecond range"
                    ))
                })?
            }
            dt => return Err(rejects(index, dt, "a timestamp")),
        };
        self.stage(index, Cell::I64(ticks))
    }
}
