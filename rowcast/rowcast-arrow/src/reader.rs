//! [`RowReader`] over one row of an Arrow `RecordBatch`.

use std::io::{BufRead, Cursor};

use arrow::{
    array::{
        Array, ArrayRef, BinaryArray, BooleanArray, Date32Array, Decimal128Array,
        Decimal256Array, FixedSizeBinaryArray, Float32Array, Float64Array, Int8Array,
        Int16Array, Int32Array, Int64Array, LargeBinaryArray, LargeStringArray, StringArray,
        Time32MillisecondArray, Time32SecondArray, Time64MicrosecondArray, Time64NanosecondArray,
        TimestampMicrosecondArray, TimestampMillisecondArray, TimestampNanosecondArray,
        TimestampSecondArray,
    },
    record_batch::RecordBatch,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use num_bigint::BigInt;
use rowcast_core::{AccessError, Decimal, RowReader};

/// Reads row `row` of `batch` positionally.
///
/// Getters require the column's physical Arrow type to match the getter
/// (`get_i32` on `Int32`, `get_timestamp` on any `Timestamp` unit, ...);
/// anything else is an [`AccessError`].
pub struct BatchRowReader<'a> {
    batch: &'a RecordBatch,
    row: usize,
}

impl<'a> BatchRowReader<'a> {
    pub fn new(batch: &'a RecordBatch, row: usize) -> Self {
        Self { batch, row }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    fn column(&self, index: usize) -> Result<&'a ArrayRef, AccessError> {
        let batch: &'a RecordBatch = self.batch;
        if index >= batch.num_columns() {
            return Err(AccessError::new(format!(
                "column {index} out of range ({} columns)",
                batch.num_columns()
            )));
        }
        if self.row >= batch.num_rows() {
            return Err(AccessError::new(format!(
                "row {} out of range ({} rows)",
                self.row,
                batch.num_rows()
            )));
        }
        Ok(batch.column(index))
    }

    fn typed<T: Array + 'static>(&self, index: usize) -> Result<&'a T, AccessError> {
        let column = self.column(index)?;
        column.as_any().downcast_ref::<T>().ok_or_else(|| {
            AccessError::new(format!(
                "column {index} has Arrow type {}, expected {}",
                column.data_type(),
                std::any::type_name::<T>()
                    .rsplit("::")
                    .next()
                    .unwrap_or_default()
            ))
        })
    }

    fn mismatch(&self, index: usize, expected: &str) -> AccessError {
        let actual = self
            .column(index)
            .map(|c| c.data_type().to_string())
            .unwrap_or_default();
        AccessError::new(format!(
            "column {index} has Arrow type {actual}, expected {expected}"
        ))
    }
}

fn out_of_range(index: usize, what: &str) -> AccessError {
    AccessError::new(format!("column {index}: {what} value out of range"))
}

impl RowReader for BatchRowReader<'_> {
    fn is_null(&self, index: usize) -> Result<bool, AccessError> {
        Ok(self.column(index)?.is_null(self.row))
    }

    fn get_bool(&self, index: usize) -> Result<bool, AccessError> {
        Ok(self.typed::<BooleanArray>(index)?.value(self.row))
    }

    fn get_i8(&self, index: usize) -> Result<i8, AccessError> {
        Ok(self.typed::<Int8Array>(index)?.value(self.row))
    }

    fn get_i16(&self, index: usize) -> Result<i16, AccessError> {
        Ok(self.typed::<Int16Array>(index)?.value(self.row))
    }

    fn get_i32(&self, index: usize) -> Result<i32, AccessError> {
        Ok(self.typed::<Int32Array>(index)?.value(self.row))
    }

    fn get_i64(&self, index: usize) -> Result<i64, AccessError> {
        Ok(self.typed::<Int64Array>(index)?.value(self.row))
    }

    fn get_f32(&self, index: usize) -> Result<f32, AccessError> {
        Ok(self.typed::<Float32Array>(index)?.value(self.row))
    }

    fn get_f64(&self, index: usize) -> Result<f64, AccessError> {
        Ok(self.typed::<Float64Array>(index)?.value(self.row))
    }

    fn get_decimal(&self, index: usize) -> Result<Decimal, AccessError> {
        let column = self.column(index)?;
        let any = column.as_any();
        if let Some(a) = any.downcast_ref::<Decimal128Array>() {
            return Ok(Decimal::new(a.value(self.row), i64::from(a.scale())));
        }
        if let Some(a) = any.downcast_ref::<Decimal256Array>() {
            let unscaled = BigInt::from_signed_bytes_le(&a.value(self.row).to_le_bytes());
            return Ok(Decimal::new(unscaled, i64::from(a.scale())));
        }
        Err(self.mismatch(index, "Decimal128 or Decimal256"))
    }

    fn get_string(&self, index: usize) -> Result<String, AccessError> {
        let column = self.column(index)?;
        let any = column.as_any();
        if let Some(a) = any.downcast_ref::<StringArray>() {
            return Ok(a.value(self.row).to_string());
        }
        if let Some(a) = any.downcast_ref::<LargeStringArray>() {
            return Ok(a.value(self.row).to_string());
        }
        Err(self.mismatch(index, "Utf8 or LargeUtf8"))
    }

    fn get_bytes(&self, index: usize) -> Result<Vec<u8>, AccessError> {
        let column = self.column(index)?;
        let any = column.as_any();
        if let Some(a) = any.downcast_ref::<BinaryArray>() {
            return Ok(a.value(self.row).to_vec());
        }
        if let Some(a) = any.downcast_ref::<LargeBinaryArray>() {
            return Ok(a.value(self.row).to_vec());
        }
        if let Some(a) = any.downcast_ref::<FixedSizeBinaryArray>() {
            return Ok(a.value(self.row).to_vec());
        }
        Err(self.mismatch(index, "Binary, LargeBinary or FixedSizeBinary"))
    }

    fn get_date(&self, index: usize) -> Result<NaiveDate, AccessError> {
        self.typed::<Date32Array>(index)?
            .value_as_date(self.row)
            .ok_or_else(|| out_of_range(index, "date"))
    }

    fn get_time(&self, index: usize) -> Result<NaiveTime, AccessError> {
        let column = self.column(index)?;
        let any = column.as_any();
        let time = if let Some(a) = any.downcast_ref::<Time64NanosecondArray>() {
            a.value_as_time(self.row)
        } else if let Some(a) = any.downcast_ref::<Time64MicrosecondArray>() {
            a.value_as_time(self.row)
        } else if let Some(a) = any.downcast_ref::<Time32MillisecondArray>() {
            a.value_as_time(self.row)
        } else if let Some(a) = any.downcast_ref::<Time32SecondArray>() {
            a.value_as_time(self.row)
        } else {
            return Err(self.mismatch(index, "Time32 or Time64"));
        };
        time.ok_or_else(|| out_of_range(index, "time"))
    }

    fn get_timestamp(&self, index: usize) -> Result<NaiveDateTime, AccessError> {
        let column = self.column(index)?;
        let any = column.as_any();
        let ts = if let Some(a) = any.downcast_ref::<TimestampNanosecondArray>() {
            a.value_as_datetime(self.row)
        } else if let Some(a) = any.downcast_ref::<TimestampMicrosecondArray>() {
            a.value_as_datetime(self.row)
        } else if let Some(a) = any.downcast_ref::<TimestampMillisecondArray>() {
            a.value_as_datetime(self.row)
        } else if let Some(a) = any.downcast_ref::<TimestampSecondArray>() {
            a.value_as_datetime(self.row)
        } else {
            return Err(self.mismatch(index, "Timestamp"));
        };
        ts.ok_or_else(|| out_of_range(index, "timestamp"))
    }

    fn get_character_stream(&self, index: usize) -> Result<Box<dyn BufRead + '_>, AccessError> {
        let column = self.column(index)?;
        let any = column.as_any();
        let text: &str = if let Some(a) = any.downcast_ref::<LargeStringArray>() {
            a.value(self.row)
        } else if let Some(a) = any.downcast_ref::<StringArray>() {
            a.value(self.row)
        } else {
            return Err(self.mismatch(index, "Utf8 or LargeUtf8"));
        };
        Ok(Box::new(Cursor::new(text.as_bytes())))
    }
}
