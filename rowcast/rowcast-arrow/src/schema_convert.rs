use std::sync::Arc;

use arrow::datatypes::{
    DECIMAL128_MAX_PRECISION, DECIMAL256_MAX_PRECISION, DataType, Field, Schema, TimeUnit,
};
use rowcast_core::{DEFAULT_TIMESTAMP_PRECISION, FieldDef, FieldDefs, LogicalTypeRoot};

use crate::error::ArrowConvertError;

const DEFAULT_DECIMAL_PRECISION: u8 = 38;
const DEFAULT_DECIMAL_SCALE: i8 = 10;

/// Converts a schema descriptor into an Arrow `Schema`.
///
/// Zone-aware timestamp roots map to UTC timestamps; the timestamp unit is
/// the coarsest one that holds the declared fractional precision. Decimals
/// up to 38 digits map to `Decimal128`, wider ones to `Decimal256`.
pub fn field_defs_to_arrow_schema(fields: &FieldDefs) -> Result<Schema, ArrowConvertError> {
    let arrow_fields = fields
        .iter()
        .map(field_def_to_arrow_field)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Schema::new(arrow_fields))
}

fn field_def_to_arrow_field(f: &FieldDef) -> Result<Field, ArrowConvertError> {
    Ok(Field::new(&f.name, field_def_to_datatype(f)?, f.nullable))
}

fn field_def_to_datatype(f: &FieldDef) -> Result<DataType, ArrowConvertError> {
    let dt = match f.type_root {
        LogicalTypeRoot::Boolean => DataType::Boolean,
        LogicalTypeRoot::TinyInt => DataType::Int8,
        LogicalTypeRoot::SmallInt => DataType::Int16,
        LogicalTypeRoot::Integer => DataType::Int32,
        LogicalTypeRoot::BigInt => DataType::Int64,
        LogicalTypeRoot::Float => DataType::Float32,
        LogicalTypeRoot::Double => DataType::Float64,
        LogicalTypeRoot::Decimal => {
            let precision = match f.precision {
                None => DEFAULT_DECIMAL_PRECISION,
                Some(p) => u8::try_from(p)
                    .ok()
                    .filter(|p| (1..=DECIMAL256_MAX_PRECISION).contains(p))
                    .ok_or_else(|| ArrowConvertError::UnsupportedPrecision {
                        name: f.name.clone(),
                        precision: p,
                    })?,
            };
            let scale = match f.scale {
                Some(s) => i8::try_from(s).map_err(|_| unsupported(f))?,
                None if f.precision.is_some() => 0,
                None => DEFAULT_DECIMAL_SCALE,
            };
            if precision <= DECIMAL128_MAX_PRECISION {
                DataType::Decimal128(precision, scale)
            } else {
                DataType::Decimal256(precision, scale)
            }
        }
        LogicalTypeRoot::Char | LogicalTypeRoot::VarChar if f.large_object => DataType::LargeUtf8,
        LogicalTypeRoot::Char | LogicalTypeRoot::VarChar => DataType::Utf8,
        LogicalTypeRoot::Binary | LogicalTypeRoot::VarBinary => DataType::Binary,
        LogicalTypeRoot::Date => DataType::Date32,
        LogicalTypeRoot::TimeWithoutTimeZone => DataType::Time64(TimeUnit::Nanosecond),
        LogicalTypeRoot::TimestampWithoutTimeZone
        | LogicalTypeRoot::TimestampWithTimeZone
        | LogicalTypeRoot::TimestampWithLocalTimeZone => {
            let precision = f
                .precision
                .unwrap_or(u32::from(DEFAULT_TIMESTAMP_PRECISION));
            let unit = match precision {
                0 => TimeUnit::Second,
                1..=3 => TimeUnit::Millisecond,
                4..=6 => TimeUnit::Microsecond,
                _ => TimeUnit::Nanosecond,
            };
            let tz = f
                .type_root
                .is_zoned()
                .then(|| Arc::from(crate::TIMESTAMP_TZ));
            DataType::Timestamp(unit, tz)
        }
        _ => return Err(unsupported(f)),
    };
    Ok(dt)
}

fn unsupported(f: &FieldDef) -> ArrowConvertError {
    ArrowConvertError::UnsupportedType {
        name: f.name.clone(),
        type_root: f.type_root,
    }
}
