//! Per-field conversion closures, selected once from the field's type root.

use rowcast_core::{
    AccessError, CastError, ColumnKind, ColumnValue, DEFAULT_TIMESTAMP_PRECISION, FieldDef,
    FieldDefs, LogicalTypeRoot, MAX_TIMESTAMP_PRECISION, RowReader, RowWriter,
    TargetKind, materialize_text,
};

use crate::{
    error::{BindError, FieldFailure},
    policy::{BooleanPolicy, TinyIntPolicy},
};

pub(crate) type DeserializeFn =
    Box<dyn Fn(&dyn RowReader, usize) -> Result<ColumnValue, FieldFailure> + Send + Sync>;

pub(crate) type SerializeFn =
    Box<dyn Fn(&ColumnValue, usize, &mut dyn RowWriter) -> Result<(), FieldFailure> + Send + Sync>;

pub(crate) struct FieldCodec {
    pub(crate) deserialize: DeserializeFn,
    pub(crate) serialize: SerializeFn,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Policies {
    pub(crate) tiny_int: TinyIntPolicy,
    pub(crate) boolean: BooleanPolicy,
}

/// Field index → closure pair. Fixed size, never mutated after [`build`].
///
/// [`build`]: DispatchTable::build
pub(crate) struct DispatchTable(Box<[FieldCodec]>);

impl DispatchTable {
    /// Builds every entry or none.
    pub(crate) fn build(fields: &FieldDefs, policies: Policies) -> Result<Self, BindError> {
        let codecs = fields
            .iter()
            .enumerate()
            .map(|(index, field)| codec_for(index, field, policies))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(codecs.into_boxed_slice()))
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &FieldCodec> {
        self.0.iter()
    }
}

fn codec_for(index: usize, field: &FieldDef, policies: Policies) -> Result<FieldCodec, BindError> {
    let root = field.type_root;
    let codec = match root {
        LogicalTypeRoot::Boolean => match policies.boolean {
            BooleanPolicy::Native => FieldCodec {
                deserialize: Box::new(|r, i| Ok(ColumnValue::boolean(r.get_bool(i)?))),
                serialize: write_with(root, ColumnValue::as_bool, |w, i, v| w.set_bool(i, v)),
            },
            BooleanPolicy::Byte => FieldCodec {
                deserialize: Box::new(|r, i| Ok(ColumnValue::boolean(r.get_i8(i)? != 0))),
                serialize: write_with(root, ColumnValue::as_bool, |w, i, v| {
                    w.set_i8(i, i8::from(v))
                }),
            },
        },
        LogicalTypeRoot::TinyInt => match policies.tiny_int {
            TinyIntPolicy::Signed => FieldCodec {
                deserialize: Box::new(|r, i| Ok(ColumnValue::tiny_int(r.get_i8(i)?))),
                serialize: write_with(root, ColumnValue::as_i8, |w, i, v| w.set_i8(i, v)),
            },
            TinyIntPolicy::Unsigned => FieldCodec {
                deserialize: Box::new(|r, i| Ok(ColumnValue::tiny_int(r.get_i8(i)?))),
                serialize: write_with(root, ColumnValue::as_i8, |w, i, v| {
                    w.set_i16(i, i16::from(v as u8))
                }),
            },
        },
        LogicalTypeRoot::SmallInt => FieldCodec {
            deserialize: Box::new(|r, i| Ok(ColumnValue::small_int(r.get_i16(i)?))),
            serialize: write_with(root, ColumnValue::as_i16, |w, i, v| w.set_i16(i, v)),
        },
        LogicalTypeRoot::Integer => FieldCodec {
            deserialize: Box::new(|r, i| Ok(ColumnValue::int(r.get_i32(i)?))),
            serialize: write_with(root, ColumnValue::as_i32, |w, i, v| w.set_i32(i, v)),
        },
        LogicalTypeRoot::BigInt => FieldCodec {
            deserialize: Box::new(|r, i| Ok(ColumnValue::big_int(r.get_i64(i)?))),
            serialize: write_with(root, ColumnValue::as_i64, |w, i, v| w.set_i64(i, v)),
        },
        LogicalTypeRoot::Float => FieldCodec {
            deserialize: Box::new(|r, i| Ok(ColumnValue::float(r.get_f32(i)?)?)),
            serialize: write_with(root, ColumnValue::as_f32, |w, i, v| w.set_f32(i, v)),
        },
        LogicalTypeRoot::Double => FieldCodec {
            deserialize: Box::new(|r, i| Ok(ColumnValue::double(r.get_f64(i)?)?)),
            serialize: write_with(root, ColumnValue::as_f64, |w, i, v| w.set_f64(i, v)),
        },
        LogicalTypeRoot::Decimal => decimal_codec(field),
        LogicalTypeRoot::Char | LogicalTypeRoot::VarChar => text_codec(root, field.large_object),
        LogicalTypeRoot::Binary | LogicalTypeRoot::VarBinary => FieldCodec {
            deserialize: Box::new(|r, i| Ok(ColumnValue::bytes(r.get_bytes(i)?))),
            serialize: Box::new(move |value, i, w| match value.as_bytes()? {
                Some(b) => Ok(w.set_bytes(i, &b)?),
                None => Ok(w.set_null(i, root)?),
            }),
        },
        LogicalTypeRoot::Date => FieldCodec {
            deserialize: Box::new(|r, i| Ok(ColumnValue::date(r.get_date(i)?))),
            serialize: write_with(root, ColumnValue::as_date, |w, i, v| w.set_date(i, v)),
        },
        LogicalTypeRoot::TimeWithoutTimeZone => {
            let precision = fractional_precision(index, field, 0)?;
            FieldCodec {
                deserialize: Box::new(move |r, i| {
                    Ok(ColumnValue::time(r.get_time(i)?).with_size_hint(precision))
                }),
                serialize: write_with(root, ColumnValue::as_time, |w, i, v| w.set_time(i, v)),
            }
        }
        LogicalTypeRoot::TimestampWithoutTimeZone
        | LogicalTypeRoot::TimestampWithTimeZone
        | LogicalTypeRoot::TimestampWithLocalTimeZone => {
            let precision = fractional_precision(index, field, DEFAULT_TIMESTAMP_PRECISION)?;
            // Bounded by MAX_TIMESTAMP_PRECISION above.
            let precision = precision as u8;
            FieldCodec {
                deserialize: Box::new(move |r, i| {
                    Ok(ColumnValue::timestamp(r.get_timestamp(i)?, precision))
                }),
                serialize: write_with(root, ColumnValue::as_timestamp, |w, i, v| {
                    w.set_timestamp(i, v)
                }),
            }
        }
        LogicalTypeRoot::IntervalYearMonth
        | LogicalTypeRoot::IntervalDayTime
        | LogicalTypeRoot::Array
        | LogicalTypeRoot::Multiset
        | LogicalTypeRoot::Map
        | LogicalTypeRoot::Row
        | LogicalTypeRoot::Distinct
        | LogicalTypeRoot::Structured
        | LogicalTypeRoot::Raw
        | LogicalTypeRoot::Symbol
        | LogicalTypeRoot::Null => {
            return Err(BindError::UnsupportedType {
                index,
                name: field.name.clone(),
                type_root: root,
            });
        }
    };
    Ok(codec)
}

/// Serializer for a primitive target: fetch with `get`, bind with `set`,
/// bind SQL `NULL` for the null variant.
fn write_with<T, G, S>(root: LogicalTypeRoot, get: G, set: S) -> SerializeFn
where
    T: 'static,
    G: Fn(&ColumnValue) -> Result<Option<T>, CastError> + Send + Sync + 'static,
    S: Fn(&mut dyn RowWriter, usize, T) -> Result<(), AccessError> + Send + Sync + 'static,
{
    Box::new(move |value, index, writer| match get(value)? {
        Some(v) => Ok(set(writer, index, v)?),
        None => Ok(writer.set_null(index, root)?),
    })
}

/// Any declared precision binds; values are rescaled to the declared scale.
fn decimal_codec(field: &FieldDef) -> FieldCodec {
    let scale = field.scale.map(i64::from);
    let root = field.type_root;
    FieldCodec {
        deserialize: Box::new(move |r, i| {
            let v = r.get_decimal(i)?;
            let v = match scale {
                Some(s) => v.rescale(s).ok_or_else(|| {
                    CastError::new(ColumnKind::Decimal, TargetKind::Decimal, v.to_string())
                })?,
                None => v,
            };
            Ok(ColumnValue::decimal(v))
        }),
        serialize: Box::new(move |value, i, w| {
            let Some(v) = value.as_decimal()? else {
                return Ok(w.set_null(i, root)?);
            };
            let v = match scale {
                Some(s) => v.rescale(s).ok_or_else(|| value.cast_error(TargetKind::Decimal))?,
                None => v,
            };
            Ok(w.set_decimal(i, v)?)
        }),
    }
}

fn text_codec(root: LogicalTypeRoot, large_object: bool) -> FieldCodec {
    let deserialize: DeserializeFn = if large_object {
        Box::new(|r, i| {
            let text = materialize_text(r.get_character_stream(i)?)?;
            Ok(ColumnValue::string(text))
        })
    } else {
        Box::new(|r, i| Ok(ColumnValue::string(r.get_string(i)?)))
    };
    FieldCodec {
        deserialize,
        serialize: Box::new(move |value, i, w| match value.as_string()? {
            Some(s) => Ok(w.set_string(i, &s)?),
            None => Ok(w.set_null(i, root)?),
        }),
    }
}

fn fractional_precision(index: usize, field: &FieldDef, default: u8) -> Result<usize, BindError> {
    match field.precision {
        None => Ok(usize::from(default)),
        Some(p) if p <= u32::from(MAX_TIMESTAMP_PRECISION) => Ok(p as usize),
        Some(precision) => Err(BindError::InvalidPrecision {
            index,
            name: field.name.clone(),
            type_root: field.type_root,
            precision,
        }),
    }
}
