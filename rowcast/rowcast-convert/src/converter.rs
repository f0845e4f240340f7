//! Schema-bound row converter.

use std::fmt;

use rowcast_core::{ColumnValue, FieldDefs, Row, RowReader, RowWriter};
use tracing::debug;

use crate::{
    dispatch::{DispatchTable, Policies},
    error::{BindError, ConvertError},
    policy::{BooleanPolicy, TinyIntPolicy},
};

/// Converts rows between an external reader/writer shape and [`Row`].
///
/// Built once per schema. The closure for every field is chosen at bind time
/// from the field's type root; `deserialize` and `serialize` only apply the
/// prebuilt closures by position. A converter never changes after it is
/// built and can be shared read-only across worker threads.
pub struct RowConverter {
    fields: FieldDefs,
    table: DispatchTable,
    policies: Policies,
}

/// Builder for configuring [`RowConverter`].
pub struct RowConverterBuilder {
    fields: FieldDefs,
    policies: Policies,
}

impl RowConverter {
    /// Bind `fields` with the default policies.
    pub fn new(fields: impl Into<FieldDefs>) -> Result<Self, BindError> {
        Self::builder(fields).build()
    }

    /// Create a builder for [`RowConverter`].
    pub fn builder(fields: impl Into<FieldDefs>) -> RowConverterBuilder {
        RowConverterBuilder {
            fields: fields.into(),
            policies: Policies::default(),
        }
    }

    pub fn field_defs(&self) -> &FieldDefs {
        &self.fields
    }

    /// Number of bound fields.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    pub fn tiny_int_policy(&self) -> TinyIntPolicy {
        self.policies.tiny_int
    }

    pub fn boolean_policy(&self) -> BooleanPolicy {
        self.policies.boolean
    }

    /// Read one external record into a [`Row`].
    ///
    /// A null external field becomes the null value regardless of the
    /// field's declared nullability.
    pub fn deserialize(&self, reader: &dyn RowReader) -> Result<Row, ConvertError> {
        let mut values = Vec::with_capacity(self.table.len());
        for (index, (codec, field)) in self.table.iter().zip(self.fields.iter()).enumerate() {
            let is_null = reader
                .is_null(index)
                .map_err(|source| ConvertError::Access {
                    index,
                    name: field.name.clone(),
                    source,
                })?;
            let value = if is_null {
                ColumnValue::null()
            } else {
                (codec.deserialize)(reader, index).map_err(|e| e.at(index, &field.name))?
            };
            values.push(value);
        }
        Ok(Row::new(values))
    }

    /// Write `row` to the external writer, one positional call per field.
    pub fn serialize(&self, row: &Row, writer: &mut dyn RowWriter) -> Result<(), ConvertError> {
        if row.len() != self.table.len() {
            return Err(ConvertError::Arity {
                expected: self.table.len(),
                actual: row.len(),
            });
        }
        for (index, ((codec, field), value)) in self
            .table
            .iter()
            .zip(self.fields.iter())
            .zip(row.iter())
            .enumerate()
        {
            (codec.serialize)(value, index, &mut *writer)
                .map_err(|e| e.at(index, &field.name))?;
        }
        Ok(())
    }
}

impl fmt::Debug for RowConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowConverter")
            .field("fields", &self.fields)
            .field("tiny_int_policy", &self.policies.tiny_int)
            .field("boolean_policy", &self.policies.boolean)
            .finish_non_exhaustive()
    }
}

impl RowConverterBuilder {
    /// Set how `TINYINT` fields are stored externally (default: signed).
    pub fn with_tiny_int_policy(mut self, policy: TinyIntPolicy) -> Self {
        self.policies.tiny_int = policy;
        self
    }

    /// Set how `BOOLEAN` fields are stored externally (default: native).
    pub fn with_boolean_policy(mut self, policy: BooleanPolicy) -> Self {
        self.policies.boolean = policy;
        self
    }

    /// Build the dispatch table for every field.
    ///
    /// Fails on the first field whose type root has no registered handling;
    /// no converter is produced in that case.
    pub fn build(self) -> Result<RowConverter, BindError> {
        let table = DispatchTable::build(&self.fields, self.policies).inspect_err(|e| {
            debug!(error = %e, "row converter bind failed");
        })?;
        debug!(
            fields = table.len(),
            tiny_int_policy = ?self.policies.tiny_int,
            boolean_policy = ?self.policies.boolean,
            "row converter bound"
        );
        Ok(RowConverter {
            fields: self.fields,
            table,
            policies: self.policies,
        })
    }
}
