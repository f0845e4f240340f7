use std::fmt::{Error, Write as _};

use super::FieldDef;

/// Format field definitions one per line:
/// `name: { type: DECIMAL(10, 2), nullable: true }`.
///
/// Large-object text fields carry an extra `lob: true` entry.
pub fn format_field_defs(fields: impl AsRef<[FieldDef]>) -> Result<String, Error> {
    let mut out = String::new();
    for field in fields.as_ref() {
        write!(
            out,
            "{}: {{ type: {}, nullable: {}",
            field.name,
            field.type_display(),
            field.nullable
        )?;
        if field.large_object {
            out.push_str(", lob: true");
        }
        out.push_str(" }\n");
    }
    Ok(out)
}
