use std::collections::BTreeMap;

use crate::error::GenerateError;
use crate::idl::Schema;

/// Flat substitution table: schema type token → target type token.
pub type TypeMapping = BTreeMap<String, String>;

/// Replace a single type token by its table entry, or pass it through.
///
/// Lookup is exact: `[]int` is only rewritten if the table has `[]int` itself.
pub fn map_type(token: &str, mapping: &TypeMapping) -> String {
    mapping
        .get(token)
        .cloned()
        .unwrap_or_else(|| token.to_string())
}

/// Clone `schema` with every field type and method input/output rewritten
/// through `mapping`.
///
/// The source schema is never modified; it stays valid for the next template
/// of the run. An empty table still returns an independent clone.
///
/// # Errors
///
/// Returns [`GenerateError::EmptyTypeMapping`] if a table entry maps to an
/// empty token, which would leave a field without a type.
pub fn apply_type_mapping(schema: &Schema, mapping: &TypeMapping) -> Result<Schema, GenerateError> {
    if let Some((from, _)) = mapping.iter().find(|(_, to)| to.is_empty()) {
        return Err(GenerateError::EmptyTypeMapping { from: from.clone() });
    }

    let mut transformed = schema.clone();
    if mapping.is_empty() {
        return Ok(transformed);
    }

    for message in &mut transformed.messages {
        for field in message.fields.values_mut() {
            field.ty = map_type(&field.ty, mapping);
        }
    }
    for service in &mut transformed.services {
        for method in &mut service.methods {
            method.input = map_type(&method.input, mapping);
            method.output = map_type(&method.output, mapping);
        }
    }
    Ok(transformed)
}
