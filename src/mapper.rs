//! Field-to-schema mapping.
//!
//! | kind | schema type | notes |
//! |------|-------------|-------|
//! | `bool` | `boolean` | |
//! | `string` | `string` | |
//! | `int64` | `integer` | `string` when declared as `time.Duration` |
//! | `int` | `integer` | |
//! | `float64` | `number` | |
//! | `map` | `object` | values are `string` |
//! | `struct` | `object` | closed, one property per nested field |
//!
//! Unknown kinds produce an untyped fragment. `default` and `doc` are copied
//! onto every fragment.

use serde_json::{json, Map, Value};

use crate::descriptor::FieldDescriptor;
use crate::error::StructuralIssue;
use crate::types::{FieldKind, DURATION_TYPE};

/// A schema fragment together with how completely it could be built.
#[derive(Debug, Clone, PartialEq)]
pub enum Synthesized {
    /// Every nested field was expanded.
    Complete(Value),
    /// Some struct could not be fully expanded; `schema` holds what was built.
    Partial {
        schema: Value,
        issues: Vec<StructuralIssue>,
    },
}

impl Synthesized {
    pub(crate) fn from_parts(schema: Value, issues: Vec<StructuralIssue>) -> Self {
        if issues.is_empty() {
            Synthesized::Complete(schema)
        } else {
            Synthesized::Partial { schema, issues }
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Synthesized::Complete(_))
    }

    pub fn schema(&self) -> &Value {
        match self {
            Synthesized::Complete(schema) | Synthesized::Partial { schema, .. } => schema,
        }
    }

    pub fn issues(&self) -> &[StructuralIssue] {
        match self {
            Synthesized::Complete(_) => &[],
            Synthesized::Partial { issues, .. } => issues,
        }
    }

    /// Take the schema, accepting partial output.
    pub fn into_schema(self) -> Value {
        match self {
            Synthesized::Complete(schema) | Synthesized::Partial { schema, .. } => schema,
        }
    }

    /// Take the schema only if it is complete.
    pub fn into_complete(self) -> Result<Value, Vec<StructuralIssue>> {
        match self {
            Synthesized::Complete(schema) => Ok(schema),
            Synthesized::Partial { issues, .. } => Err(issues),
        }
    }
}

/// Map one field descriptor to a schema fragment.
///
/// `max_depth` bounds how many struct levels below this field are expanded.
pub fn map_field(field: &FieldDescriptor, max_depth: usize) -> Synthesized {
    let mut issues = Vec::new();
    let schema = map_field_inner(field, &field.name, 0, max_depth, &mut issues);
    Synthesized::from_parts(schema, issues)
}

pub(crate) fn map_field_inner(
    field: &FieldDescriptor,
    path: &str,
    depth: usize,
    max_depth: usize,
    issues: &mut Vec<StructuralIssue>,
) -> Value {
    let mut schema = Map::new();

    if let Some(kind) = field.kind {
        match kind {
            FieldKind::Bool => {
                schema.insert("type".into(), json!("boolean"));
            }
            FieldKind::String => {
                schema.insert("type".into(), json!("string"));
            }
            FieldKind::Int64 => {
                let ty = if field.declared_type.as_deref() == Some(DURATION_TYPE) {
                    "string"
                } else {
                    "integer"
                };
                schema.insert("type".into(), json!(ty));
            }
            FieldKind::Int => {
                schema.insert("type".into(), json!("integer"));
            }
            FieldKind::Float64 => {
                schema.insert("type".into(), json!("number"));
            }
            FieldKind::Map => {
                schema.insert("type".into(), json!("object"));
                schema.insert("additionalProperties".into(), json!({ "type": "string" }));
            }
            FieldKind::Struct => {
                schema.insert("type".into(), json!("object"));
                schema.insert("additionalProperties".into(), json!(false));
                if depth >= max_depth {
                    issues.push(StructuralIssue::DepthExceeded {
                        field: path.to_string(),
                        limit: max_depth,
                    });
                } else {
                    let properties = map_nested_fields(field, path, depth, max_depth, issues);
                    schema.insert("properties".into(), Value::Object(properties));
                }
            }
        }
    } else {
        tracing::debug!(field = %path, "unrecognized field kind, emitting untyped schema");
    }

    if let Some(default) = &field.default {
        schema.insert("default".into(), default.clone());
    }

    if let Some(doc) = field.doc.as_deref().map(str::trim) {
        if !doc.is_empty() {
            schema.insert("description".into(), json!(doc));
        }
    }

    Value::Object(schema)
}

/// Expand a struct's nested fields, stopping at the first malformed entry.
fn map_nested_fields(
    field: &FieldDescriptor,
    path: &str,
    depth: usize,
    max_depth: usize,
    issues: &mut Vec<StructuralIssue>,
) -> Map<String, Value> {
    let mut properties = Map::new();

    let items = match &field.fields {
        Some(Value::Array(items)) => items,
        _ => {
            issues.push(StructuralIssue::MissingNestedFields {
                field: path.to_string(),
            });
            return properties;
        }
    };

    for (index, item) in items.iter().enumerate() {
        let child = match FieldDescriptor::from_value(item) {
            Ok(child) => child,
            Err(message) => {
                issues.push(StructuralIssue::MalformedNestedField {
                    field: path.to_string(),
                    index,
                    message,
                });
                break;
            }
        };
        let child_path = format!("{}.{}", path, child.name);
        let child_schema = map_field_inner(&child, &child_path, depth + 1, max_depth, issues);
        properties.insert(child.name, child_schema);
    }

    properties
}
