//! Component metadata descriptors.
//!
//! One YAML file per component, as produced by the collector's `cfgmetadatagen`:
//!
//! ```yaml
//! type: '*otlpreceiver.Config'
//! doc: OTLP receiver configuration.
//! fields:
//! - name: endpoint
//!   kind: string
//!   default: 0.0.0.0:4317
//! - name: timeout
//!   kind: int64
//!   type: time.Duration
//!   default: 5s
//! - name: tls
//!   kind: struct
//!   fields:
//!   - name: insecure
//!     kind: bool
//! ```
//!
//! Files are parsed into a generic value tree first; the typed descriptors
//! are lifted from it. Nested struct fields stay raw until the mapper walks
//! them, so a malformed nested entry only spoils its own struct.

use std::path::Path;

use serde_json::Value;

use crate::error::GenerateError;
use crate::types::FieldKind;

/// One component's configuration metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDescriptor {
    /// Go type name of the config struct (informational only).
    pub declared_type: Option<String>,
    pub doc: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

/// One configuration field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    /// `None` when the descriptor's `kind` is missing or not recognized.
    pub kind: Option<FieldKind>,
    /// Declared Go type; only [`crate::types::DURATION_TYPE`] changes the mapping.
    pub declared_type: Option<String>,
    /// `Some(Value::Null)` when the key is present with a null value.
    pub default: Option<Value>,
    pub doc: Option<String>,
    /// Raw `fields` entry for struct kinds, walked lazily by the mapper.
    pub fields: Option<Value>,
}

impl ComponentDescriptor {
    /// Lift a component descriptor from a parsed value tree.
    ///
    /// Fails if the top level is not a mapping, has no `fields` sequence,
    /// or any top-level field is malformed.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        let map = value
            .as_object()
            .ok_or_else(|| format!("expected a mapping, got {}", json_type_name(value)))?;

        let fields = match map.get("fields") {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    FieldDescriptor::from_value(item).map_err(|e| format!("field #{}: {}", i, e))
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(format!(
                    "'fields' must be a sequence, got {}",
                    json_type_name(other)
                ))
            }
            None => return Err("missing 'fields'".to_string()),
        };

        Ok(Self {
            declared_type: string_entry(value, "type"),
            doc: string_entry(value, "doc"),
            fields,
        })
    }
}

impl FieldDescriptor {
    /// Lift a field descriptor from a parsed value tree.
    ///
    /// Only a mapping with a string `name` is required; every other key is
    /// optional and ignored when it has the wrong type.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        let map = value
            .as_object()
            .ok_or_else(|| format!("expected a mapping, got {}", json_type_name(value)))?;

        let name = match map.get("name") {
            Some(Value::String(name)) => name.clone(),
            Some(other) => {
                return Err(format!(
                    "'name' must be a string, got {}",
                    json_type_name(other)
                ))
            }
            None => return Err("missing 'name'".to_string()),
        };

        Ok(Self {
            name,
            kind: map
                .get("kind")
                .and_then(Value::as_str)
                .and_then(FieldKind::parse),
            declared_type: string_entry(value, "type"),
            default: map.get("default").cloned(),
            doc: string_entry(value, "doc"),
            fields: map.get("fields").cloned(),
        })
    }
}

/// Load and lift a descriptor file.
///
/// # Errors
///
/// Returns `GenerateError::ReadError` if the file can't be read,
/// `GenerateError::InvalidYaml` if it isn't YAML, or
/// `GenerateError::InvalidDescriptor` if it doesn't have descriptor shape.
pub fn load_descriptor(path: &Path) -> Result<ComponentDescriptor, GenerateError> {
    let content = std::fs::read_to_string(path).map_err(|source| GenerateError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    let value = parse_descriptor_str(&content).map_err(|source| GenerateError::InvalidYaml {
        path: path.to_path_buf(),
        source,
    })?;

    ComponentDescriptor::from_value(&value).map_err(|message| GenerateError::InvalidDescriptor {
        path: path.to_path_buf(),
        message,
    })
}

/// Parse descriptor text into a generic value tree.
///
/// JSON has no NaN or infinity, so YAML `.nan`/`.inf` values (typically a
/// `default`) become `null`. Each such value is logged as a warning with
/// its location.
pub fn parse_descriptor_str(content: &str) -> Result<Value, serde_yaml::Error> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    for path in non_finite_paths(&yaml) {
        tracing::warn!(path = %path, "non-finite number has no JSON form, emitting null");
    }
    serde_yaml::from_value(yaml)
}

/// Dotted locations of non-finite numbers, e.g. `fields[2].default`.
fn non_finite_paths(value: &serde_yaml::Value) -> Vec<String> {
    let mut paths = Vec::new();
    collect_non_finite(value, String::new(), &mut paths);
    paths
}

fn collect_non_finite(value: &serde_yaml::Value, path: String, paths: &mut Vec<String>) {
    match value {
        serde_yaml::Value::Number(n) if !n.is_finite() => paths.push(path),
        serde_yaml::Value::Sequence(items) => {
            for (i, item) in items.iter().enumerate() {
                collect_non_finite(item, format!("{}[{}]", path, i), paths);
            }
        }
        serde_yaml::Value::Mapping(map) => {
            for (key, item) in map {
                let key = match key {
                    serde_yaml::Value::String(s) => s.clone(),
                    other => format!("{:?}", other),
                };
                let child = if path.is_empty() {
                    key
                } else {
                    format!("{}.{}", path, key)
                };
                collect_non_finite(item, child, paths);
            }
        }
        serde_yaml::Value::Tagged(tagged) => collect_non_finite(&tagged.value, path, paths),
        _ => {}
    }
}

fn string_entry(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
