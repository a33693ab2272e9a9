//! Sanity check for generated documents.

use serde_json::Value;

use crate::error::GenerateError;

/// Compile `schema` as a JSON Schema.
///
/// Derived pattern keys are not escaped, so a component name containing
/// regex syntax can yield an uncompilable `patternProperties` key.
///
/// # Errors
///
/// Returns `GenerateError::InvalidSchema` if the document doesn't compile.
/// The message leads with the JSON pointer of the offending location, e.g.
/// `/properties/receivers/patternProperties`.
pub fn check_schema(schema: &Value) -> Result<(), GenerateError> {
    jsonschema::validator_for(schema)
        .map(|_| ())
        .map_err(|e| GenerateError::InvalidSchema {
            message: format!("{}: {}", e.instance_path, e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::ComponentIndex;
    use crate::assemble::{assemble, CategoryDescriptions};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn collector_schema() -> Value {
        let mut receivers = ComponentIndex::new();
        receivers.insert(
            "otlp",
            json!({
                "type": ["object", "null"],
                "additionalProperties": false,
                "properties": {
                    "endpoint": {"type": "string", "default": "0.0.0.0:4317"}
                }
            }),
        );
        let mut categories = BTreeMap::new();
        categories.insert("receivers".to_string(), receivers);
        assemble(&categories, &CategoryDescriptions::collector()).unwrap()
    }

    #[test]
    fn assembled_document_compiles() {
        assert!(check_schema(&collector_schema()).is_ok());
    }

    #[test]
    fn uncompilable_pattern_names_its_category() {
        let mut receivers = ComponentIndex::new();
        receivers.insert(
            "a(b",
            json!({"type": ["object", "null"], "additionalProperties": false, "properties": {}}),
        );
        let mut categories = BTreeMap::new();
        categories.insert("receivers".to_string(), receivers);
        let doc = assemble(&categories, &CategoryDescriptions::collector()).unwrap();

        match check_schema(&doc) {
            Err(GenerateError::InvalidSchema { message }) => {
                assert!(
                    message.starts_with("/properties/receivers/patternProperties"),
                    "unexpected message: {}",
                    message
                );
            }
            other => panic!("expected InvalidSchema, got {:?}", other),
        }
    }

    #[test]
    fn accepts_matching_config_and_rejects_unknown_component() {
        let validator = jsonschema::validator_for(&collector_schema()).unwrap();

        let config = json!({
            "receivers": {
                "otlp": {"endpoint": "localhost:4317"},
                "otlp/internal": null
            },
            "service": {
                "pipelines": {
                    "traces": {"receivers": ["otlp"], "exporters": ["debug"]},
                    "traces/2": {"receivers": ["otlp/internal"]}
                }
            }
        });
        assert!(validator.is_valid(&config));

        let unknown = json!({"receivers": {"jaeger": {}}});
        assert!(!validator.is_valid(&unknown));

        let wrong_type = json!({"receivers": {"otlp": {"endpoint": 4317}}});
        assert!(!validator.is_valid(&wrong_type));
    }
}
