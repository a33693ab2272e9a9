//! Component-level schema construction.

use serde_json::{json, Map, Value};

use crate::descriptor::ComponentDescriptor;
use crate::mapper::{map_field_inner, Synthesized};
use crate::types::AddressMode;

/// Build the schema for one component's configuration block.
///
/// The block is a closed object that may also be `null` (an absent or empty
/// config section is valid). Fields are keyed under `properties` or, in
/// pattern mode, `patternProperties` with transformed keys.
pub fn build_component(
    component: &ComponentDescriptor,
    mode: AddressMode,
    max_depth: usize,
) -> Synthesized {
    let mut issues = Vec::new();
    let mut fields = Map::new();

    for field in &component.fields {
        let schema = map_field_inner(field, &field.name, 0, max_depth, &mut issues);
        fields.insert(mode.key_for(&field.name), schema);
    }

    let mut schema = Map::new();
    schema.insert("type".into(), json!(["object", "null"]));
    schema.insert("additionalProperties".into(), json!(false));
    if let Some(doc) = &component.doc {
        schema.insert("description".into(), json!(doc));
    }
    schema.insert(mode.container_key().into(), Value::Object(fields));

    Synthesized::from_parts(Value::Object(schema), issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StructuralIssue;
    use crate::mapper::map_field;
    use crate::types::DEFAULT_MAX_DEPTH;

    fn component(value: Value) -> ComponentDescriptor {
        ComponentDescriptor::from_value(&value).unwrap()
    }

    #[test]
    fn exact_mode_uses_properties() {
        let c = component(json!({
            "type": "*batchprocessor.Config",
            "doc": "Batch processor.",
            "fields": [
                {"name": "timeout", "kind": "int64", "type": "time.Duration", "default": "200ms"},
                {"name": "send_batch_size", "kind": "int", "default": 8192}
            ]
        }));

        let schema = build_component(&c, AddressMode::Exact, DEFAULT_MAX_DEPTH)
            .into_complete()
            .unwrap();
        assert_eq!(
            schema,
            json!({
                "type": ["object", "null"],
                "additionalProperties": false,
                "description": "Batch processor.",
                "properties": {
                    "timeout": {"type": "string", "default": "200ms"},
                    "send_batch_size": {"type": "integer", "default": 8192}
                }
            })
        );
    }

    #[test]
    fn pattern_mode_transforms_keys() {
        let c = component(json!({
            "fields": [{"name": "endpoint", "kind": "string"}]
        }));

        let schema = build_component(&c, AddressMode::pattern(), DEFAULT_MAX_DEPTH).into_schema();
        assert!(schema.get("properties").is_none());
        assert!(schema.get("description").is_none());
        assert_eq!(
            schema["patternProperties"],
            json!({"^endpoint(/[^/]+)*$": {"type": "string"}})
        );

        fn shout(name: &str) -> String {
            name.to_uppercase()
        }
        let schema = build_component(&c, AddressMode::Pattern(shout), DEFAULT_MAX_DEPTH).into_schema();
        assert!(schema["patternProperties"].get("ENDPOINT").is_some());
    }

    #[test]
    fn fields_match_independent_mapping() {
        let c = component(json!({
            "fields": [
                {"name": "tls", "kind": "struct", "fields": [{"name": "insecure", "kind": "bool"}]},
                {"name": "headers", "kind": "map"}
            ]
        }));

        let schema = build_component(&c, AddressMode::Exact, DEFAULT_MAX_DEPTH).into_schema();
        for field in &c.fields {
            assert_eq!(
                &schema["properties"][&field.name],
                map_field(field, DEFAULT_MAX_DEPTH).schema()
            );
        }
    }

    #[test]
    fn partial_field_makes_component_partial() {
        let c = component(json!({
            "fields": [
                {"name": "endpoint", "kind": "string"},
                {"name": "buffer", "kind": "struct"}
            ]
        }));

        let result = build_component(&c, AddressMode::Exact, DEFAULT_MAX_DEPTH);
        assert_eq!(
            result.issues(),
            &[StructuralIssue::MissingNestedFields {
                field: "buffer".into()
            }]
        );
        // both fields still present
        assert_eq!(result.schema()["properties"].as_object().unwrap().len(), 2);
    }

    #[test]
    fn empty_component() {
        let c = component(json!({"type": "Config", "fields": []}));
        let schema = build_component(&c, AddressMode::Exact, DEFAULT_MAX_DEPTH)
            .into_complete()
            .unwrap();
        assert_eq!(schema["properties"], json!({}));
    }
}
