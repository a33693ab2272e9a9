//! Root schema assembly.
//!
//! Combines per-category component indices into the collector configuration
//! schema:
//!
//! ```text
//! {
//!   "$id", "$schema", "title", "type": "object", "additionalProperties": false,
//!   "properties": {
//!     "exporters" | "extensions" | "processors" | "receivers": {
//!       "description", "patternProperties": {...}, "properties": {...}
//!     },
//!     "service": { "extensions": [...], "pipelines": {...} }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{json, Map, Value};

use crate::aggregate::{aggregate, ComponentIndex};
use crate::error::GenerateError;
use crate::types::{derived_pattern, Category, GenerateOptions, Signal};

pub const SCHEMA_ID: &str =
    "https://github.com/nimbushq/otel-validator/blob/main/assets/schema.json";
pub const SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";
pub const SCHEMA_TITLE: &str = "otel";

/// Descriptions for the category sections of the root schema.
///
/// Assembly fails for any category without an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDescriptions {
    entries: BTreeMap<String, String>,
}

impl CategoryDescriptions {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The collector's four component categories.
    pub fn collector() -> Self {
        Category::ALL
            .into_iter()
            .fold(Self::new(), |table, c| table.with(c.as_str(), c.description()))
    }

    /// Register (or replace) a category's description.
    pub fn with(mut self, category: impl Into<String>, description: impl Into<String>) -> Self {
        self.entries.insert(category.into(), description.into());
        self
    }

    pub fn get(&self, category: &str) -> Option<&str> {
        self.entries.get(category).map(String::as_str)
    }
}

/// Assemble the root schema document from aggregated categories.
///
/// Categories are emitted in name order, followed by the fixed `service`
/// section.
///
/// # Errors
///
/// Returns `GenerateError::UnknownCategory` if a category has no description.
pub fn assemble(
    categories: &BTreeMap<String, ComponentIndex>,
    descriptions: &CategoryDescriptions,
) -> Result<Value, GenerateError> {
    let mut properties = Map::new();

    for (category, index) in categories {
        let description =
            descriptions
                .get(category)
                .ok_or_else(|| GenerateError::UnknownCategory {
                    category: category.clone(),
                })?;

        properties.insert(
            category.clone(),
            json!({
                "type": "object",
                "description": description,
                "additionalProperties": false,
                "patternProperties": Value::Object(index.by_pattern().clone()),
                "properties": Value::Object(index.by_name().clone()),
            }),
        );
    }

    properties.insert("service".into(), service_schema());

    Ok(json!({
        "$id": SCHEMA_ID,
        "$schema": SCHEMA_DIALECT,
        "title": SCHEMA_TITLE,
        "type": "object",
        "additionalProperties": false,
        "properties": properties,
    }))
}

/// Schema for the `service` section: enabled extensions plus pipelines named
/// after a signal, either exactly (`traces`) or with a suffix (`traces/2`).
pub fn service_schema() -> Value {
    let mut exact = Map::new();
    let mut patterned = Map::new();
    for signal in Signal::ALL {
        exact.insert(signal.as_str().to_string(), pipeline_schema());
        patterned.insert(derived_pattern(signal.as_str()), pipeline_schema());
    }

    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "extensions": string_array(),
            "pipelines": {
                "additionalProperties": false,
                "type": "object",
                "properties": exact,
                "patternProperties": patterned,
            }
        }
    })
}

fn pipeline_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "receivers": string_array(),
            "processors": string_array(),
            "exporters": string_array(),
        }
    })
}

fn string_array() -> Value {
    json!({ "type": "array", "items": { "type": "string" } })
}

/// Aggregate `metadata_dir` and assemble the collector schema in one step.
pub fn generate(metadata_dir: &Path, options: &GenerateOptions) -> Result<Value, GenerateError> {
    let aggregation = aggregate(metadata_dir, options)?;
    assemble(&aggregation.categories, &CategoryDescriptions::collector())
}
