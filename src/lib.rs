//! OpenTelemetry Collector Schema Generator
//!
//! Builds a JSON Schema (2020-12) for collector configuration files from the
//! per-component metadata emitted by `cfgmetadatagen`.
//!
//! The metadata directory holds one YAML descriptor per component, grouped by
//! kind (`receiver/otlp.yaml`, `exporter/debug.yaml`, ...). Each descriptor's
//! fields are mapped to schema fragments, grouped by category, and assembled
//! into one root document with a fixed `service` section.
//!
//! # Example
//!
//! ```
//! use otelcol_schema::{build_component, AddressMode, ComponentDescriptor, DEFAULT_MAX_DEPTH};
//! use serde_json::json;
//!
//! let descriptor = ComponentDescriptor::from_value(&json!({
//!     "type": "*batchprocessor.Config",
//!     "fields": [
//!         { "name": "timeout", "kind": "int64", "type": "time.Duration", "default": "200ms" },
//!         { "name": "send_batch_size", "kind": "int", "default": 8192 }
//!     ]
//! }))
//! .unwrap();
//!
//! let schema = build_component(&descriptor, AddressMode::Exact, DEFAULT_MAX_DEPTH)
//!     .into_complete()
//!     .unwrap();
//!
//! // Durations are written as strings ("5s"), so they map to string.
//! assert_eq!(schema["properties"]["timeout"]["type"], "string");
//! assert_eq!(schema["properties"]["send_batch_size"]["default"], 8192);
//! ```
//!
//! # Kind Mapping
//!
//! | Kind | Schema type |
//! |------|-------------|
//! | `bool` | `boolean` |
//! | `string` | `string` |
//! | `int64` | `integer` (`string` for `time.Duration`) |
//! | `int` | `integer` |
//! | `float64` | `number` |
//! | `map` | `object` with string values |
//! | `struct` | closed `object`, one property per nested field |
//!
//! # Addressing
//!
//! Every component is reachable both by name (`otlp`) and by the derived
//! pattern `^otlp(/[^/]+)*$`, so named instances like `otlp/internal` in a
//! collector config validate against the same schema.

mod aggregate;
mod assemble;
mod check;
mod component;
mod descriptor;
mod error;
mod mapper;
mod types;

pub use aggregate::{aggregate, Aggregation, ComponentIndex, PartialComponent};
pub use assemble::{
    assemble, generate, service_schema, CategoryDescriptions, SCHEMA_DIALECT, SCHEMA_ID,
    SCHEMA_TITLE,
};
pub use check::check_schema;
pub use component::build_component;
pub use descriptor::{load_descriptor, parse_descriptor_str, ComponentDescriptor, FieldDescriptor};
pub use error::{GenerateError, StructuralIssue};
pub use mapper::{map_field, Synthesized};
pub use types::{
    derived_pattern, AddressMode, Category, DuplicatePolicy, FieldKind, GenerateOptions, Signal,
    DEFAULT_MAX_DEPTH, DURATION_TYPE,
};
