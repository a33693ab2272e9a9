//! Error types for collector schema generation.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors: the generated document would be missing or meaningless.
#[derive(Debug, Error)]
pub enum GenerateError {
    // IO errors (exit code 3)
    #[error("cannot read directory {path}: {source}")]
    ReadDirError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Configuration errors (exit code 2)
    #[error("metadata directory not found: {path}")]
    MetadataDirNotFound { path: PathBuf },

    // Parse errors (exit code 2)
    #[error("invalid YAML in {path}: {source}")]
    InvalidYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid descriptor {path}: {message}")]
    InvalidDescriptor { path: PathBuf, message: String },

    // Aggregation / assembly errors (exit code 2)
    #[error("descriptor {path} is not inside a category directory")]
    Uncategorized { path: PathBuf },

    #[error("duplicate component '{name}' in {category} (from {path})")]
    DuplicateComponent {
        category: String,
        name: String,
        path: PathBuf,
    },

    #[error("component schema for {path} is incomplete: {}", issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    PartialComponent {
        path: PathBuf,
        issues: Vec<StructuralIssue>,
    },

    #[error("no description registered for category '{category}'")]
    UnknownCategory { category: String },

    #[error("generated schema is invalid: {message}")]
    InvalidSchema { message: String },
}

impl GenerateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            GenerateError::ReadDirError { .. } | GenerateError::ReadError { .. } => 3,
            _ => 2,
        }
    }
}

/// Recoverable problem found while expanding a struct field.
///
/// The enclosing schema is still emitted, minus whatever could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralIssue {
    #[error("{field}: struct has no nested field list")]
    MissingNestedFields { field: String },

    #[error("{field}: nested field #{index} is malformed: {message}")]
    MalformedNestedField {
        field: String,
        index: usize,
        message: String,
    },

    #[error("{field}: struct nesting exceeds depth limit of {limit}")]
    DepthExceeded { field: String, limit: usize },
}

impl StructuralIssue {
    /// Dotted path of the offending field (e.g. `tls.settings`).
    pub fn field(&self) -> &str {
        match self {
            StructuralIssue::MissingNestedFields { field }
            | StructuralIssue::MalformedNestedField { field, .. }
            | StructuralIssue::DepthExceeded { field, .. } => field,
        }
    }
}
