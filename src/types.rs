//! Core types for collector schema generation.

/// Declared field type marking a duration. Durations are `int64` in the
/// collector but serialize as strings like `"5s"`.
pub const DURATION_TYPE: &str = "time.Duration";

/// Default limit on nested struct levels below a component's top-level fields.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Descriptor file extensions picked up while walking the metadata directory.
pub const DESCRIPTOR_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Derive the pattern key for a name: the name itself, optionally followed by
/// `/`-separated suffixes (e.g. `otlp` matches `otlp` and `otlp/2`).
///
/// The name is not regex-escaped.
pub fn derived_pattern(name: &str) -> String {
    format!("^{}(/[^/]+)*$", name)
}

/// Kind of a configuration field as declared in a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    String,
    Int64,
    Int,
    Float64,
    Map,
    Struct,
}

impl FieldKind {
    /// Parse a descriptor `kind` value.
    ///
    /// Returns `None` for unknown kinds (caller emits an untyped fragment).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bool" => Some(FieldKind::Bool),
            "string" => Some(FieldKind::String),
            "int64" => Some(FieldKind::Int64),
            "int" => Some(FieldKind::Int),
            "float64" => Some(FieldKind::Float64),
            "map" => Some(FieldKind::Map),
            "struct" => Some(FieldKind::Struct),
            _ => None,
        }
    }
}

/// Pipeline component categories recognized in the root document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Exporters,
    Extensions,
    Processors,
    Receivers,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Exporters,
        Category::Extensions,
        Category::Processors,
        Category::Receivers,
    ];

    /// Key under the root document's `properties`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Exporters => "exporters",
            Category::Extensions => "extensions",
            Category::Processors => "processors",
            Category::Receivers => "receivers",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::Exporters => "An exporter is how data gets sent to different systems/back-ends. Generally, an exporter translates the internal format into another defined format.",
            Category::Extensions => "Extensions provide capabilities on top of the primary functionality of the collector.",
            Category::Processors => "Processors are used at various stages of a pipeline. Generally, a processor pre-processes data before it is exported (e.g. modify attributes or sample) or helps ensure that data makes it through a pipeline successfully (e.g. batch/retry).",
            Category::Receivers => "A receiver is how data gets into the OpenTelemetry Collector.",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Category::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// Telemetry signals a `service.pipelines` entry can be named after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Logs,
    Metrics,
    Traces,
}

impl Signal {
    pub const ALL: [Signal; 3] = [Signal::Logs, Signal::Metrics, Signal::Traces];

    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Logs => "logs",
            Signal::Metrics => "metrics",
            Signal::Traces => "traces",
        }
    }
}

/// How a component's fields are keyed in its schema.
#[derive(Clone, Copy)]
pub enum AddressMode {
    /// `properties`, keyed by field name.
    Exact,
    /// `patternProperties`, keyed by the transformed field name.
    Pattern(fn(&str) -> String),
}

impl std::fmt::Debug for AddressMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressMode::Exact => f.write_str("Exact"),
            AddressMode::Pattern(_) => f.write_str("Pattern(..)"),
        }
    }
}

impl AddressMode {
    /// Pattern addressing with [`derived_pattern`].
    pub fn pattern() -> Self {
        AddressMode::Pattern(derived_pattern)
    }

    pub(crate) fn container_key(&self) -> &'static str {
        match self {
            AddressMode::Exact => "properties",
            AddressMode::Pattern(_) => "patternProperties",
        }
    }

    pub(crate) fn key_for(&self, name: &str) -> String {
        match self {
            AddressMode::Exact => name.to_string(),
            AddressMode::Pattern(transform) => transform(name),
        }
    }
}

/// What to do when two descriptor files yield the same component name
/// within one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Later file (in path order) replaces the earlier one.
    #[default]
    Overwrite,
    /// Abort generation.
    Reject,
}

/// Options for generating the collector schema.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// When true, a component whose schema could only be partially built
    /// aborts generation instead of being emitted as-is.
    pub strict: bool,
    pub on_duplicate: DuplicatePolicy,
    /// Maximum nested struct depth before recursion stops.
    pub max_depth: usize,
}

impl GenerateOptions {
    /// Lenient options: partial components accepted, duplicates overwrite.
    pub fn new() -> Self {
        Self {
            strict: false,
            on_duplicate: DuplicatePolicy::Overwrite,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn on_duplicate(mut self, policy: DuplicatePolicy) -> Self {
        self.on_duplicate = policy;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self::new()
    }
}
