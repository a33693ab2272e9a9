//! Metadata directory aggregation.
//!
//! Walks a `cfgmetadatagen` output tree laid out as `<kind>/<component>.yaml`
//! (e.g. `receiver/otlp.yaml`) and groups component schemas by category,
//! the pluralized directory name (`receivers`).
//!
//! Files are processed in lexicographic path order, so output and duplicate
//! resolution are reproducible.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::component::build_component;
use crate::descriptor::load_descriptor;
use crate::error::{GenerateError, StructuralIssue};
use crate::mapper::Synthesized;
use crate::types::{
    derived_pattern, AddressMode, DuplicatePolicy, GenerateOptions, DESCRIPTOR_EXTENSIONS,
};

/// Component schemas of one category, addressable by exact name and by
/// derived pattern.
///
/// Both maps always hold the same schemas in the same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentIndex {
    by_name: Map<String, Value>,
    by_pattern: Map<String, Value>,
}

impl ComponentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a component schema under `name` and its derived pattern.
    ///
    /// Returns the schema previously stored under `name`, if any.
    pub fn insert(&mut self, name: &str, schema: Value) -> Option<Value> {
        self.by_pattern.insert(derived_pattern(name), schema.clone());
        self.by_name.insert(name.to_string(), schema)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.by_name.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn by_name(&self) -> &Map<String, Value> {
        &self.by_name
    }

    pub fn by_pattern(&self) -> &Map<String, Value> {
        &self.by_pattern
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// A component whose schema was emitted with structural issues.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialComponent {
    pub file: PathBuf,
    pub issues: Vec<StructuralIssue>,
}

/// Result of aggregating a metadata directory.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// Category name (e.g. `receivers`) to its components.
    pub categories: BTreeMap<String, ComponentIndex>,
    /// Components accepted despite structural issues (lenient mode only).
    pub partial: Vec<PartialComponent>,
    pub files_processed: usize,
}

/// Aggregate every descriptor under `root` into per-category indices.
///
/// # Errors
///
/// Fails if `root` doesn't exist or can't be walked, if any descriptor can't
/// be read or parsed, if a descriptor sits directly in `root`, or when
/// `options` reject a duplicate or partially built component.
pub fn aggregate(root: &Path, options: &GenerateOptions) -> Result<Aggregation, GenerateError> {
    if !root.is_dir() {
        return Err(GenerateError::MetadataDirNotFound {
            path: root.to_path_buf(),
        });
    }

    let files = collect_descriptor_files(root)?;
    let mut aggregation = Aggregation::default();

    for file in &files {
        let category = category_for(root, file)?;
        let name = component_name(file);

        let descriptor = load_descriptor(file)?;
        tracing::debug!(
            file = %file.display(),
            %category,
            component = %name,
            config_type = descriptor.declared_type.as_deref().unwrap_or(""),
            "building component schema"
        );

        let schema = match build_component(&descriptor, AddressMode::Exact, options.max_depth) {
            Synthesized::Complete(schema) => schema,
            Synthesized::Partial { schema, issues } => {
                if options.strict {
                    return Err(GenerateError::PartialComponent {
                        path: file.clone(),
                        issues,
                    });
                }
                for issue in &issues {
                    tracing::warn!(
                        file = %file.display(),
                        field = issue.field(),
                        "{}",
                        issue
                    );
                }
                aggregation.partial.push(PartialComponent {
                    file: file.clone(),
                    issues,
                });
                schema
            }
        };

        let index = aggregation.categories.entry(category.clone()).or_default();
        if index.contains(&name) {
            match options.on_duplicate {
                DuplicatePolicy::Reject => {
                    return Err(GenerateError::DuplicateComponent {
                        category,
                        name,
                        path: file.clone(),
                    });
                }
                DuplicatePolicy::Overwrite => {
                    tracing::warn!(
                        file = %file.display(),
                        %category,
                        component = %name,
                        "duplicate component name, replacing earlier schema"
                    );
                }
            }
        }
        index.insert(&name, schema);
        aggregation.files_processed += 1;
    }

    Ok(aggregation)
}

/// Category of a descriptor: its parent directory's name plus `s`.
fn category_for(root: &Path, file: &Path) -> Result<String, GenerateError> {
    file.parent()
        .filter(|parent| *parent != root)
        .and_then(Path::file_name)
        .map(|name| format!("{}s", name.to_string_lossy()))
        .ok_or_else(|| GenerateError::Uncategorized {
            path: file.to_path_buf(),
        })
}

fn component_name(file: &Path) -> String {
    file.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_descriptor(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| DESCRIPTOR_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

/// Collect all descriptor files below `root`, sorted by path.
fn collect_descriptor_files(root: &Path) -> Result<Vec<PathBuf>, GenerateError> {
    let mut files = Vec::new();
    collect_files_recursive(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), GenerateError> {
    let entries = std::fs::read_dir(dir).map_err(|source| GenerateError::ReadDirError {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| GenerateError::ReadDirError {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        // file_type() does not follow symlinks, so a link back up the tree
        // can't revisit a directory.
        let file_type = entry.file_type().map_err(|source| GenerateError::ReadDirError {
            path: path.clone(),
            source,
        })?;
        if file_type.is_dir() {
            collect_files_recursive(&path, files)?;
        } else if file_type.is_symlink() && path.is_dir() {
            tracing::debug!(path = %path.display(), "skipping symlinked directory");
        } else if path.is_file() && is_descriptor(&path) {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn index_keeps_both_addresses() {
        let mut index = ComponentIndex::new();
        assert!(index.insert("otlp", json!({"a": 1})).is_none());
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("otlp"), Some(&json!({"a": 1})));
        assert_eq!(index.by_pattern()["^otlp(/[^/]+)*$"], json!({"a": 1}));

        let previous = index.insert("otlp", json!({"a": 2}));
        assert_eq!(previous, Some(json!({"a": 1})));
        assert_eq!(index.len(), 1);
        assert_eq!(index.by_pattern().len(), 1);
        assert_eq!(index.by_pattern()["^otlp(/[^/]+)*$"], json!({"a": 2}));
    }

    #[test]
    fn category_is_pluralized_parent() {
        let root = Path::new("/meta");
        assert_eq!(
            category_for(root, Path::new("/meta/receiver/otlp.yaml")).unwrap(),
            "receivers"
        );
        assert_eq!(
            category_for(root, Path::new("/meta/receiver/contrib/kafka.yaml")).unwrap(),
            "contribs"
        );
        assert!(matches!(
            category_for(root, Path::new("/meta/otlp.yaml")),
            Err(GenerateError::Uncategorized { .. })
        ));
    }

    #[test]
    fn descriptor_extensions() {
        assert!(is_descriptor(Path::new("receiver/otlp.yaml")));
        assert!(is_descriptor(Path::new("receiver/otlp.yml")));
        assert!(!is_descriptor(Path::new("receiver/otlp.json")));
        assert!(!is_descriptor(Path::new("receiver/README")));
        assert_eq!(component_name(Path::new("receiver/otlp.yaml")), "otlp");
    }

    #[test]
    fn collects_sorted_files() {
        let dir = tempdir().unwrap();
        for sub in ["receiver", "exporter"] {
            std::fs::create_dir(dir.path().join(sub)).unwrap();
        }
        for file in [
            "receiver/zipkin.yaml",
            "receiver/otlp.yaml",
            "exporter/debug.yaml",
            "exporter/notes.txt",
        ] {
            std::fs::write(dir.path().join(file), "fields: []").unwrap();
        }

        let files = collect_descriptor_files(dir.path()).unwrap();
        let relative: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("exporter/debug.yaml"),
                PathBuf::from("receiver/otlp.yaml"),
                PathBuf::from("receiver/zipkin.yaml"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("receiver")).unwrap();
        std::fs::write(
            dir.path().join("receiver/otlp.yaml"),
            "type: Config\nfields: []\n",
        )
        .unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("receiver/loop")).unwrap();

        let files = collect_descriptor_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("receiver/otlp.yaml")]);

        let options = GenerateOptions::new().on_duplicate(DuplicatePolicy::Reject);
        let aggregation = aggregate(dir.path(), &options).unwrap();
        assert_eq!(aggregation.files_processed, 1);
        assert!(aggregation.categories["receivers"].contains("otlp"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_descriptor_files_are_collected() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("shared")).unwrap();
        std::fs::create_dir(dir.path().join("receiver")).unwrap();
        std::fs::write(dir.path().join("shared/otlp.txt"), "type: Config\nfields: []\n")
            .unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("shared/otlp.txt"),
            dir.path().join("receiver/otlp.yaml"),
        )
        .unwrap();

        let files = collect_descriptor_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("receiver/otlp.yaml")]);
    }

    #[test]
    fn missing_root_is_config_error() {
        let dir = tempdir().unwrap();
        let err = aggregate(&dir.path().join("nope"), &GenerateOptions::new()).unwrap_err();
        assert!(matches!(err, GenerateError::MetadataDirNotFound { .. }));
    }
}
