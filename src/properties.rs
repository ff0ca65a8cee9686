//! Parser for the `.properties` file describing a Graphalytics graph.
//!
//! Only lines of the form `graph.<name>.<key> = <value>` are retained. The
//! `<name>` component is fixed by the first such line and stripped from the
//! stored keys, so `graph.example.directed = true` is stored as
//! `directed -> true`.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{ConvertError, IoContext, Result};

pub const PROPERTY_FILE: &str = "property-file";
pub const NAME: &str = "name";
pub const VERTEX_FILE: &str = "vertex-file";
pub const EDGE_FILE: &str = "edge-file";
pub const DIRECTED: &str = "directed";
pub const EDGE_PROPERTY_NAMES: &str = "edge-properties.names";
pub const ALGORITHMS: &str = "algorithms";
pub const META_VERTICES: &str = "meta.vertices";
pub const META_EDGES: &str = "meta.edges";

/// String-keyed view over a parsed property file. Immutable once loaded.
#[derive(Clone, Debug, Default)]
pub struct Properties {
    values: HashMap<String, String>,
}

impl Properties {
    /// Load the property file at `path`, resolving the companion vertex and
    /// edge files against its directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Properties> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConvertError::config(format!("the given file does not exist: {}", path.display())));
        }
        let path = fs::canonicalize(path).with_path(path)?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

        debug!(path = %path.display(), "parsing the property file");
        let file = File::open(&path).with_path(&path)?;
        let mut properties = Properties::parse(BufReader::new(file), &base_dir, &path)?;
        properties
            .values
            .entry(PROPERTY_FILE.to_string())
            .or_insert_with(|| path.display().to_string());
        properties.require(VERTEX_FILE)?;
        properties.require(EDGE_FILE)?;
        Ok(properties)
    }

    /// Parse the content of a property file. Relative companion paths are
    /// joined onto `base_dir`; `origin` only names the source in errors.
    pub fn parse<R: BufRead>(input: R, base_dir: &Path, origin: &Path) -> Result<Properties> {
        let mut values = HashMap::new();
        let mut name: Option<String> = None;

        for line in input.lines() {
            let line = line.with_path(origin)?;
            let Some((key, value)) = split_property(&line) else { continue };

            if name.is_none() {
                let Some((graph, _)) = key.split_once('.') else {
                    return Err(ConvertError::config(format!(
                        "cannot parse the name of the graph (expected graph.<GRAPH_NAME>.<PROPERTY_NAME>), key=graph.{}", key
                    )));
                };
                debug!(name = graph, "graph name");
                values.insert(NAME.to_string(), graph.to_string());
                name = Some(graph.to_string());
            }
            let graph = name.as_deref().unwrap_or_default();

            let Some(key) = key.strip_prefix(graph).and_then(|k| k.strip_prefix('.')) else {
                warn!(line = %line, expected = graph, "line skipped, the graph name does not match");
                continue;
            };

            let value = if key == VERTEX_FILE || key == EDGE_FILE {
                resolve(base_dir, value).display().to_string()
            } else {
                value.to_string()
            };

            debug!(key, value = %value, "property");
            values.entry(key.to_string()).or_insert(value);
        }

        Ok(Properties { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The value of `key`, or the empty string when absent.
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| ConvertError::config(format!("the property `{}' is not set in the property file", key)))
    }

    /// Parse `key` as a number, `None` when absent or malformed.
    pub fn parse_hint<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| v.parse().ok())
    }
}

/// Interpret a yes/no property value.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" => Some(true),
        "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

// `graph.<key> = <value> [# comment]`
fn split_property(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim_start().strip_prefix("graph.")?;
    let (key, value) = rest.split_once('=')?;
    let key = key.trim_end();
    let valid = |b: u8| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-');
    if key.is_empty() || !key.bytes().all(valid) {
        return None;
    }
    let value = value.split_once('#').map_or(value, |(v, _)| v).trim();
    if value.is_empty() { None } else { Some((key, value)) }
}

fn resolve(base_dir: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() { path.to_path_buf() } else { base_dir.join(path) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Properties> {
        Properties::parse(text.as_bytes(), Path::new("/data"), Path::new("test.properties"))
    }

    #[test]
    fn strips_graph_name_and_comments() {
        let props = parse(
            "# a comment\n\
             graph.example.directed = false # trailing\n\
             graph.example.meta.vertices=10\n\
             graph.example.algorithms = bfs, pr\n\
             not a property\n",
        )
        .unwrap();

        assert_eq!(props.get(NAME), Some("example"));
        assert_eq!(props.get(DIRECTED), Some("false"));
        assert_eq!(props.get(META_VERTICES), Some("10"));
        assert_eq!(props.get(ALGORITHMS), Some("bfs, pr"));
        assert_eq!(props.get_or_empty("missing"), "");
        assert_eq!(props.parse_hint::<u64>(META_VERTICES), Some(10));
    }

    #[test]
    fn resolves_companion_files() {
        let props = parse(
            "graph.g.vertex-file = g.v\n\
             graph.g.edge-file = /abs/g.e\n",
        )
        .unwrap();
        assert_eq!(props.get(VERTEX_FILE), Some("/data/g.v"));
        assert_eq!(props.get(EDGE_FILE), Some("/abs/g.e"));
    }

    #[test]
    fn first_occurrence_wins_and_foreign_graphs_are_skipped() {
        let props = parse(
            "graph.g.directed = true\n\
             graph.g.directed = false\n\
             graph.other.meta.edges = 5\n",
        )
        .unwrap();
        assert_eq!(props.get(DIRECTED), Some("true"));
        assert!(!props.contains(META_EDGES));
    }

    #[test]
    fn empty_values_do_not_match() {
        let props = parse("graph.g.directed = true\ngraph.g.algorithms = # nothing\n").unwrap();
        assert!(!props.contains(ALGORITHMS));
    }

    #[test]
    fn rejects_a_key_without_graph_name() {
        let err = parse("graph.directed = true\n").unwrap_err();
        assert!(matches!(err, ConvertError::Config { .. }));
    }

    #[test]
    fn flags() {
        assert_eq!(parse_flag("Yes"), Some(true));
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("no"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn load_requires_companion_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("g.properties");
        fs::write(&path, "graph.g.vertex-file = g.v\n").unwrap();
        let err = Properties::load(&path).unwrap_err();
        assert!(err.to_string().contains("edge-file"), "{}", err);

        let err = Properties::load(dir.path().join("missing.properties")).unwrap_err();
        assert!(matches!(err, ConvertError::Config { .. }));
    }
}
