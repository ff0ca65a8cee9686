use std::path::{Path, PathBuf};

use crate::remap::VertexOrder;

/// Everything a conversion needs to know besides the input graph itself.
#[derive(Clone, Debug)]
pub struct ConvertConfig {
    /// Property file of the input graph.
    pub input: PathBuf,
    /// Output path; a trailing `.properties` is ignored.
    pub output: PathBuf,
    /// Deflate the vertex and edge lists.
    pub compress: bool,
    /// Assign the dense ids following the order of the vertex list.
    pub sorted_order: bool,
    /// Seed for the weights synthesized for unweighted graphs.
    pub seed: Option<u64>,
    pub max_weight: f64,
}

impl ConvertConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> ConvertConfig {
        ConvertConfig {
            input: input.into(),
            output: output.into(),
            compress: false,
            sorted_order: false,
            seed: None,
            max_weight: 1.0,
        }
    }

    pub fn vertex_order(&self) -> VertexOrder {
        if self.sorted_order { VertexOrder::Declared } else { VertexOrder::FirstSeen }
    }

    pub fn output_prefix(&self) -> PathBuf {
        let output = self.output.to_string_lossy();
        match output.strip_suffix(".properties") {
            Some(prefix) if !prefix.is_empty() => PathBuf::from(prefix),
            _ => self.output.clone(),
        }
    }

    pub fn properties_path(&self) -> PathBuf {
        with_suffix(&self.output_prefix(), ".properties")
    }

    pub fn vertex_path(&self) -> PathBuf {
        with_suffix(&self.output_prefix(), self.vertex_suffix())
    }

    pub fn edge_path(&self) -> PathBuf {
        with_suffix(&self.output_prefix(), self.edge_suffix())
    }

    pub fn vertex_suffix(&self) -> &'static str {
        if self.compress { ".vz" } else { ".v" }
    }

    pub fn edge_suffix(&self) -> &'static str {
        if self.compress { ".ez" } else { ".e" }
    }
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut path = prefix.as_os_str().to_owned();
    path.push(suffix);
    PathBuf::from(path)
}
