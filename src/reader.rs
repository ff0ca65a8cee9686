//! Pull-based reader for graphs in the Graphalytics format: a property file
//! plus a vertex list and an edge list, one entry per line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::edge::WeightedEdge;
use crate::error::{ConvertError, IoContext, Result};
use crate::properties::{self, Properties};

/// A line is skipped when, after leading whitespace, it is empty or starts with `#`.
pub fn is_ignored(line: &str) -> bool {
    let line = line.trim_start();
    line.is_empty() || line.starts_with('#')
}

/// Position inside one of the companion files. Dropping it closes the file.
struct LineCursor {
    path: PathBuf,
    input: BufReader<File>,
    buffer: String,
    line: u64,
}

impl LineCursor {
    fn open(path: &Path) -> Result<LineCursor> {
        debug!(path = %path.display(), "opening the input stream");
        let file = File::open(path).with_path(path)?;
        Ok(LineCursor { path: path.to_path_buf(), input: BufReader::new(file), buffer: String::new(), line: 0 })
    }

    /// Move to the next significant line, `false` at the end of the file.
    fn advance(&mut self) -> Result<bool> {
        loop {
            self.buffer.clear();
            let read = self.input.read_line(&mut self.buffer).with_path(&self.path)?;
            if read == 0 {
                return Ok(false);
            }
            self.line += 1;
            if !is_ignored(&self.buffer) {
                return Ok(true);
            }
        }
    }

    fn tokens(&self) -> std::str::SplitWhitespace<'_> {
        self.buffer.split_whitespace()
    }

    fn error(&self, reason: impl Into<String>) -> ConvertError {
        ConvertError::Parse {
            path: self.path.clone(),
            line: self.line,
            content: self.buffer.trim_end().to_string(),
            reason: reason.into(),
        }
    }

    fn parse_id(&self, token: Option<&str>, what: &str) -> Result<u64> {
        token
            .filter(|t| starts_with_digit(t))
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| self.error(format!("cannot read the {}", what)))
    }

    fn parse_weight(&self, token: Option<&str>) -> Result<f64> {
        token
            .filter(|t| starts_with_digit(t))
            .and_then(|t| t.parse().ok())
            .filter(|w: &f64| w.is_finite())
            .ok_or_else(|| self.error("cannot read the weight"))
    }
}

// numbers are unsigned and written with digits only
fn starts_with_digit(token: &str) -> bool {
    token.starts_with(|c: char| c.is_ascii_digit())
}

pub struct GraphalyticsReader {
    properties: Properties,
    vertex_path: PathBuf,
    edge_path: PathBuf,
    directed: bool,
    weighted: bool,
    vertices: Option<LineCursor>,
    edges: Option<LineCursor>,
    // reverse of the last edge, still to be reported
    pending: Option<WeightedEdge>,
    emit_both_directions: bool,
    max_weight: f64,
    rng: StdRng,
}

impl GraphalyticsReader {
    /// Open the graph described by the property file at `path`. Weights for
    /// unweighted graphs are drawn from a generator seeded with `seed`, or
    /// from entropy when no seed is given.
    pub fn open(path: impl AsRef<Path>, seed: Option<u64>) -> Result<GraphalyticsReader> {
        let properties = Properties::load(path)?;
        GraphalyticsReader::from_properties(properties, seed)
    }

    pub fn from_properties(properties: Properties, seed: Option<u64>) -> Result<GraphalyticsReader> {
        let vertex_path = PathBuf::from(properties.require(properties::VERTEX_FILE)?);
        let edge_path = PathBuf::from(properties.require(properties::EDGE_FILE)?);
        if vertex_path.as_os_str().is_empty() || edge_path.as_os_str().is_empty() {
            return Err(ConvertError::config("empty path for the vertex or the edge file"));
        }

        let directed = match properties.get(properties::DIRECTED) {
            None => true,
            Some(value) => properties::parse_flag(value).ok_or_else(|| {
                ConvertError::config(format!(
                    "cannot determine whether the graph is directed or not. The property value is `{}'",
                    value
                ))
            })?,
        };
        let weighted = properties.contains(properties::EDGE_PROPERTY_NAMES);

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        debug!(vertex_file = %vertex_path.display(), edge_file = %edge_path.display(), directed, weighted, "reader initialised");

        Ok(GraphalyticsReader {
            properties,
            vertex_path,
            edge_path,
            directed,
            weighted,
            vertices: None,
            edges: None,
            pending: None,
            emit_both_directions: false,
            max_weight: 1.0,
            rng,
        })
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// The value of `key`, or the empty string when absent.
    pub fn property(&self, key: &str) -> &str {
        self.properties.get_or_empty(key)
    }

    pub fn vertex_path(&self) -> &Path { &self.vertex_path }
    pub fn edge_path(&self) -> &Path { &self.edge_path }
    pub fn is_directed(&self) -> bool { self.directed }
    pub fn is_weighted(&self) -> bool { self.weighted }

    /// Report each line of an undirected graph twice, as src -> dst and then dst -> src.
    pub fn set_emit_both_directions(&mut self, value: bool) {
        self.emit_both_directions = value;
    }

    /// Upper bound of the weights generated for unweighted graphs.
    pub fn set_max_weight(&mut self, value: f64) -> Result<()> {
        if !(value > 0.0) || !value.is_finite() {
            return Err(ConvertError::config(format!("expected a positive max weight: {}", value)));
        }
        self.max_weight = value;
        Ok(())
    }

    /// Rewind both files to their beginning.
    pub fn reset(&mut self) {
        self.vertices = None;
        self.edges = None;
        self.pending = None;
    }

    /// The next vertex of the vertex list, `None` once exhausted.
    pub fn read_vertex(&mut self) -> Result<Option<u64>> {
        if self.vertices.is_none() {
            self.vertices = Some(LineCursor::open(&self.vertex_path)?);
        }
        let Some(cursor) = self.vertices.as_mut() else { return Ok(None) };

        if !cursor.advance()? {
            return Ok(None);
        }
        cursor.parse_id(cursor.tokens().next(), "vertex id").map(Some)
    }

    /// The next edge of the edge list, `None` once exhausted.
    pub fn read_edge(&mut self) -> Result<Option<WeightedEdge>> {
        if let Some(edge) = self.pending.take() {
            return Ok(Some(edge));
        }

        if self.edges.is_none() {
            self.edges = Some(LineCursor::open(&self.edge_path)?);
        }
        let Some(cursor) = self.edges.as_mut() else { return Ok(None) };

        if !cursor.advance()? {
            return Ok(None);
        }

        let mut tokens = cursor.tokens();
        let source = cursor.parse_id(tokens.next(), "source vertex")?;
        let destination = cursor.parse_id(tokens.next(), "destination vertex")?;
        let weight = if self.weighted {
            let token = tokens.next();
            if let Some(weight) = token.filter(|t| t.starts_with('-')).and_then(|t| t.parse::<f64>().ok()) {
                if weight < 0.0 {
                    return Err(ConvertError::NegativeWeight { path: cursor.path.clone(), line: cursor.line, weight });
                }
            }
            cursor.parse_weight(token)?
        } else {
            // [0, max) shifted to (0, max]
            let weight = self.rng.gen_range(0.0..self.max_weight);
            if weight == 0.0 { self.max_weight } else { weight }
        };

        let edge = WeightedEdge::new(source, destination, weight);
        if !self.directed && self.emit_both_directions {
            self.pending = Some(edge.reversed());
        }
        Ok(Some(edge))
    }

    /// Iterate over the remaining edges.
    pub fn edges(&mut self) -> Edges<'_> {
        Edges { reader: self }
    }

    /// Iterate over the remaining vertices.
    pub fn vertices(&mut self) -> Vertices<'_> {
        Vertices { reader: self }
    }
}

pub struct Edges<'a> {
    reader: &'a mut GraphalyticsReader,
}

impl Iterator for Edges<'_> {
    type Item = Result<WeightedEdge>;
    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_edge().transpose()
    }
}

pub struct Vertices<'a> {
    reader: &'a mut GraphalyticsReader,
}

impl Iterator for Vertices<'_> {
    type Item = Result<u64>;
    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_vertex().transpose()
    }
}
