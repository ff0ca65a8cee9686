//! Writers for the remapped graph: the property file, the vertex list and
//! the edge list.
//!
//! Vertex and edge lists come in two encodings. The plain encoding is text,
//! one entry per line. The deflate encoding is a raw deflate stream over
//! 64-bit native-endian slots: one slot per vertex, and two slots per edge
//! (source, destination) plus a third with the bit pattern of the weight
//! when the graph is weighted.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use byteorder::{NativeEndian, WriteBytesExt};
use flate2::write::DeflateEncoder;
use flate2::Compression;
use tracing::{info, warn};

use crate::algorithms::GraphalyticsAlgorithms;
use crate::edge::WeightedEdge;
use crate::error::{IoContext, Result};

/// Slots buffered before a chunk is handed to the compressor.
pub const CHUNK_SLOTS: usize = 1 << 20;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Encoding {
    Plain,
    Deflate,
}

impl Encoding {
    pub fn from_compress(compress: bool) -> Encoding {
        if compress { Encoding::Deflate } else { Encoding::Plain }
    }
}

/// Buffers 64-bit slots and feeds them to a deflate stream in chunks.
struct SlotWriter<'a, W: Write> {
    encoder: DeflateEncoder<&'a mut W>,
    buffer: Vec<u8>,
    origin: &'a Path,
}

impl<'a, W: Write> SlotWriter<'a, W> {
    fn new(out: &'a mut W, origin: &'a Path) -> SlotWriter<'a, W> {
        SlotWriter {
            encoder: DeflateEncoder::new(out, Compression::default()),
            buffer: Vec::with_capacity(CHUNK_SLOTS * 8),
            origin,
        }
    }

    fn push_u64(&mut self, value: u64) -> Result<()> {
        self.buffer.write_u64::<NativeEndian>(value).with_path(self.origin)?;
        if self.buffer.len() >= CHUNK_SLOTS * 8 {
            self.flush_chunk()?;
        }
        Ok(())
    }

    fn push_f64(&mut self, value: f64) -> Result<()> {
        self.push_u64(value.to_bits())
    }

    fn flush_chunk(&mut self) -> Result<()> {
        self.encoder.write_all(&self.buffer).with_path(self.origin)?;
        self.buffer.clear();
        Ok(())
    }

    /// Compress what is left and terminate the stream.
    fn finish(mut self) -> Result<()> {
        self.flush_chunk()?;
        self.encoder.finish().with_path(self.origin)?;
        Ok(())
    }
}

/// Write the vertices `0..num_vertices`. `origin` names the destination in errors.
pub fn write_vertices<W: Write>(out: &mut W, num_vertices: u64, encoding: Encoding, origin: &Path) -> Result<()> {
    match encoding {
        Encoding::Plain => {
            for vertex in 0..num_vertices {
                writeln!(out, "{}", vertex).with_path(origin)?;
            }
            Ok(())
        }
        Encoding::Deflate => {
            let mut slots = SlotWriter::new(out, origin);
            for vertex in 0..num_vertices {
                slots.push_u64(vertex)?;
            }
            slots.finish()
        }
    }
}

/// Write `edges` in order. The weight is only written for weighted graphs.
pub fn write_edges<'e, W, I>(out: &mut W, edges: I, weighted: bool, encoding: Encoding, origin: &Path) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'e WeightedEdge>,
{
    match encoding {
        Encoding::Plain => {
            for edge in edges {
                let written = if weighted {
                    writeln!(out, "{} {} {}", edge.source(), edge.destination(), edge.weight)
                } else {
                    writeln!(out, "{} {}", edge.source(), edge.destination())
                };
                written.with_path(origin)?;
            }
            Ok(())
        }
        Encoding::Deflate => {
            let mut slots = SlotWriter::new(out, origin);
            for edge in edges {
                slots.push_u64(edge.source())?;
                slots.push_u64(edge.destination())?;
                if weighted {
                    slots.push_f64(edge.weight)?;
                }
            }
            slots.finish()
        }
    }
}

pub fn save_vertices(outputs: &mut Outputs, path: &Path, num_vertices: u64, encoding: Encoding) -> Result<()> {
    info!(path = %path.display(), "saving the vertex file ...");
    let start = Instant::now();

    let mut out = outputs.create(path)?;
    write_vertices(&mut out, num_vertices, encoding, path)?;
    out.flush().with_path(path)?;

    info!(elapsed = ?start.elapsed(), "vertex file saved");
    Ok(())
}

pub fn save_edges<'e, I>(outputs: &mut Outputs, path: &Path, edges: I, weighted: bool, encoding: Encoding) -> Result<()>
where
    I: IntoIterator<Item = &'e WeightedEdge>,
{
    info!(path = %path.display(), "saving the edge file ...");
    let start = Instant::now();

    let mut out = outputs.create(path)?;
    write_edges(&mut out, edges, weighted, encoding, path)?;
    out.flush().with_path(path)?;

    info!(elapsed = ?start.elapsed(), "edge file saved");
    Ok(())
}

/// Content of the property file describing the remapped graph.
#[derive(Clone, Debug)]
pub struct GraphDescription {
    /// File name of the output prefix, used as graph name and to derive the file names.
    pub name: String,
    pub vertex_file: String,
    pub edge_file: String,
    pub num_vertices: u64,
    pub num_edges: u64,
    pub hostname: String,
    pub stable_map: bool,
    pub input_graph: String,
    pub compressed: bool,
    pub directed: bool,
    pub weighted: bool,
    /// The algorithms property of the input graph, as written there.
    pub algorithm_list: String,
    pub algorithms: GraphalyticsAlgorithms,
    pub created: String,
}

pub fn write_properties<W: Write>(out: &mut W, graph: &GraphDescription, origin: &Path) -> Result<()> {
    render_properties(out, graph).with_path(origin)
}

fn render_properties<W: Write>(out: &mut W, graph: &GraphDescription) -> std::io::Result<()> {
    let name = &graph.name;
    writeln!(out, "# Created by vtxremap, on {}\n", graph.created)?;

    writeln!(out, "# Filenames of graph on local filesystem")?;
    writeln!(out, "graph.{}.vertex-file = {}", name, graph.vertex_file)?;
    writeln!(out, "graph.{}.edge-file = {}\n", name, graph.edge_file)?;

    writeln!(out, "# Graph metadata for reporting purposes")?;
    writeln!(out, "graph.{}.meta.vertices = {}", name, graph.num_vertices)?;
    writeln!(out, "graph.{}.meta.edges = {}", name, graph.num_edges)?;
    writeln!(out, "graph.{}.meta.hostname = {}", name, graph.hostname)?;
    writeln!(out, "graph.{}.meta.stable-map = {}", name, graph.stable_map)?;
    writeln!(out, "graph.{}.meta.input-graph = {}\n", name, graph.input_graph)?;

    writeln!(out, "# Properties describing the graph format")?;
    if graph.compressed {
        writeln!(out, "graph.{}.compression = zlib", name)?;
    }
    writeln!(out, "graph.{}.directed = {}\n", name, graph.directed)?;

    if graph.weighted {
        writeln!(out, "# Description of graph properties")?;
        writeln!(out, "graph.{}.edge-properties.names = weight", name)?;
        writeln!(out, "graph.{}.edge-properties.types = real\n", name)?;
    }

    writeln!(out, "# List of supported algorithms on the graph")?;
    writeln!(out, "graph.{}.algorithms = {}\n", name, graph.algorithm_list)?;

    writeln!(out, "\n#\n# Per-algorithm properties describing the input parameters to each algorithm\n#\n")?;

    let algorithms = &graph.algorithms;
    if let Some(bfs) = &algorithms.bfs {
        writeln!(out, "# Parameters for BFS")?;
        writeln!(out, "graph.{}.bfs.source-vertex = {}\n", name, bfs.source_vertex)?;
    }
    if let Some(cdlp) = &algorithms.cdlp {
        writeln!(out, "# Parameters for CDLP")?;
        writeln!(out, "graph.{}.cdlp.max-iterations = {}\n", name, cdlp.max_iterations)?;
    }
    if algorithms.lcc {
        writeln!(out, "# No parameters for LCC\n")?;
    }
    if let Some(pr) = &algorithms.pagerank {
        writeln!(out, "# Parameters for PR")?;
        writeln!(out, "graph.{}.pr.damping-factor = {}", name, pr.damping_factor)?;
        writeln!(out, "graph.{}.pr.num-iterations = {}\n", name, pr.num_iterations)?;
    }
    if let Some(sssp) = &algorithms.sssp {
        writeln!(out, "# Parameters for SSSP")?;
        writeln!(out, "graph.{}.sssp.weight-property = weight", name)?;
        writeln!(out, "graph.{}.sssp.source-vertex = {}\n", name, sssp.source_vertex)?;
    }
    if algorithms.wcc {
        writeln!(out, "# No parameters for WCC")?;
    }
    Ok(())
}

pub fn save_properties(outputs: &mut Outputs, path: &Path, graph: &GraphDescription) -> Result<()> {
    info!(path = %path.display(), "saving the property file ...");
    let start = Instant::now();

    let mut out = outputs.create(path)?;
    write_properties(&mut out, graph, path)?;
    out.flush().with_path(path)?;

    info!(elapsed = ?start.elapsed(), "property file saved");
    Ok(())
}

/// Files created by one conversion, in creation order.
#[derive(Debug, Default)]
pub struct Outputs {
    created: Vec<PathBuf>,
}

impl Outputs {
    fn create(&mut self, path: &Path) -> Result<BufWriter<File>> {
        let file = File::create(path).with_path(path)?;
        self.created.push(path.to_path_buf());
        Ok(BufWriter::new(file))
    }

    pub fn created(&self) -> &[PathBuf] {
        &self.created
    }

    /// Delete every file created so far.
    pub fn remove_all(&mut self) {
        for path in self.created.drain(..) {
            match fs::remove_file(&path) {
                Ok(()) => warn!(path = %path.display(), "removed incomplete output"),
                Err(e) => warn!(path = %path.display(), error = %e, "cannot remove incomplete output"),
            }
        }
    }
}

/// File name component of `path`, or the whole path when it has none.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
