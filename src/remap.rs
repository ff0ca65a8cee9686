//! Translation of the vertex identifiers into the dense domain [0, N).

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::Instant;

use tracing::{info, warn};

use crate::algorithms::GraphalyticsAlgorithms;
use crate::edge::WeightedEdge;
use crate::error::{ConvertError, Result};
use crate::properties;
use crate::reader::GraphalyticsReader;
use crate::sorting::{SegmentList, SEGMENT_SIZE};

/// Largest number of table entries reserved up front from `meta.vertices`.
const MAX_CAPACITY_HINT: u64 = 1 << 24;

/// Maps original vertex ids to dense ids. Dense ids are handed out in
/// insertion order and never change once assigned.
#[derive(Clone, Debug, Default)]
pub struct RemapTable {
    ids: HashMap<u64, u64>,
}

impl RemapTable {
    pub fn with_capacity(capacity: usize) -> RemapTable {
        RemapTable { ids: HashMap::with_capacity(capacity) }
    }

    /// The dense id of `original`, assigning the next free one if unseen.
    /// The flag is `true` when the vertex was inserted by this call.
    pub fn get_or_insert(&mut self, original: u64) -> (u64, bool) {
        let next = self.ids.len() as u64;
        match self.ids.entry(original) {
            Entry::Occupied(entry) => (*entry.get(), false),
            Entry::Vacant(entry) => (*entry.insert(next), true),
        }
    }

    pub fn get(&self, original: u64) -> Option<u64> {
        self.ids.get(&original).copied()
    }

    /// Number of vertices, also the next dense id to assign.
    pub fn len(&self) -> u64 {
        self.ids.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// How the dense ids are assigned.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum VertexOrder {
    /// In order of first appearance in the edge list, source before destination.
    #[default]
    FirstSeen,
    /// In the order of the vertex list.
    Declared,
}

/// A graph whose vertices have been remapped into [0, num_vertices).
#[derive(Debug)]
pub struct IngestedGraph {
    pub num_vertices: u64,
    /// Edges in the dense domain, split in segments.
    pub segments: Vec<Vec<WeightedEdge>>,
    pub num_edges: u64,
    /// Declared order only: edge endpoints missing from the vertex list.
    pub unlisted_vertices: u64,
}

impl IngestedGraph {
    pub fn edges(&self) -> impl Iterator<Item = &WeightedEdge> + '_ {
        self.segments.iter().flatten()
    }
}

/// Drain `reader`, remapping every vertex into the dense domain, and rewrite
/// the source vertices of `algorithms` through the same table.
pub fn ingest(reader: &mut GraphalyticsReader, algorithms: &mut GraphalyticsAlgorithms, order: VertexOrder) -> Result<IngestedGraph> {
    let (graph, table) = ingest_with_table(reader, order)?;

    algorithms.remap_sources(|algorithm, vertex| {
        table.get(vertex).ok_or(ConvertError::MissingVertex { algorithm, vertex })
    })?;

    Ok(graph)
}

/// As [`ingest`], also returning the complete remap table.
pub fn ingest_with_table(reader: &mut GraphalyticsReader, order: VertexOrder) -> Result<(IngestedGraph, RemapTable)> {
    reader.reset();
    let vertex_hint = reader.properties().parse_hint::<u64>(properties::META_VERTICES);
    let capacity = vertex_hint.map_or(0, |hint| hint.min(MAX_CAPACITY_HINT) as usize);
    let mut table = RemapTable::with_capacity(capacity);

    if order == VertexOrder::Declared {
        info!("reading the input vertices ...");
        let start = Instant::now();
        for vertex in reader.vertices() {
            table.get_or_insert(vertex?);
        }
        info!(vertices = table.len(), elapsed = ?start.elapsed(), "input vertices parsed");

        if let Some(expected) = vertex_hint {
            if expected != table.len() {
                warn!(expected, found = table.len(), "cardinality mismatch in the vertex list");
            }
        }
    }
    let listed = table.len();

    info!("reading the input edges ...");
    let start = Instant::now();
    let directed = reader.is_directed();
    let mut edges = SegmentList::new(SEGMENT_SIZE);
    let mut unlisted = 0;

    for edge in reader.edges() {
        let edge = edge?;
        let (source, new_source) = table.get_or_insert(edge.source());
        let (destination, new_destination) = table.get_or_insert(edge.destination());
        if order == VertexOrder::Declared {
            unlisted += new_source as u64 + new_destination as u64;
        }

        if source == destination {
            return Err(ConvertError::SelfLoop { vertex: edge.source() });
        }

        let (source, destination) = if !directed && source > destination {
            (destination, source)
        } else {
            (source, destination)
        };
        edges.push(WeightedEdge::new(source, destination, edge.weight));
    }

    if unlisted > 0 {
        warn!(unlisted, listed, "edges reference vertices missing from the vertex list");
    }

    let num_edges = edges.len() as u64;
    info!(vertices = table.len(), edges = num_edges, elapsed = ?start.elapsed(), "input edges parsed");

    let graph = IngestedGraph {
        num_vertices: table.len(),
        segments: edges.finalize(),
        num_edges,
        unlisted_vertices: unlisted,
    };
    Ok((graph, table))
}
