use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use proptest::prelude::*;
use tempfile::TempDir;

use vtxremap::remap::{ingest, ingest_with_table};
use vtxremap::{GraphalyticsAlgorithms, GraphalyticsReader, VertexOrder};

fn input_graph(directed: bool, vertices: &[u64], edges: &[(u64, u64)]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("g.properties");
    fs::write(
        &path,
        format!("graph.g.vertex-file = g.v\ngraph.g.edge-file = g.e\ngraph.g.directed = {}\n", directed),
    )
    .unwrap();
    let vertices: String = vertices.iter().map(|v| format!("{}\n", v)).collect();
    let edges: String = edges.iter().map(|(s, d)| format!("{} {}\n", s, d)).collect();
    fs::write(dir.path().join("g.v"), vertices).unwrap();
    fs::write(dir.path().join("g.e"), edges).unwrap();
    (dir, path)
}

#[test]
fn first_seen_assigns_source_before_destination() {
    let (_dir, path) = input_graph(true, &[], &[(500, 100), (100, 700), (700, 500)]);
    let mut reader = GraphalyticsReader::open(&path, Some(3)).unwrap();
    let (graph, table) = ingest_with_table(&mut reader, VertexOrder::FirstSeen).unwrap();

    assert_eq!(graph.num_vertices, 3);
    assert_eq!(graph.unlisted_vertices, 0);
    assert_eq!(table.get(500), Some(0));
    assert_eq!(table.get(100), Some(1));
    assert_eq!(table.get(700), Some(2));
    let pairs: Vec<(u64, u64)> = graph.edges().map(|e| (e.source(), e.destination())).collect();
    assert_eq!(pairs, vec![(0, 1), (1, 2), (2, 0)]);
}

#[test]
fn declared_order_counts_unlisted_vertices() {
    let (_dir, path) = input_graph(true, &[3, 1], &[(1, 3), (3, 99)]);
    let mut reader = GraphalyticsReader::open(&path, Some(3)).unwrap();
    let (graph, table) = ingest_with_table(&mut reader, VertexOrder::Declared).unwrap();

    assert_eq!(table.get(3), Some(0));
    assert_eq!(table.get(1), Some(1));
    assert_eq!(table.get(99), Some(2));
    assert_eq!(graph.num_vertices, 3);
    assert_eq!(graph.unlisted_vertices, 1);
}

#[test]
fn declared_order_keeps_isolated_vertices() {
    let (_dir, path) = input_graph(false, &[1, 2, 3, 4], &[(4, 2)]);
    let mut reader = GraphalyticsReader::open(&path, Some(3)).unwrap();
    let mut algorithms = GraphalyticsAlgorithms::default();
    let graph = ingest(&mut reader, &mut algorithms, VertexOrder::Declared).unwrap();

    assert_eq!(graph.num_vertices, 4);
    assert_eq!(graph.num_edges, 1);
    let pairs: Vec<(u64, u64)> = graph.edges().map(|e| (e.source(), e.destination())).collect();
    assert_eq!(pairs, vec![(1, 3)]);
}

#[test]
fn reader_can_be_ingested_twice() {
    let (_dir, path) = input_graph(true, &[], &[(8, 9)]);
    let mut reader = GraphalyticsReader::open(&path, Some(3)).unwrap();
    let first = ingest_with_table(&mut reader, VertexOrder::FirstSeen).unwrap().0;
    let second = ingest_with_table(&mut reader, VertexOrder::FirstSeen).unwrap().0;
    assert_eq!(first.num_edges, 1);
    assert_eq!(second.num_edges, 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn dense_ids_and_canonical_edges(
        raw in prop::collection::vec((0u64..1_000_000, 0u64..1_000_000), 0..200),
        directed in any::<bool>(),
    ) {
        let edges: Vec<(u64, u64)> = raw.into_iter().filter(|(s, d)| s != d).collect();
        let (_dir, path) = input_graph(directed, &[], &edges);
        let mut reader = GraphalyticsReader::open(&path, Some(11)).unwrap();
        let (graph, table) = ingest_with_table(&mut reader, VertexOrder::FirstSeen).unwrap();

        let distinct: HashSet<u64> = edges.iter().flat_map(|&(s, d)| [s, d]).collect();
        prop_assert_eq!(graph.num_vertices, distinct.len() as u64);
        prop_assert_eq!(table.len(), distinct.len() as u64);

        let dense: HashSet<u64> = distinct.iter().map(|&v| table.get(v).unwrap()).collect();
        prop_assert_eq!(dense, (0..graph.num_vertices).collect::<HashSet<u64>>());

        prop_assert_eq!(graph.num_edges, edges.len() as u64);
        for (edge, &(s, d)) in graph.edges().zip(edges.iter()) {
            prop_assert!(edge.source() != edge.destination());
            let (s, d) = (table.get(s).unwrap(), table.get(d).unwrap());
            if directed {
                prop_assert_eq!((edge.source(), edge.destination()), (s, d));
            } else {
                prop_assert!(edge.source() < edge.destination());
                prop_assert_eq!((edge.source(), edge.destination()), (s.min(d), s.max(d)));
            }
        }
    }
}
