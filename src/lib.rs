//! Remap the vertices of a graph in the Graphalytics format into the dense
//! domain [0, num_vertices), and save the result as a new Graphalytics graph,
//! optionally deflating the vertex and edge lists.

pub mod algorithms;
pub mod config;
pub mod convert;
pub mod edge;
pub mod emit;
pub mod error;
pub mod properties;
pub mod reader;
pub mod remap;
pub mod sorting;

pub use algorithms::GraphalyticsAlgorithms;
pub use config::ConvertConfig;
pub use edge::{Edge, WeightedEdge};
pub use error::{ConvertError, Result};
pub use reader::GraphalyticsReader;
pub use remap::{IngestedGraph, RemapTable, VertexOrder};
