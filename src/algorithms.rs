//! Parameters of the Graphalytics algorithms declared for a graph.

use std::fmt;
use std::str::FromStr;

use crate::error::{ConvertError, Result};
use crate::properties::{self, Properties};

pub const BFS_SOURCE_VERTEX: &str = "bfs.source-vertex";
pub const CDLP_MAX_ITERATIONS: &str = "cdlp.max-iterations";
pub const PR_DAMPING_FACTOR: &str = "pr.damping-factor";
pub const PR_NUM_ITERATIONS: &str = "pr.num-iterations";
pub const SSSP_SOURCE_VERTEX: &str = "sssp.source-vertex";

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bfs {
    pub source_vertex: u64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cdlp {
    pub max_iterations: u64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PageRank {
    pub damping_factor: f64,
    pub num_iterations: u64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sssp {
    pub source_vertex: u64,
}

/// The algorithms enabled for a graph, `None` (or `false`) when disabled.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphalyticsAlgorithms {
    pub bfs: Option<Bfs>,
    pub cdlp: Option<Cdlp>,
    pub lcc: bool,
    pub pagerank: Option<PageRank>,
    pub sssp: Option<Sssp>,
    pub wcc: bool,
}

impl GraphalyticsAlgorithms {
    /// Parse the `algorithms` property, a comma separated list of tags, and
    /// load the parameters of every recognised algorithm. Unknown tags are
    /// ignored.
    pub fn from_properties(props: &Properties) -> Result<GraphalyticsAlgorithms> {
        let mut algorithms = GraphalyticsAlgorithms::default();

        for tag in props.get_or_empty(properties::ALGORITHMS).split(',') {
            let tag: String = tag.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_lowercase();
            match tag.as_str() {
                "bfs" => {
                    algorithms.bfs = Some(Bfs { source_vertex: parameter(props, BFS_SOURCE_VERTEX)? });
                }
                "cdlp" => {
                    algorithms.cdlp = Some(Cdlp { max_iterations: parameter(props, CDLP_MAX_ITERATIONS)? });
                }
                "lcc" => algorithms.lcc = true,
                "pr" => {
                    algorithms.pagerank = Some(PageRank {
                        damping_factor: parameter(props, PR_DAMPING_FACTOR)?,
                        num_iterations: parameter(props, PR_NUM_ITERATIONS)?,
                    });
                }
                "sssp" => {
                    algorithms.sssp = Some(Sssp { source_vertex: parameter(props, SSSP_SOURCE_VERTEX)? });
                }
                "wcc" => algorithms.wcc = true,
                _ => {}
            }
        }

        Ok(algorithms)
    }

    /// Rewrite every source-vertex parameter through `remap`.
    pub fn remap_sources<F>(&mut self, mut remap: F) -> Result<()>
    where
        F: FnMut(&'static str, u64) -> Result<u64>,
    {
        if let Some(bfs) = self.bfs.as_mut() {
            bfs.source_vertex = remap("bfs", bfs.source_vertex)?;
        }
        if let Some(sssp) = self.sssp.as_mut() {
            sssp.source_vertex = remap("sssp", sssp.source_vertex)?;
        }
        Ok(())
    }
}

fn parameter<T>(props: &Properties, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let value = props.get_or_empty(key);
    value.trim().parse().map_err(|e: T::Err| ConvertError::Property {
        key: key.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

impl fmt::Display for GraphalyticsAlgorithms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[GraphalyticsAlgorithms")?;
        if let Some(bfs) = &self.bfs {
            write!(f, " BFS source: {};", bfs.source_vertex)?;
        }
        if let Some(cdlp) = &self.cdlp {
            write!(f, " CDLP max_iterations: {};", cdlp.max_iterations)?;
        }
        if self.lcc {
            write!(f, " LCC;")?;
        }
        if let Some(pr) = &self.pagerank {
            write!(f, " PageRank df: {}, num_iterations: {};", pr.damping_factor, pr.num_iterations)?;
        }
        if let Some(sssp) = &self.sssp {
            write!(f, " SSSP source: {};", sssp.source_vertex)?;
        }
        if self.wcc {
            write!(f, " WCC;")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn props(text: &str) -> Properties {
        Properties::parse(text.as_bytes(), Path::new("/"), Path::new("test")).unwrap()
    }

    #[test]
    fn bfs_and_pagerank() {
        let algorithms = GraphalyticsAlgorithms::from_properties(&props(
            "graph.g.algorithms = bfs, PR\n\
             graph.g.bfs.source-vertex = 2\n\
             graph.g.pr.damping-factor = 0.85\n\
             graph.g.pr.num-iterations = 10\n",
        ))
        .unwrap();

        assert_eq!(algorithms.bfs, Some(Bfs { source_vertex: 2 }));
        assert_eq!(algorithms.pagerank, Some(PageRank { damping_factor: 0.85, num_iterations: 10 }));
        assert_eq!(algorithms.cdlp, None);
        assert_eq!(algorithms.sssp, None);
        assert!(!algorithms.lcc);
        assert!(!algorithms.wcc);
        assert_eq!(
            algorithms.to_string(),
            "[GraphalyticsAlgorithms BFS source: 2; PageRank df: 0.85, num_iterations: 10;]"
        );
    }

    #[test]
    fn all_tags_and_unknown_ones() {
        let algorithms = GraphalyticsAlgorithms::from_properties(&props(
            "graph.g.algorithms = B F S,cdlp , lcc,sssp,wcc,foo\n\
             graph.g.bfs.source-vertex = 1\n\
             graph.g.cdlp.max-iterations = 5\n\
             graph.g.sssp.source-vertex = 7\n",
        ))
        .unwrap();

        assert_eq!(algorithms.bfs, Some(Bfs { source_vertex: 1 }));
        assert_eq!(algorithms.cdlp, Some(Cdlp { max_iterations: 5 }));
        assert_eq!(algorithms.sssp, Some(Sssp { source_vertex: 7 }));
        assert!(algorithms.lcc && algorithms.wcc);
        assert_eq!(algorithms.pagerank, None);
    }

    #[test]
    fn no_algorithms() {
        let algorithms = GraphalyticsAlgorithms::from_properties(&props("graph.g.directed = true\n")).unwrap();
        assert_eq!(algorithms, GraphalyticsAlgorithms::default());
        assert_eq!(algorithms.to_string(), "[GraphalyticsAlgorithms]");
    }

    #[test]
    fn missing_parameters_are_fatal() {
        let err = GraphalyticsAlgorithms::from_properties(&props("graph.g.algorithms = sssp\n")).unwrap_err();
        match err {
            ConvertError::Property { key, value, .. } => {
                assert_eq!(key, SSSP_SOURCE_VERTEX);
                assert_eq!(value, "");
            }
            other => panic!("unexpected {:?}", other),
        }

        let err = GraphalyticsAlgorithms::from_properties(&props(
            "graph.g.algorithms = pr\ngraph.g.pr.damping-factor = high\ngraph.g.pr.num-iterations = 3\n",
        ))
        .unwrap_err();
        assert!(matches!(err, ConvertError::Property { .. }));
    }

    #[test]
    fn remaps_source_vertices() {
        let mut algorithms = GraphalyticsAlgorithms {
            bfs: Some(Bfs { source_vertex: 10 }),
            sssp: Some(Sssp { source_vertex: 20 }),
            ..Default::default()
        };
        algorithms.remap_sources(|_, v| Ok(v / 10)).unwrap();
        assert_eq!(algorithms.bfs, Some(Bfs { source_vertex: 1 }));
        assert_eq!(algorithms.sssp, Some(Sssp { source_vertex: 2 }));

        let err = algorithms
            .remap_sources(|algorithm, vertex| Err(ConvertError::MissingVertex { algorithm, vertex }))
            .unwrap_err();
        assert!(matches!(err, ConvertError::MissingVertex { algorithm: "bfs", vertex: 1 }));
    }
}
