use std::fmt;

/// A directed pair of vertex identifiers, ordered lexicographically by
/// (source, destination).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    pub source: u64,
    pub destination: u64,
}

impl Edge {
    pub fn new(source: u64, destination: u64) -> Edge {
        Edge { source, destination }
    }

    pub fn reversed(&self) -> Edge {
        Edge::new(self.destination, self.source)
    }

    pub fn is_loop(&self) -> bool {
        self.source == self.destination
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[src: {}, dst: {}]", self.source, self.destination)
    }
}

/// An edge with a non-negative weight. Equality also compares the weight.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WeightedEdge {
    pub edge: Edge,
    pub weight: f64,
}

impl WeightedEdge {
    pub fn new(source: u64, destination: u64, weight: f64) -> WeightedEdge {
        debug_assert!(weight >= 0.0, "expected a non-negative weight: {}", weight);
        WeightedEdge { edge: Edge::new(source, destination), weight }
    }

    #[inline]
    pub fn source(&self) -> u64 { self.edge.source }
    #[inline]
    pub fn destination(&self) -> u64 { self.edge.destination }

    pub fn reversed(&self) -> WeightedEdge {
        WeightedEdge { edge: self.edge.reversed(), weight: self.weight }
    }
}

impl fmt::Display for WeightedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[src: {}, dst: {}, weight: {}]", self.source(), self.destination(), self.weight)
    }
}
