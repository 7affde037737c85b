use crate::model::graph::{Edge, Graph};
use crate::model::weight::ScalarWeight;

use super::types::{EdgeWeigher, HopCountWeigher};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TestEdge {
    pub src: &'static str,
    pub dst: &'static str,
    pub weight: ScalarWeight,
}

impl Edge for TestEdge {
    type Vertex = &'static str;

    fn src(&self) -> &&'static str {
        &self.src
    }

    fn dst(&self) -> &&'static str {
        &self.dst
    }
}

pub fn edge(src: &'static str, dst: &'static str, weight: f64) -> TestEdge {
    TestEdge {
        src,
        dst,
        weight: ScalarWeight::new(weight),
    }
}

pub fn unit(src: &'static str, dst: &'static str) -> TestEdge {
    edge(src, dst, 1.0)
}

struct EdgeWeights;

impl EdgeWeigher<TestEdge> for EdgeWeights {
    fn weight(&self, edge: &TestEdge) -> ScalarWeight {
        edge.weight
    }
}

pub fn weights() -> &'static dyn EdgeWeigher<TestEdge> {
    &EdgeWeights
}

pub fn hops() -> &'static dyn EdgeWeigher<TestEdge> {
    &HopCountWeigher
}

pub fn graph(vertices: &[&'static str], edges: Vec<TestEdge>) -> Graph<TestEdge> {
    Graph::new(vertices.iter().copied(), edges)
}

pub const VERTICES: [&str; 8] = ["A", "B", "C", "D", "E", "F", "G", "H"];

pub fn default_edges() -> Vec<TestEdge> {
    vec![
        edge("A", "B", 1.0),
        edge("A", "C", 3.0),
        edge("B", "D", 2.0),
        edge("B", "C", 1.0),
        edge("B", "E", 4.0),
        edge("C", "E", 1.0),
        edge("D", "H", 5.0),
        edge("D", "E", 1.0),
        edge("E", "F", 1.0),
        edge("F", "D", 1.0),
        edge("F", "G", 1.0),
        edge("F", "H", 1.0),
    ]
}

pub fn default_graph() -> Graph<TestEdge> {
    graph(&VERTICES, default_edges())
}
