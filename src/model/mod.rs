pub mod graph;
pub mod path;
pub mod topology;
pub mod weight;

pub use graph::{DefaultEdge, Edge, Graph, MutableGraph, Vertex};
pub use path::{DisjointPathPair, MutablePath, Path};
pub use topology::{load_topology, Link, LinkWeigher, Topology};
pub use weight::{ScalarWeight, SAMENESS_THRESHOLD};
