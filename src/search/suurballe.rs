use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::model::graph::{Edge, Graph, MutableGraph};
use crate::model::path::{DisjointPathPair, Path};
use crate::model::weight::ScalarWeight;

use super::dijkstra::dijkstra;
use super::error::Result;
use super::result::SearchResult;
use super::types::{EdgeWeigher, GraphPathSearch, MaxPaths};

#[derive(Debug, Clone)]
pub struct DisjointPathResult<E: Edge> {
    pub result: SearchResult<E>,
    pub pairs: Vec<DisjointPathPair<E>>,
}

impl<E: Edge> DisjointPathResult<E> {
    pub fn pairs(&self) -> &[DisjointPathPair<E>] {
        &self.pairs
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum ResidualEdge<E> {
    Forward(E),
    Reverse(E),
}

impl<E: Edge> Edge for ResidualEdge<E> {
    type Vertex = E::Vertex;

    fn src(&self) -> &E::Vertex {
        match self {
            ResidualEdge::Forward(edge) => edge.src(),
            ResidualEdge::Reverse(edge) => edge.dst(),
        }
    }

    fn dst(&self) -> &E::Vertex {
        match self {
            ResidualEdge::Forward(edge) => edge.dst(),
            ResidualEdge::Reverse(edge) => edge.src(),
        }
    }
}

// Reduced costs against the shortest-path potentials of the first pass.
struct ResidualWeigher<'a, E: Edge> {
    inner: &'a dyn EdgeWeigher<E>,
    potentials: &'a SearchResult<E>,
}

impl<E: Edge> EdgeWeigher<ResidualEdge<E>> for ResidualWeigher<'_, E> {
    fn weight(&self, edge: &ResidualEdge<E>) -> ScalarWeight {
        let edge = match edge {
            ResidualEdge::Reverse(_) => return self.inner.initial_weight(),
            ResidualEdge::Forward(edge) => edge,
        };
        let weight = self.inner.weight(edge);
        if !weight.is_viable() {
            return self.inner.non_viable_weight();
        }
        if weight.is_negative() {
            return ScalarWeight::new(-1.0);
        }
        match (
            self.potentials.cost(edge.src()),
            self.potentials.cost(edge.dst()),
        ) {
            (Some(src_cost), Some(dst_cost)) => {
                let reduced = weight.merge(src_cost).subtract(dst_cost);
                if reduced.same_as(ScalarWeight::ZERO) {
                    ScalarWeight::ZERO
                } else {
                    reduced
                }
            }
            _ => self.inner.non_viable_weight(),
        }
    }

    fn initial_weight(&self) -> ScalarWeight {
        self.inner.initial_weight()
    }

    fn non_viable_weight(&self) -> ScalarWeight {
        self.inner.non_viable_weight()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SuurballeSearch;

impl<E: Edge> GraphPathSearch<E> for SuurballeSearch {
    type Output = DisjointPathResult<E>;

    fn search_with(
        &self,
        graph: &Graph<E>,
        src: &E::Vertex,
        dst: Option<&E::Vertex>,
        weigher: &dyn EdgeWeigher<E>,
        max_paths: MaxPaths,
    ) -> Result<DisjointPathResult<E>> {
        Ok(suurballe(graph, src, dst, weigher, max_paths))
    }
}

/// Pairs each shortest path with the cheapest path that shares no
/// intermediate vertex with it, when one exists.
pub fn suurballe<E: Edge>(
    graph: &Graph<E>,
    src: &E::Vertex,
    dst: Option<&E::Vertex>,
    weigher: &dyn EdgeWeigher<E>,
    max_paths: MaxPaths,
) -> DisjointPathResult<E> {
    let first = dijkstra(graph, src, dst, weigher, MaxPaths::All);
    if first.paths().is_empty() {
        return DisjointPathResult {
            result: first,
            pairs: Vec::new(),
        };
    }
    let potentials = dijkstra(graph, src, None, weigher, MaxPaths::All);
    let residual_weigher = ResidualWeigher {
        inner: weigher,
        potentials: &potentials,
    };

    // Per destination: (protected, unprotected).
    let mut by_dst: BTreeMap<E::Vertex, (Vec<DisjointPathPair<E>>, Vec<DisjointPathPair<E>>)> =
        BTreeMap::new();
    for primary in first.paths() {
        let (protected, unprotected) = by_dst.entry(primary.dst().clone()).or_default();
        let residual = residual_graph(graph, src, primary);
        let second = dijkstra(
            &residual,
            src,
            Some(primary.dst()),
            &residual_weigher,
            MaxPaths::All,
        );
        if second.paths().is_empty() {
            debug!(dst = ?primary.dst(), "no residual path; primary stays unprotected");
            unprotected.push(DisjointPathPair::new(primary.clone(), None));
            continue;
        }
        for residual_path in second.paths() {
            let pair = untangle(graph, src, primary, residual_path, weigher);
            if pair.has_backup() {
                protected.push(pair);
            } else {
                unprotected.push(pair);
            }
        }
    }

    let candidates = by_dst.into_values().flat_map(|(protected, unprotected)| {
        if protected.is_empty() {
            unprotected.into_iter().take(1).collect()
        } else {
            protected
        }
    });
    let mut pairs: Vec<DisjointPathPair<E>> = Vec::new();
    for pair in candidates {
        if !max_paths.allows(pairs.len()) {
            break;
        }
        if !pairs.contains(&pair) {
            pairs.push(pair);
        }
    }
    debug!(pairs = pairs.len(), "disjoint path search finished");

    DisjointPathResult {
        result: first,
        pairs,
    }
}

// The original graph minus edges into the source, with the primary's edges
// reversed so the second pass can cancel them.
fn residual_graph<E: Edge>(
    graph: &Graph<E>,
    src: &E::Vertex,
    primary: &Path<E>,
) -> Graph<ResidualEdge<E>> {
    let mut residual: MutableGraph<ResidualEdge<E>> = MutableGraph::new(
        graph.vertices().iter().cloned(),
        graph.edges().iter().cloned().map(ResidualEdge::Forward),
    );
    for edge in graph.edges_to(src) {
        residual.remove_edge(&ResidualEdge::Forward(edge.clone()));
    }
    for edge in primary.edges() {
        residual.remove_edge(&ResidualEdge::Forward(edge.clone()));
        residual.add_edge(ResidualEdge::Reverse(edge.clone()));
    }
    residual.to_immutable()
}

// Merges the primary and residual paths, cancels edges travelled in both
// directions, and splits the remainder back into two routes.
fn untangle<E: Edge>(
    graph: &Graph<E>,
    src: &E::Vertex,
    primary: &Path<E>,
    residual_path: &Path<ResidualEdge<E>>,
    weigher: &dyn EdgeWeigher<E>,
) -> DisjointPathPair<E> {
    let mut round_trip: MutableGraph<E> =
        MutableGraph::new(graph.vertices().iter().cloned(), primary.edges().iter().cloned());
    for edge in residual_path.edges() {
        match edge {
            ResidualEdge::Reverse(original) => {
                round_trip.remove_edge(original);
            }
            ResidualEdge::Forward(original) => {
                round_trip.add_edge(original.clone());
            }
        }
    }

    let dst = primary.dst();
    let joined = round_trip.to_immutable();
    let Some(main) = dijkstra(&joined, src, Some(dst), weigher, MaxPaths::Bounded(1))
        .into_paths()
        .into_iter()
        .next()
    else {
        return DisjointPathPair::new(primary.clone(), None);
    };
    for edge in main.edges() {
        round_trip.remove_edge(edge);
    }
    let remainder = round_trip.to_immutable();

    let used = intermediate_vertices(&main);
    let backup = dijkstra(&remainder, src, Some(dst), weigher, MaxPaths::All)
        .into_paths()
        .into_iter()
        .find(|candidate| used.is_disjoint(&intermediate_vertices(candidate)));
    DisjointPathPair::new(main, backup)
}

fn intermediate_vertices<E: Edge>(path: &Path<E>) -> BTreeSet<E::Vertex> {
    path.edges()
        .iter()
        .map(|edge| edge.src())
        .filter(|vertex| *vertex != path.src())
        .cloned()
        .collect()
}
