use crate::model::graph::{Edge, Graph};

use super::error::Result;
use super::result::SearchResult;
use super::types::{EdgeWeigher, GraphPathSearch, MaxPaths};

#[derive(Debug, Clone, Copy, Default)]
pub struct BreadthFirstSearch;

impl<E: Edge> GraphPathSearch<E> for BreadthFirstSearch {
    type Output = SearchResult<E>;

    fn search_with(
        &self,
        graph: &Graph<E>,
        src: &E::Vertex,
        dst: Option<&E::Vertex>,
        weigher: &dyn EdgeWeigher<E>,
        max_paths: MaxPaths,
    ) -> Result<SearchResult<E>> {
        Ok(breadth_first(graph, src, dst, weigher, max_paths))
    }
}

/// Expands the frontier one hop at a time; every vertex keeps the parent that
/// discovered it first.
pub fn breadth_first<E: Edge>(
    graph: &Graph<E>,
    src: &E::Vertex,
    dst: Option<&E::Vertex>,
    weigher: &dyn EdgeWeigher<E>,
    max_paths: MaxPaths,
) -> SearchResult<E> {
    let mut result = SearchResult::new(src.clone(), dst.cloned(), max_paths);
    result.update_vertex(src, None, weigher.initial_weight(), false);

    let mut frontier = vec![src.clone()];
    'rounds: while !frontier.is_empty() {
        let mut next = Vec::new();
        for vertex in &frontier {
            let Some(cost) = result.cost(vertex) else {
                continue;
            };
            for edge in graph.edges_from(vertex) {
                let reached = edge.dst();
                if result.has_cost(reached) {
                    continue;
                }
                let weight = weigher.weight(edge);
                if !weight.is_viable() {
                    continue;
                }
                result.update_vertex(reached, Some(edge), cost.merge(weight), true);
                if Some(reached) == dst {
                    break 'rounds;
                }
                next.push(reached.clone());
            }
        }
        frontier = next;
    }

    result.build_paths();
    result
}
