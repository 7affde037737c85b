use tracing::debug;

use crate::model::graph::{Edge, Graph};

use super::error::Result;
use super::result::SearchResult;
use super::types::{EdgeWeigher, GraphPathSearch, MaxPaths};

#[derive(Debug, Clone, Copy, Default)]
pub struct BellmanFordSearch;

impl<E: Edge> GraphPathSearch<E> for BellmanFordSearch {
    type Output = SearchResult<E>;

    fn search_with(
        &self,
        graph: &Graph<E>,
        src: &E::Vertex,
        dst: Option<&E::Vertex>,
        weigher: &dyn EdgeWeigher<E>,
        max_paths: MaxPaths,
    ) -> Result<SearchResult<E>> {
        Ok(bellman_ford(graph, src, dst, weigher, max_paths))
    }
}

/// Shortest paths that tolerate negative edges. Vertices still improvable
/// after |V|-1 rounds sit on a negative cycle and lose their parents.
pub fn bellman_ford<E: Edge>(
    graph: &Graph<E>,
    src: &E::Vertex,
    dst: Option<&E::Vertex>,
    weigher: &dyn EdgeWeigher<E>,
    max_paths: MaxPaths,
) -> SearchResult<E> {
    let mut result = SearchResult::new(src.clone(), dst.cloned(), max_paths);
    result.update_vertex(src, None, weigher.initial_weight(), false);

    for _ in 0..graph.vertex_count().saturating_sub(1) {
        let mut changed = false;
        for edge in graph.edges() {
            let Some(cost) = result.cost(edge.src()) else {
                continue;
            };
            changed |= result.relax_edge(edge, cost, weigher, false);
        }
        if !changed {
            break;
        }
    }

    for edge in graph.edges() {
        let Some(cost) = result.cost(edge.src()) else {
            continue;
        };
        if result.relax_edge(edge, cost, weigher, false) {
            debug!(vertex = ?edge.dst(), "evicting vertex on negative cycle");
            result.remove_vertex(edge.dst());
        }
    }

    result.build_paths();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::weight::ScalarWeight;
    use crate::search::test_support::{default_graph, edge, graph, weights};

    #[test]
    fn matches_dijkstra_on_positive_graph() {
        let result = BellmanFordSearch
            .search(&default_graph(), &"A", Some(&"H"), Some(weights()), MaxPaths::All)
            .expect("search");
        assert_eq!(result.paths().len(), 1);
        assert_eq!(result.paths()[0].edge_count(), 5);
        assert_eq!(result.paths()[0].cost(), ScalarWeight::new(5.0));
    }

    #[test]
    fn follows_negative_edges() {
        let graph = graph(
            &["A", "B", "C"],
            vec![edge("A", "B", 4.0), edge("A", "C", 1.0), edge("C", "B", -2.0)],
        );
        let result = BellmanFordSearch
            .search(&graph, &"A", Some(&"B"), Some(weights()), MaxPaths::All)
            .expect("search");
        assert_eq!(result.paths().len(), 1);
        assert_eq!(result.paths()[0].cost(), ScalarWeight::new(-1.0));
        assert_eq!(result.paths()[0].edge_count(), 2);
    }

    #[test]
    fn evicts_vertices_on_negative_cycle() {
        let graph = graph(
            &["A", "B", "C", "D"],
            vec![
                edge("A", "B", 1.0),
                edge("B", "C", -3.0),
                edge("C", "B", 1.0),
                edge("A", "D", 2.0),
            ],
        );
        let to_c = BellmanFordSearch
            .search(&graph, &"A", Some(&"C"), Some(weights()), MaxPaths::All)
            .expect("search");
        assert!(to_c.paths().is_empty());

        let to_d = BellmanFordSearch
            .search(&graph, &"A", Some(&"D"), Some(weights()), MaxPaths::All)
            .expect("search");
        assert_eq!(to_d.paths().len(), 1);
    }
}
