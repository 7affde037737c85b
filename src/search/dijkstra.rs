use std::cmp::Ordering;

use crate::model::graph::{Edge, Graph};
use crate::model::weight::ScalarWeight;

use super::error::Result;
use super::heap::Heap;
use super::result::SearchResult;
use super::types::{EdgeWeigher, GraphPathSearch, MaxPaths};

#[derive(Debug, Clone)]
struct QueueEntry<V> {
    vertex: V,
    cost: Option<ScalarWeight>,
}

// Cheaper entries outrank dearer ones; unreached vertices rank last.
fn closer_first<V>(a: &QueueEntry<V>, b: &QueueEntry<V>) -> Ordering {
    match (a.cost, b.cost) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a_cost), Some(b_cost)) => b_cost.compare(a_cost),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraSearch;

impl<E: Edge> GraphPathSearch<E> for DijkstraSearch {
    type Output = SearchResult<E>;

    fn search_with(
        &self,
        graph: &Graph<E>,
        src: &E::Vertex,
        dst: Option<&E::Vertex>,
        weigher: &dyn EdgeWeigher<E>,
        max_paths: MaxPaths,
    ) -> Result<SearchResult<E>> {
        Ok(dijkstra(graph, src, dst, weigher, max_paths))
    }
}

/// Shortest paths over non-negative edges, keeping every equal-cost parent up
/// to the path limit.
pub fn dijkstra<E: Edge>(
    graph: &Graph<E>,
    src: &E::Vertex,
    dst: Option<&E::Vertex>,
    weigher: &dyn EdgeWeigher<E>,
    max_paths: MaxPaths,
) -> SearchResult<E> {
    let mut result = SearchResult::new(src.clone(), dst.cloned(), max_paths);
    result.update_vertex(src, None, weigher.initial_weight(), false);

    if graph.edge_count() == 0 {
        result.build_paths();
        return result;
    }

    let entries: Vec<QueueEntry<E::Vertex>> = graph
        .vertices()
        .iter()
        .map(|vertex| QueueEntry {
            vertex: vertex.clone(),
            cost: result.cost(vertex),
        })
        .collect();
    let mut frontier = Heap::new(entries, closer_first);

    while let Ok(nearest) = frontier.extract_extreme() {
        if Some(&nearest.vertex) == dst {
            break;
        }
        let Some(cost) = nearest.cost else {
            break;
        };

        let mut improved = false;
        for edge in graph.edges_from(&nearest.vertex) {
            improved |= result.relax_edge(edge, cost, weigher, true);
        }
        if improved {
            for entry in frontier.iter_mut() {
                entry.cost = result.cost(&entry.vertex);
            }
            frontier.heapify();
        }
    }

    result.build_paths();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::test_support::{
        default_edges, default_graph, edge, graph, hops, weights, TestEdge, VERTICES,
    };

    fn assert_paths(result: &SearchResult<TestEdge>, count: usize, cost: f64) {
        assert_eq!(result.paths().len(), count);
        for path in result.paths() {
            assert!(path.cost().same_as(ScalarWeight::new(cost)), "path {path:?}");
        }
    }

    #[test]
    fn weighted_default_graph() {
        let result = DijkstraSearch
            .search(&default_graph(), &"A", Some(&"H"), Some(weights()), MaxPaths::All)
            .expect("search");
        assert_paths(&result, 1, 5.0);
        assert_eq!(result.paths()[0].edge_count(), 5);

        let all = DijkstraSearch
            .search(&default_graph(), &"A", None, Some(weights()), MaxPaths::All)
            .expect("search");
        assert_eq!(all.paths().len(), 7);
    }

    #[test]
    fn hop_count_default_graph() {
        let all = DijkstraSearch
            .search(&default_graph(), &"A", None, Some(hops()), MaxPaths::All)
            .expect("search");
        assert_eq!(all.paths().len(), 10);

        let to_h = DijkstraSearch
            .search(&default_graph(), &"A", Some(&"H"), None, MaxPaths::All)
            .expect("search");
        assert_paths(&to_h, 1, 3.0);
        assert_eq!(to_h.paths()[0].edge_count(), 3);
    }

    #[test]
    fn disconnected_pairs() {
        let graph = graph(
            &["A", "B", "C", "D"],
            vec![
                edge("A", "B", 1.0),
                edge("B", "A", 1.0),
                edge("C", "D", 1.0),
                edge("D", "C", 1.0),
            ],
        );
        let near = DijkstraSearch
            .search(&graph, &"A", Some(&"B"), Some(weights()), MaxPaths::All)
            .expect("search");
        assert_paths(&near, 1, 1.0);

        let far = DijkstraSearch
            .search(&graph, &"A", Some(&"D"), Some(weights()), MaxPaths::All)
            .expect("search");
        assert!(far.paths().is_empty());

        let any = DijkstraSearch
            .search(&graph, &"A", None, Some(weights()), MaxPaths::Bounded(1))
            .expect("search");
        assert_eq!(any.paths().len(), 1);
    }

    #[test]
    fn edgeless_graph_has_no_paths() {
        let graph = graph(&VERTICES, Vec::new());
        for src in VERTICES {
            for dst in VERTICES {
                let result = DijkstraSearch
                    .search(&graph, &src, Some(&dst), None, MaxPaths::All)
                    .expect("search");
                assert!(result.paths().is_empty());
            }
        }
    }

    #[test]
    fn negative_and_self_loop_edges_are_unusable() {
        let graph = graph(
            &["A", "B", "C", "D"],
            vec![
                edge("A", "B", 2.0),
                edge("B", "A", 1.0),
                edge("A", "A", 3.0),
                edge("A", "C", -1.0),
                edge("C", "D", 3.0),
            ],
        );
        let to_d = DijkstraSearch
            .search(&graph, &"A", Some(&"D"), Some(weights()), MaxPaths::All)
            .expect("search");
        assert!(to_d.paths().is_empty());

        let to_self = DijkstraSearch
            .search(&graph, &"A", Some(&"A"), Some(weights()), MaxPaths::All)
            .expect("search");
        assert!(to_self.paths().is_empty());
    }

    #[test]
    fn equal_cost_branches() {
        let graph = graph(
            &["A", "B", "C", "D", "E", "F"],
            vec![
                edge("A", "B", 1.0),
                edge("A", "C", 1.0),
                edge("B", "D", 1.0),
                edge("C", "D", 1.0),
                edge("D", "E", 1.0),
                edge("A", "E", 0.0),
                edge("E", "F", -1.0),
                edge("F", "B", 0.0),
            ],
        );
        let to_d = DijkstraSearch
            .search(&graph, &"A", Some(&"D"), Some(weights()), MaxPaths::All)
            .expect("search");
        assert_paths(&to_d, 2, 2.0);

        let to_b = DijkstraSearch
            .search(&graph, &"A", Some(&"B"), Some(weights()), MaxPaths::All)
            .expect("search");
        assert_paths(&to_b, 1, 1.0);

        let backwards = DijkstraSearch
            .search(&graph, &"D", Some(&"A"), Some(weights()), MaxPaths::All)
            .expect("search");
        assert!(backwards.paths().is_empty());
    }

    #[test]
    fn fractional_costs_tie_within_tolerance() {
        let graph = graph(
            &["A", "B", "C", "D", "E"],
            vec![
                edge("A", "B", 1.5),
                edge("B", "D", 3.5),
                edge("A", "C", 2.2),
                edge("C", "E", 1.1),
                edge("E", "D", 1.7),
                edge("A", "D", 5.0),
            ],
        );
        let result = DijkstraSearch
            .search(&graph, &"A", Some(&"D"), Some(weights()), MaxPaths::All)
            .expect("search");
        assert_paths(&result, 3, 5.0);
    }

    #[test]
    fn dense_and_parallel_edges() {
        let dense = graph(
            &["A", "B", "C", "D", "E", "F", "G"],
            vec![
                edge("A", "B", 1.0),
                edge("A", "C", 1.0),
                edge("B", "D", 1.0),
                edge("C", "D", 1.0),
                edge("D", "E", 1.0),
                edge("D", "F", 1.0),
                edge("E", "G", 1.0),
                edge("F", "G", 1.0),
                edge("A", "G", 4.0),
            ],
        );
        let result = DijkstraSearch
            .search(&dense, &"A", Some(&"G"), Some(weights()), MaxPaths::All)
            .expect("search");
        assert_paths(&result, 5, 4.0);

        let mut edges = default_edges();
        edges.push(edge("A", "E", 3.0));
        edges.push(edge("B", "D", 1.0));
        let dual = graph(&VERTICES, edges);
        let result = DijkstraSearch
            .search(&dual, &"A", Some(&"E"), Some(weights()), MaxPaths::All)
            .expect("search");
        assert_paths(&result, 3, 3.0);
    }

    #[test]
    fn negative_edges_are_skipped() {
        let graph = graph(
            &["A", "B", "C", "D", "E", "F", "G"],
            vec![
                edge("A", "B", 1.0),
                edge("A", "C", -1.0),
                edge("B", "D", 1.0),
                edge("D", "A", -2.0),
                edge("C", "D", 1.0),
                edge("D", "E", 1.0),
                edge("D", "F", 1.0),
                edge("E", "G", 1.0),
                edge("F", "G", 1.0),
                edge("G", "A", -5.0),
                edge("A", "G", 4.0),
            ],
        );
        let all = DijkstraSearch
            .search(&graph, &"A", Some(&"G"), Some(weights()), MaxPaths::All)
            .expect("search");
        assert_paths(&all, 3, 4.0);

        let single = DijkstraSearch
            .search(&graph, &"A", Some(&"G"), Some(weights()), MaxPaths::Bounded(1))
            .expect("search");
        assert_paths(&single, 1, 4.0);
    }
}
