use std::collections::{BTreeMap, BTreeSet};

use crate::model::graph::{Edge, Graph};
use crate::model::path::Path;

use super::error::Result;
use super::result::SearchResult;
use super::types::{EdgeWeigher, GraphPathSearch, MaxPaths};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EdgeType {
    Tree,
    Back,
    Forward,
    Cross,
}

#[derive(Debug, Clone)]
pub struct SpanningTreeResult<E: Edge> {
    pub result: SearchResult<E>,
    pub edge_types: BTreeMap<E, EdgeType>,
}

impl<E: Edge> SpanningTreeResult<E> {
    pub fn paths(&self) -> &[Path<E>] {
        self.result.paths()
    }

    pub fn edge_type(&self, edge: &E) -> Option<EdgeType> {
        self.edge_types.get(edge).copied()
    }

    pub fn count_of(&self, kind: EdgeType) -> usize {
        self.edge_types.values().filter(|value| **value == kind).count()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DepthFirstSearch;

impl<E: Edge> GraphPathSearch<E> for DepthFirstSearch {
    type Output = SpanningTreeResult<E>;

    fn search_with(
        &self,
        graph: &Graph<E>,
        src: &E::Vertex,
        dst: Option<&E::Vertex>,
        weigher: &dyn EdgeWeigher<E>,
        max_paths: MaxPaths,
    ) -> Result<SpanningTreeResult<E>> {
        Ok(depth_first(graph, src, dst, weigher, max_paths))
    }
}

pub fn depth_first<E: Edge>(
    graph: &Graph<E>,
    src: &E::Vertex,
    dst: Option<&E::Vertex>,
    weigher: &dyn EdgeWeigher<E>,
    max_paths: MaxPaths,
) -> SpanningTreeResult<E> {
    let mut result = SearchResult::new(src.clone(), dst.cloned(), max_paths);
    let mut edge_types: BTreeMap<E, EdgeType> = BTreeMap::new();
    let mut finished: BTreeSet<E::Vertex> = BTreeSet::new();

    result.update_vertex(src, None, weigher.initial_weight(), false);
    let mut stack = vec![src.clone()];

    while let Some(vertex) = stack.last().cloned() {
        if Some(&vertex) == dst {
            break;
        }
        let Some(cost) = result.cost(&vertex) else {
            break;
        };

        let mut tangent = None;
        for edge in graph.edges_from(&vertex) {
            if edge_types.contains_key(edge) {
                continue;
            }
            let weight = weigher.weight(edge);
            if !weight.is_viable() {
                continue;
            }
            let next = edge.dst();
            if !result.has_cost(next) {
                result.update_vertex(next, Some(edge), cost.merge(weight), false);
                edge_types.insert(edge.clone(), EdgeType::Tree);
                tangent = Some(next.clone());
                break;
            }
            let kind = if !finished.contains(next) {
                EdgeType::Back
            } else if is_forward_edge(&result, edge) {
                EdgeType::Forward
            } else {
                EdgeType::Cross
            };
            edge_types.insert(edge.clone(), kind);
        }

        match tangent {
            Some(next) => stack.push(next),
            None => {
                finished.insert(vertex);
                stack.pop();
            }
        }
    }

    result.build_paths();
    SpanningTreeResult { result, edge_types }
}

// Walks tree parents up from the edge's destination looking for its source.
fn is_forward_edge<E: Edge>(result: &SearchResult<E>, edge: &E) -> bool {
    let target = edge.src();
    let mut vertex = edge.dst();
    while let Some(parent) = result
        .parents()
        .get(vertex)
        .and_then(|parents| parents.iter().next())
    {
        vertex = parent.src();
        if vertex == target {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::weight::ScalarWeight;
    use crate::search::test_support::{default_graph, graph, hops, unit, weights};

    #[test]
    fn classifies_every_viable_edge() {
        let tree = DepthFirstSearch
            .search(&default_graph(), &"A", None, Some(weights()), MaxPaths::All)
            .expect("search");
        assert_eq!(tree.edge_types.len(), 12);
        assert_eq!(tree.count_of(EdgeType::Tree), 7);
        assert_eq!(tree.count_of(EdgeType::Back), 1);
        assert_eq!(
            tree.count_of(EdgeType::Forward) + tree.count_of(EdgeType::Cross),
            4
        );
        assert_eq!(tree.paths().len(), 7);
    }

    #[test]
    fn separates_forward_from_cross_edges() {
        let dag = graph(
            &["A", "B", "C", "D"],
            vec![unit("A", "B"), unit("B", "C"), unit("A", "C"), unit("A", "D"), unit("D", "C")],
        );
        let tree = DepthFirstSearch
            .search(&dag, &"A", None, Some(weights()), MaxPaths::All)
            .expect("search");
        assert_eq!(tree.edge_type(&unit("A", "B")), Some(EdgeType::Tree));
        assert_eq!(tree.edge_type(&unit("B", "C")), Some(EdgeType::Tree));
        assert_eq!(tree.edge_type(&unit("A", "D")), Some(EdgeType::Tree));
        assert_eq!(tree.edge_type(&unit("A", "C")), Some(EdgeType::Forward));
        assert_eq!(tree.edge_type(&unit("D", "C")), Some(EdgeType::Cross));
        assert_eq!(tree.count_of(EdgeType::Back), 0);
    }

    #[test]
    fn descends_until_destination() {
        let tree = DepthFirstSearch
            .search(&default_graph(), &"A", Some(&"H"), Some(weights()), MaxPaths::Bounded(1))
            .expect("search");
        assert_eq!(tree.paths().len(), 1);
        let path = &tree.paths()[0];
        assert_eq!(
            path.vertices().copied().collect::<Vec<_>>(),
            vec!["A", "B", "C", "E", "F", "D", "H"]
        );
        assert_eq!(path.cost(), ScalarWeight::new(10.0));

        let by_hops = DepthFirstSearch
            .search(&default_graph(), &"A", Some(&"H"), Some(hops()), MaxPaths::Bounded(1))
            .expect("search");
        assert_eq!(by_hops.paths()[0].cost(), ScalarWeight::new(6.0));
    }
}
