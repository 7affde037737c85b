use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::model::graph::{Edge, Graph};
use crate::model::path::Path;
use crate::model::weight::ScalarWeight;

use super::dijkstra::dijkstra;
use super::error::{Result, SearchError};
use super::result::SearchResult;
use super::types::{EdgeWeigher, GraphPathSearch, MaxPaths};

/// Cheaper first, then fewer edges, then edge order.
pub fn rank_paths<E: Edge>(a: &Path<E>, b: &Path<E>) -> Ordering {
    a.cost()
        .compare(b.cost())
        .then_with(|| a.edge_count().cmp(&b.edge_count()))
        .then_with(|| a.edges().cmp(b.edges()))
}

pub(crate) fn path_cost<E: Edge>(edges: &[E], weigher: &dyn EdgeWeigher<E>) -> ScalarWeight {
    edges
        .iter()
        .fold(weigher.initial_weight(), |cost, edge| cost.merge(weigher.weight(edge)))
}

pub(crate) fn same_route<E: Edge>(paths: &[Path<E>], candidate: &Path<E>) -> bool {
    paths.iter().any(|path| path.edges() == candidate.edges())
}

struct MaskingWeigher<'a, E> {
    inner: &'a dyn EdgeWeigher<E>,
    masked: &'a BTreeSet<E>,
}

impl<E: Edge> EdgeWeigher<E> for MaskingWeigher<'_, E> {
    fn weight(&self, edge: &E) -> ScalarWeight {
        if self.masked.contains(edge) {
            self.inner.non_viable_weight()
        } else {
            self.inner.weight(edge)
        }
    }

    fn initial_weight(&self) -> ScalarWeight {
        self.inner.initial_weight()
    }

    fn non_viable_weight(&self) -> ScalarWeight {
        self.inner.non_viable_weight()
    }
}

/// Deviations from `last` that leave it at each of its vertices. Root
/// prefixes shared with `accepted` paths have their next edge masked, and
/// every vertex of the root is cut off so candidates stay loop-free.
pub(crate) fn spur_candidates<E: Edge>(
    graph: &Graph<E>,
    dst: &E::Vertex,
    weigher: &dyn EdgeWeigher<E>,
    accepted: &[Path<E>],
    last: &Path<E>,
) -> Vec<Path<E>> {
    let mut candidates = Vec::new();
    for (index, spur_edge) in last.edges().iter().enumerate() {
        let spur = spur_edge.src();
        let root = &last.edges()[..index];

        let mut masked: BTreeSet<E> = accepted
            .iter()
            .filter(|path| path.edge_count() > index && path.edges()[..index] == *root)
            .map(|path| path.edges()[index].clone())
            .collect();
        for root_edge in root {
            masked.extend(graph.edges_from(root_edge.src()).cloned());
            masked.extend(graph.edges_to(root_edge.src()).cloned());
        }

        let masking = MaskingWeigher {
            inner: weigher,
            masked: &masked,
        };
        let spur_result = dijkstra(graph, spur, Some(dst), &masking, MaxPaths::Bounded(1));
        let Some(spur_path) = spur_result.paths().first() else {
            continue;
        };

        let mut edges = root.to_vec();
        edges.extend(spur_path.edges().iter().cloned());
        let cost = path_cost(&edges, weigher);
        if let Ok(candidate) = Path::new(edges, cost) {
            candidates.push(candidate);
        }
    }
    candidates
}

/// Yen's loopless k-shortest paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct KShortestPathsSearch;

impl<E: Edge> GraphPathSearch<E> for KShortestPathsSearch {
    type Output = SearchResult<E>;

    fn search_with(
        &self,
        graph: &Graph<E>,
        src: &E::Vertex,
        dst: Option<&E::Vertex>,
        weigher: &dyn EdgeWeigher<E>,
        max_paths: MaxPaths,
    ) -> Result<SearchResult<E>> {
        let Some(dst) = dst else {
            return Err(SearchError::InvalidArgument(
                "k-shortest search needs a destination".to_string(),
            ));
        };
        let MaxPaths::Bounded(k_paths) = max_paths else {
            return Err(SearchError::InvalidArgument(
                "k-shortest search needs a bounded path count".to_string(),
            ));
        };
        Ok(k_shortest_paths(graph, src, dst, weigher, k_paths))
    }
}

/// Costs and parents come from a single-path Dijkstra run; `paths()` lists
/// the accepted routes cheapest first.
pub fn k_shortest_paths<E: Edge>(
    graph: &Graph<E>,
    src: &E::Vertex,
    dst: &E::Vertex,
    weigher: &dyn EdgeWeigher<E>,
    k_paths: usize,
) -> SearchResult<E> {
    let mut result = dijkstra(graph, src, Some(dst), weigher, MaxPaths::Bounded(1));
    let Some(first) = result.paths().first().cloned() else {
        return result;
    };

    let mut accepted = vec![first];
    let mut candidate_pool: Vec<Path<E>> = Vec::new();
    while accepted.len() < k_paths {
        let Some(last) = accepted.last() else {
            break;
        };
        for candidate in spur_candidates(graph, dst, weigher, &accepted, last) {
            if !same_route(&accepted, &candidate) && !same_route(&candidate_pool, &candidate) {
                candidate_pool.push(candidate);
            }
        }

        let best = candidate_pool
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| rank_paths(a, b))
            .map(|(index, _)| index);
        let Some(best) = best else {
            break;
        };
        accepted.push(candidate_pool.swap_remove(best));
    }

    result.set_paths(accepted);
    result
}
