use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::model::graph::Edge;
use crate::model::path::{MutablePath, Path};
use crate::model::weight::ScalarWeight;

use super::types::{EdgeWeigher, MaxPaths};

/// Per-vertex costs and parent edges gathered by a search, plus the paths
/// rebuilt from them.
#[derive(Debug, Clone)]
pub struct SearchResult<E: Edge> {
    src: E::Vertex,
    dst: Option<E::Vertex>,
    max_paths: MaxPaths,
    costs: BTreeMap<E::Vertex, ScalarWeight>,
    parents: BTreeMap<E::Vertex, BTreeSet<E>>,
    paths: Vec<Path<E>>,
}

impl<E: Edge> SearchResult<E> {
    pub fn new(src: E::Vertex, dst: Option<E::Vertex>, max_paths: MaxPaths) -> Self {
        Self {
            src,
            dst,
            max_paths,
            costs: BTreeMap::new(),
            parents: BTreeMap::new(),
            paths: Vec::new(),
        }
    }

    pub fn src(&self) -> &E::Vertex {
        &self.src
    }

    pub fn dst(&self) -> Option<&E::Vertex> {
        self.dst.as_ref()
    }

    pub fn max_paths(&self) -> MaxPaths {
        self.max_paths
    }

    pub fn costs(&self) -> &BTreeMap<E::Vertex, ScalarWeight> {
        &self.costs
    }

    pub fn parents(&self) -> &BTreeMap<E::Vertex, BTreeSet<E>> {
        &self.parents
    }

    pub fn paths(&self) -> &[Path<E>] {
        &self.paths
    }

    pub fn into_paths(self) -> Vec<Path<E>> {
        self.paths
    }

    pub fn cost(&self, vertex: &E::Vertex) -> Option<ScalarWeight> {
        self.costs.get(vertex).copied()
    }

    pub fn has_cost(&self, vertex: &E::Vertex) -> bool {
        self.costs.contains_key(vertex)
    }

    pub(crate) fn set_paths(&mut self, paths: Vec<Path<E>>) {
        self.paths = paths;
    }

    /// Records `cost` for `vertex` and, when `edge` is given, registers it as a
    /// parent. `replace` drops previously recorded parents first.
    pub fn update_vertex(
        &mut self,
        vertex: &E::Vertex,
        edge: Option<&E>,
        cost: ScalarWeight,
        replace: bool,
    ) {
        self.costs.insert(vertex.clone(), cost);
        let Some(edge) = edge else {
            return;
        };
        let parents = self.parents.entry(vertex.clone()).or_default();
        if replace {
            parents.clear();
        }
        if self.max_paths.allows(parents.len()) {
            parents.insert(edge.clone());
        }
    }

    /// Forgets how `vertex` was reached; its cost stays recorded.
    pub fn remove_vertex(&mut self, vertex: &E::Vertex) {
        self.parents.remove(vertex);
    }

    /// Returns true only when the edge strictly improved the cost of its
    /// destination. Equal-cost edges are kept as extra parents.
    pub fn relax_edge(
        &mut self,
        edge: &E,
        base_cost: ScalarWeight,
        weigher: &dyn EdgeWeigher<E>,
        forbid_negatives: bool,
    ) -> bool {
        let weight = weigher.weight(edge);
        if !weight.is_viable() || (forbid_negatives && weight.is_negative()) {
            return false;
        }

        let candidate = base_cost.merge(weight);
        let ordering = match self.costs.get(edge.dst()) {
            Some(current) => candidate.compare(*current),
            None => std::cmp::Ordering::Less,
        };
        if ordering.is_le() {
            self.update_vertex(edge.dst(), Some(edge), candidate, ordering.is_lt());
        }
        ordering.is_lt()
    }

    /// Rebuilds concrete paths from the recorded parent edges, for the
    /// destination or, without one, for every reached vertex.
    pub fn build_paths(&mut self) {
        let targets: Vec<E::Vertex> = match &self.dst {
            Some(dst) => vec![dst.clone()],
            None => self.costs.keys().cloned().collect(),
        };
        for target in targets {
            if target == self.src {
                continue;
            }
            if !self.max_paths.allows(self.paths.len()) {
                break;
            }
            self.build_paths_to(&target);
        }
    }

    fn build_paths_to(&mut self, target: &E::Vertex) {
        let Some(cost) = self.cost(target) else {
            return;
        };

        let mut pending = VecDeque::from([MutablePath::new()]);
        while let Some(mut path) = pending.pop_front() {
            if !self.max_paths.allows(self.paths.len()) {
                return;
            }

            let first = path.src().cloned().unwrap_or_else(|| target.clone());
            if first == self.src {
                path.set_cost(cost);
                if let Ok(done) = path.to_path() {
                    if !self.paths.contains(&done) {
                        self.paths.push(done);
                    }
                }
                continue;
            }

            let branches: Vec<E> = self
                .parents
                .get(&first)
                .into_iter()
                .flatten()
                .filter(|edge| !path.reaches(edge.src()))
                .cloned()
                .collect();
            let Some((last, rest)) = branches.split_last() else {
                continue;
            };
            for edge in rest {
                let mut branch = path.clone();
                if branch.insert(edge.clone()).is_ok() {
                    pending.push_back(branch);
                }
            }
            if path.insert(last.clone()).is_ok() {
                pending.push_back(path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::test_support::{edge, weights, TestEdge};

    #[test]
    fn relax_replaces_on_improvement_and_joins_on_tie() {
        let mut result: SearchResult<TestEdge> = SearchResult::new("A", Some("C"), MaxPaths::All);
        result.update_vertex(&"A", None, ScalarWeight::ZERO, false);
        result.update_vertex(&"B", Some(&edge("A", "B", 1.0)), ScalarWeight::ONE, true);

        assert!(result.relax_edge(&edge("A", "C", 4.0), ScalarWeight::ZERO, weights(), true));
        assert!(result.relax_edge(&edge("B", "C", 2.0), ScalarWeight::ONE, weights(), true));
        assert!(!result.relax_edge(&edge("B", "C", 2.0 + 1e-12), ScalarWeight::ONE, weights(), true));
        assert_eq!(result.parents()[&"C"].len(), 2);
        assert!(result.cost(&"C").is_some_and(|cost| cost.same_as(ScalarWeight::new(3.0))));

        result.build_paths();
        assert_eq!(result.paths().len(), 2);
        assert!(result.paths().iter().all(|path| path.edge_count() == 2));
    }

    #[test]
    fn relax_rejects_negative_and_non_viable_edges() {
        let mut result: SearchResult<TestEdge> = SearchResult::new("A", None, MaxPaths::All);
        result.update_vertex(&"A", None, ScalarWeight::ZERO, false);

        assert!(!result.relax_edge(&edge("A", "B", -1.0), ScalarWeight::ZERO, weights(), true));
        assert!(!result.relax_edge(
            &edge("A", "B", f64::INFINITY),
            ScalarWeight::ZERO,
            weights(),
            false
        ));
        assert!(!result.has_cost(&"B"));
        assert!(result.relax_edge(&edge("A", "B", -1.0), ScalarWeight::ZERO, weights(), false));
    }

    #[test]
    fn parent_sets_respect_path_limit() {
        let mut result: SearchResult<TestEdge> =
            SearchResult::new("A", Some("D"), MaxPaths::Bounded(1));
        result.update_vertex(&"A", None, ScalarWeight::ZERO, false);
        result.update_vertex(&"B", Some(&edge("A", "B", 1.0)), ScalarWeight::ONE, true);
        result.update_vertex(&"C", Some(&edge("A", "C", 1.0)), ScalarWeight::ONE, true);
        result.relax_edge(&edge("B", "D", 1.0), ScalarWeight::ONE, weights(), true);
        result.relax_edge(&edge("C", "D", 1.0), ScalarWeight::ONE, weights(), true);
        assert_eq!(result.parents()[&"D"].len(), 1);

        result.build_paths();
        assert_eq!(result.paths().len(), 1);
    }

    #[test]
    fn evicted_vertex_yields_no_path() {
        let mut result: SearchResult<TestEdge> = SearchResult::new("A", Some("B"), MaxPaths::All);
        result.update_vertex(&"A", None, ScalarWeight::ZERO, false);
        result.update_vertex(&"B", Some(&edge("A", "B", 1.0)), ScalarWeight::ONE, true);
        result.remove_vertex(&"B");
        result.build_paths();
        assert!(result.paths().is_empty());
        assert!(result.has_cost(&"B"));
    }
}
