use std::collections::BTreeMap;

use rand::Rng;
use tracing::debug;

use crate::model::graph::{Edge, Graph};
use crate::model::path::DisjointPathPair;
use crate::model::weight::ScalarWeight;

use super::dijkstra::dijkstra;
use super::error::{Result, SearchError};
use super::genetic::{GaPopulation, GeneticConfig, Organism};
use super::suurballe::{suurballe, DisjointPathResult};
use super::types::{EdgeWeigher, GraphPathSearch, MaxPaths};

/// Assignment of edges to shared risk link groups `0..groups`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskGrouping<E> {
    groups: usize,
    membership: BTreeMap<E, usize>,
}

impl<E: Edge> RiskGrouping<E> {
    pub fn new(groups: usize, membership: BTreeMap<E, usize>) -> Result<Self> {
        if let Some((edge, group)) = membership.iter().find(|(_, group)| **group >= groups) {
            return Err(SearchError::InvalidArgument(format!(
                "edge {edge:?} is in group {group}, only {groups} groups exist"
            )));
        }
        Ok(Self { groups, membership })
    }

    /// Numbers distinct group keys in the order their edges are first seen.
    pub fn from_keys<K: Ord>(grouping: &BTreeMap<E, K>) -> Self {
        let mut ids: BTreeMap<&K, usize> = BTreeMap::new();
        let mut membership = BTreeMap::new();
        for (edge, key) in grouping {
            let next_id = ids.len();
            let id = *ids.entry(key).or_insert(next_id);
            membership.insert(edge.clone(), id);
        }
        Self {
            groups: ids.len(),
            membership,
        }
    }

    pub fn groups(&self) -> usize {
        self.groups
    }

    pub fn group_of(&self, edge: &E) -> Option<usize> {
        self.membership.get(edge).copied()
    }

    /// Extends the grouping so every edge of `graph` without a group becomes
    /// a group of its own.
    pub fn covering(&self, graph: &Graph<E>) -> Self {
        let mut covered = self.clone();
        for edge in graph.edges() {
            if !covered.membership.contains_key(edge) {
                covered.membership.insert(edge.clone(), covered.groups);
                covered.groups += 1;
            }
        }
        covered
    }
}

// Genes mark the groups the primary may use; the backup takes the others.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GroupSplit(Vec<bool>);

impl Organism for GroupSplit {
    fn random_like<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        GroupSplit(self.0.iter().map(|_| rng.random_bool(0.5)).collect())
    }

    fn cross_with<R: Rng + ?Sized>(&self, other: &Self, rng: &mut R) -> Self {
        GroupSplit(
            self.0
                .iter()
                .zip(&other.0)
                .map(|(mine, theirs)| if rng.random_bool(0.5) { *mine } else { *theirs })
                .collect(),
        )
    }

    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.0.is_empty() {
            return;
        }
        let max_flips = ((self.0.len() as f64).sqrt() as usize).max(1);
        let flips = rng.random_range(1..=max_flips);
        for _ in 0..flips {
            let index = rng.random_range(0..self.0.len());
            self.0[index] = !self.0[index];
        }
    }
}

struct SideWeigher<'a, E> {
    inner: &'a dyn EdgeWeigher<E>,
    grouping: &'a RiskGrouping<E>,
    split: &'a GroupSplit,
    primary: bool,
}

impl<E: Edge> EdgeWeigher<E> for SideWeigher<'_, E> {
    fn weight(&self, edge: &E) -> ScalarWeight {
        let usable = match self.grouping.group_of(edge) {
            Some(group) => self.split.0.get(group).copied().unwrap_or(false) == self.primary,
            None => self.primary,
        };
        if usable {
            self.inner.weight(edge)
        } else {
            self.inner.non_viable_weight()
        }
    }

    fn initial_weight(&self) -> ScalarWeight {
        self.inner.initial_weight()
    }

    fn non_viable_weight(&self) -> ScalarWeight {
        self.inner.non_viable_weight()
    }
}

/// Disjoint path pairs whose primary and backup share no risk group.
#[derive(Debug, Clone)]
pub struct SrlgSearch<E> {
    grouping: Option<RiskGrouping<E>>,
    genetic: GeneticConfig,
}

impl<E: Edge> SrlgSearch<E> {
    /// Without risk groups every edge is its own risk; this falls back to
    /// Suurballe.
    pub fn suurballe() -> Self {
        Self::new(None)
    }

    pub fn new(grouping: Option<RiskGrouping<E>>) -> Self {
        Self {
            grouping,
            genetic: GeneticConfig::default(),
        }
    }

    pub fn with_groups(groups: usize, membership: BTreeMap<E, usize>) -> Result<Self> {
        Ok(Self::new(Some(RiskGrouping::new(groups, membership)?)))
    }

    pub fn from_grouping<K: Ord>(grouping: &BTreeMap<E, K>) -> Self {
        Self::new(Some(RiskGrouping::from_keys(grouping)))
    }

    pub fn with_genetic(mut self, genetic: GeneticConfig) -> Self {
        self.genetic = genetic;
        self
    }

    pub fn grouping(&self) -> Option<&RiskGrouping<E>> {
        self.grouping.as_ref()
    }
}

impl<E: Edge> GraphPathSearch<E> for SrlgSearch<E> {
    type Output = DisjointPathResult<E>;

    fn search_with(
        &self,
        graph: &Graph<E>,
        src: &E::Vertex,
        dst: Option<&E::Vertex>,
        weigher: &dyn EdgeWeigher<E>,
        max_paths: MaxPaths,
    ) -> Result<DisjointPathResult<E>> {
        let Some(grouping) = &self.grouping else {
            return Ok(suurballe(graph, src, dst, weigher, max_paths));
        };
        let Some(dst) = dst else {
            return Err(SearchError::InvalidArgument(
                "risk-disjoint search needs a destination".to_string(),
            ));
        };
        Ok(srlg_pairs(
            graph,
            src,
            dst,
            weigher,
            max_paths,
            grouping,
            &self.genetic,
        ))
    }
}

fn sides<'a, E: Edge>(
    inner: &'a dyn EdgeWeigher<E>,
    grouping: &'a RiskGrouping<E>,
    split: &'a GroupSplit,
) -> (SideWeigher<'a, E>, SideWeigher<'a, E>) {
    let side = |primary| SideWeigher {
        inner,
        grouping,
        split,
        primary,
    };
    (side(true), side(false))
}

fn side_cost<E: Edge>(
    graph: &Graph<E>,
    src: &E::Vertex,
    dst: &E::Vertex,
    weigher: &SideWeigher<'_, E>,
) -> Option<ScalarWeight> {
    dijkstra(graph, src, Some(dst), weigher, MaxPaths::Bounded(1))
        .paths()
        .first()
        .map(|path| path.cost())
}

pub fn srlg_pairs<E: Edge>(
    graph: &Graph<E>,
    src: &E::Vertex,
    dst: &E::Vertex,
    weigher: &dyn EdgeWeigher<E>,
    max_paths: MaxPaths,
    grouping: &RiskGrouping<E>,
    genetic: &GeneticConfig,
) -> DisjointPathResult<E> {
    let result = dijkstra(graph, src, Some(dst), weigher, MaxPaths::Bounded(1));
    if result.paths().is_empty() {
        return DisjointPathResult {
            result,
            pairs: Vec::new(),
        };
    }

    let grouping = &grouping.covering(graph);
    let template = GroupSplit(vec![false; grouping.groups()]);
    let sample = max_paths.limit().unwrap_or(genetic.population_size);
    let fittest = GaPopulation::new(genetic).run(
        genetic.generations,
        genetic.population_size,
        sample,
        &template,
        |split| {
            let (primary, backup) = sides(weigher, grouping, split);
            match (
                side_cost(graph, src, dst, &primary),
                side_cost(graph, src, dst, &backup),
            ) {
                (Some(primary), Some(backup)) => primary.merge(backup),
                _ => weigher.non_viable_weight(),
            }
        },
    );

    let mut pairs: Vec<DisjointPathPair<E>> = Vec::new();
    for (split, fitness) in &fittest {
        if !fitness.is_viable() {
            continue;
        }
        let (primary, backup) = sides(weigher, grouping, split);
        let primaries = dijkstra(graph, src, Some(dst), &primary, MaxPaths::All).into_paths();
        let backups = dijkstra(graph, src, Some(dst), &backup, MaxPaths::All).into_paths();
        for main in &primaries {
            for spare in &backups {
                let pair = DisjointPathPair::new(main.clone(), Some(spare.clone()));
                if !pairs.contains(&pair) {
                    pairs.push(pair);
                }
            }
        }
    }
    debug!(pairs = pairs.len(), groups = grouping.groups(), "risk-disjoint search finished");

    DisjointPathResult { result, pairs }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::search::test_support::{graph, unit, weights, TestEdge};

    fn square() -> Graph<TestEdge> {
        graph(
            &["A", "B", "C", "D"],
            vec![unit("A", "B"), unit("B", "C"), unit("A", "D"), unit("D", "C")],
        )
    }

    fn groups_of(grouping: &RiskGrouping<TestEdge>, edges: &[TestEdge]) -> BTreeSet<usize> {
        edges.iter().filter_map(|edge| grouping.group_of(edge)).collect()
    }

    #[test]
    fn pairs_avoid_shared_risk() {
        let membership = BTreeMap::from([
            (unit("A", "B"), 0),
            (unit("B", "C"), 0),
            (unit("A", "D"), 1),
            (unit("D", "C"), 1),
        ]);
        let search = SrlgSearch::with_groups(2, membership).expect("valid grouping");
        let result = search
            .search(&square(), &"A", Some(&"C"), Some(weights()), MaxPaths::All)
            .expect("search");

        assert_eq!(result.pairs().len(), 1);
        let pair = &result.pairs()[0];
        let backup = pair.secondary().expect("backup path");
        let grouping = search.grouping().expect("grouping");
        assert!(groups_of(grouping, pair.edges()).is_disjoint(&groups_of(grouping, backup.edges())));
        assert_eq!(pair.cost(), ScalarWeight::new(4.0));
    }

    #[test]
    fn shared_conduit_leaves_no_pair() {
        let membership = BTreeMap::from([
            (unit("A", "B"), "conduit"),
            (unit("B", "C"), "east"),
            (unit("A", "D"), "conduit"),
            (unit("D", "C"), "west"),
        ]);
        let search = SrlgSearch::from_grouping(&membership).with_genetic(GeneticConfig {
            generations: 10,
            population_size: 12,
            ..GeneticConfig::default()
        });
        assert_eq!(search.grouping().map(RiskGrouping::groups), Some(3));

        let result = search
            .search(&square(), &"A", Some(&"C"), Some(weights()), MaxPaths::Bounded(2))
            .expect("search");
        assert!(result.pairs().is_empty());
        assert_eq!(result.result.paths().len(), 1);
    }

    #[test]
    fn without_groups_falls_back_to_suurballe() {
        let result = SrlgSearch::suurballe()
            .search(&square(), &"A", Some(&"C"), Some(weights()), MaxPaths::All)
            .expect("search");
        assert_eq!(result.pairs().len(), 1);
        assert!(result.pairs()[0].has_backup());
    }

    #[test]
    fn ungrouped_edges_are_not_shared_by_both_paths() {
        let chain = graph(
            &["A", "B", "C", "D"],
            vec![unit("A", "B"), unit("B", "C"), unit("C", "D")],
        );
        let grouping = RiskGrouping::from_keys(&BTreeMap::from([(unit("C", "D"), "tail")]));
        assert_eq!(grouping.covering(&chain).groups(), 3);
        assert_eq!(grouping.covering(&chain).group_of(&unit("C", "D")), Some(0));

        let result = SrlgSearch::new(Some(grouping))
            .search(&chain, &"A", Some(&"C"), Some(weights()), MaxPaths::All)
            .expect("search");
        assert_eq!(result.result.paths().len(), 1);
        assert!(result.pairs().is_empty());
    }

    #[test]
    fn keeps_every_pair_of_the_sampled_split() {
        let fan = graph(
            &["A", "B", "C", "D", "E"],
            vec![
                unit("A", "B"),
                unit("B", "E"),
                unit("A", "C"),
                unit("C", "E"),
                unit("A", "D"),
                unit("D", "E"),
            ],
        );
        let membership = BTreeMap::from([
            (unit("A", "B"), 0),
            (unit("B", "E"), 0),
            (unit("A", "C"), 0),
            (unit("C", "E"), 0),
            (unit("A", "D"), 1),
            (unit("D", "E"), 1),
        ]);
        let search = SrlgSearch::with_groups(2, membership).expect("valid grouping");
        let result = search
            .search(&fan, &"A", Some(&"E"), Some(weights()), MaxPaths::Bounded(1))
            .expect("search");

        assert_eq!(result.pairs().len(), 2);
        assert!(result.pairs().iter().all(DisjointPathPair::has_backup));
        assert!(result.pairs().iter().all(|pair| pair.cost() == ScalarWeight::new(4.0)));
        assert_ne!(result.pairs()[0], result.pairs()[1]);
    }

    #[test]
    fn rejects_out_of_range_group() {
        let membership = BTreeMap::from([(unit("A", "B"), 3)]);
        assert!(SrlgSearch::with_groups(2, membership).is_err());
    }
}
