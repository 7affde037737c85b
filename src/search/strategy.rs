use std::fmt;
use std::str::FromStr;

use crate::model::graph::{Edge, Graph};
use crate::model::path::{DisjointPathPair, Path};
use crate::model::weight::ScalarWeight;

use super::bellman_ford::BellmanFordSearch;
use super::bfs::BreadthFirstSearch;
use super::dfs::DepthFirstSearch;
use super::dijkstra::DijkstraSearch;
use super::error::{Result, SearchError};
use super::genetic::GeneticConfig;
use super::ksp::KShortestPathsSearch;
use super::srlg::{RiskGrouping, SrlgSearch};
use super::suurballe::SuurballeSearch;
use super::types::{EdgeWeigher, GraphPathSearch, MaxPaths};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchAlgorithm {
    Bfs,
    Dfs,
    BellmanFord,
    #[default]
    Dijkstra,
    KShortest,
    Suurballe,
    Srlg,
}

impl SearchAlgorithm {
    pub const ALL: [SearchAlgorithm; 7] = [
        SearchAlgorithm::Bfs,
        SearchAlgorithm::Dfs,
        SearchAlgorithm::BellmanFord,
        SearchAlgorithm::Dijkstra,
        SearchAlgorithm::KShortest,
        SearchAlgorithm::Suurballe,
        SearchAlgorithm::Srlg,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SearchAlgorithm::Bfs => "bfs",
            SearchAlgorithm::Dfs => "dfs",
            SearchAlgorithm::BellmanFord => "bellman_ford",
            SearchAlgorithm::Dijkstra => "dijkstra",
            SearchAlgorithm::KShortest => "k_shortest",
            SearchAlgorithm::Suurballe => "suurballe",
            SearchAlgorithm::Srlg => "srlg",
        }
    }

    /// Algorithms that return disjoint pairs rather than single paths.
    pub fn is_disjoint(self) -> bool {
        matches!(self, SearchAlgorithm::Suurballe | SearchAlgorithm::Srlg)
    }
}

impl fmt::Display for SearchAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchAlgorithm {
    type Err = SearchError;

    fn from_str(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "bfs" | "breadth_first" => Ok(SearchAlgorithm::Bfs),
            "dfs" | "depth_first" => Ok(SearchAlgorithm::Dfs),
            "bellman_ford" => Ok(SearchAlgorithm::BellmanFord),
            "dijkstra" | "spf" => Ok(SearchAlgorithm::Dijkstra),
            "k_shortest" | "ksp" | "yen" => Ok(SearchAlgorithm::KShortest),
            "suurballe" => Ok(SearchAlgorithm::Suurballe),
            "srlg" => Ok(SearchAlgorithm::Srlg),
            _ => Err(SearchError::InvalidArgument(format!(
                "unknown search algorithm: {raw}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchStrategyConfig {
    pub algorithm: SearchAlgorithm,
    pub max_paths: MaxPaths,
    pub genetic: GeneticConfig,
}

impl Default for SearchStrategyConfig {
    fn default() -> Self {
        Self {
            algorithm: SearchAlgorithm::Dijkstra,
            max_paths: MaxPaths::All,
            genetic: GeneticConfig::default(),
        }
    }
}

/// A route found by [`compute_paths`]. Disjoint searches fill in `backup`;
/// `cost` then covers both paths.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedRoute<E> {
    pub primary: Path<E>,
    pub backup: Option<Path<E>>,
    pub cost: ScalarWeight,
}

impl<E: Edge> ComputedRoute<E> {
    fn single(path: Path<E>) -> Self {
        let cost = path.cost();
        Self {
            primary: path,
            backup: None,
            cost,
        }
    }

    fn from_pair(pair: DisjointPathPair<E>) -> Self {
        let cost = pair.cost();
        Self {
            primary: pair.primary().clone(),
            backup: pair.secondary().cloned(),
            cost,
        }
    }

    pub fn dst(&self) -> &E::Vertex {
        self.primary.dst()
    }
}

/// Runs the configured algorithm. `grouping` only matters to the SRLG
/// search; without it SRLG behaves like Suurballe.
pub fn compute_paths<E: Edge>(
    graph: &Graph<E>,
    src: &E::Vertex,
    dst: Option<&E::Vertex>,
    weigher: Option<&dyn EdgeWeigher<E>>,
    config: &SearchStrategyConfig,
    grouping: Option<&RiskGrouping<E>>,
) -> Result<Vec<ComputedRoute<E>>> {
    let max_paths = config.max_paths;
    let singles = |paths: Vec<Path<E>>| -> Vec<ComputedRoute<E>> {
        paths.into_iter().map(ComputedRoute::single).collect()
    };
    let paired = |pairs: Vec<DisjointPathPair<E>>| -> Vec<ComputedRoute<E>> {
        pairs.into_iter().map(ComputedRoute::from_pair).collect()
    };

    let routes = match config.algorithm {
        SearchAlgorithm::Bfs => singles(
            BreadthFirstSearch
                .search(graph, src, dst, weigher, max_paths)?
                .into_paths(),
        ),
        SearchAlgorithm::Dfs => singles(
            DepthFirstSearch
                .search(graph, src, dst, weigher, max_paths)?
                .result
                .into_paths(),
        ),
        SearchAlgorithm::BellmanFord => singles(
            BellmanFordSearch
                .search(graph, src, dst, weigher, max_paths)?
                .into_paths(),
        ),
        SearchAlgorithm::Dijkstra => singles(
            DijkstraSearch
                .search(graph, src, dst, weigher, max_paths)?
                .into_paths(),
        ),
        SearchAlgorithm::KShortest => singles(
            KShortestPathsSearch
                .search(graph, src, dst, weigher, max_paths)?
                .into_paths(),
        ),
        SearchAlgorithm::Suurballe => paired(
            SuurballeSearch
                .search(graph, src, dst, weigher, max_paths)?
                .pairs,
        ),
        SearchAlgorithm::Srlg => paired(
            SrlgSearch::new(grouping.cloned())
                .with_genetic(config.genetic.clone())
                .search(graph, src, dst, weigher, max_paths)?
                .pairs,
        ),
    };
    Ok(routes)
}
