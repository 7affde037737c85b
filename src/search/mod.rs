mod bellman_ford;
mod bfs;
mod dfs;
mod dijkstra;
mod error;
mod genetic;
mod heap;
mod ksp;
mod lazy_ksp;
mod result;
mod srlg;
mod strategy;
mod suurballe;
mod tarjan;
mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use bellman_ford::{bellman_ford, BellmanFordSearch};
pub use bfs::{breadth_first, BreadthFirstSearch};
pub use dfs::{depth_first, DepthFirstSearch, EdgeType, SpanningTreeResult};
pub use dijkstra::{dijkstra, DijkstraSearch};
pub(crate) use error::check_argument;
pub use error::{Result, SearchError};
pub use genetic::{GaPopulation, GeneticConfig, Organism};
pub use heap::Heap;
pub use ksp::{k_shortest_paths, rank_paths, KShortestPathsSearch};
pub use lazy_ksp::{lazy_search, LazyKShortestPaths};
pub use result::SearchResult;
pub use srlg::{srlg_pairs, RiskGrouping, SrlgSearch};
pub use strategy::{compute_paths, ComputedRoute, SearchAlgorithm, SearchStrategyConfig};
pub use suurballe::{suurballe, DisjointPathResult, SuurballeSearch};
pub use tarjan::{strongly_connected_components, SccResult, TarjanSearch};
pub use types::{EdgeWeigher, GraphPathSearch, HopCountWeigher, MaxPaths};
