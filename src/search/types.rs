use std::fmt;

use crate::model::graph::{Edge, Graph};
use crate::model::weight::ScalarWeight;

use super::error::{check_argument, Result};

/// Upper bound on the number of paths a search may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaxPaths {
    #[default]
    All,
    Bounded(usize),
}

impl MaxPaths {
    pub fn limit(self) -> Option<usize> {
        match self {
            MaxPaths::All => None,
            MaxPaths::Bounded(limit) => Some(limit),
        }
    }

    /// Whether a collection already holding `count` items may take one more.
    pub fn allows(self, count: usize) -> bool {
        match self {
            MaxPaths::All => true,
            MaxPaths::Bounded(limit) => count < limit,
        }
    }
}

impl From<usize> for MaxPaths {
    fn from(limit: usize) -> Self {
        MaxPaths::Bounded(limit)
    }
}

impl fmt::Display for MaxPaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxPaths::All => write!(f, "all"),
            MaxPaths::Bounded(limit) => write!(f, "{limit}"),
        }
    }
}

pub trait EdgeWeigher<E> {
    fn weight(&self, edge: &E) -> ScalarWeight;

    fn initial_weight(&self) -> ScalarWeight {
        ScalarWeight::ZERO
    }

    fn non_viable_weight(&self) -> ScalarWeight {
        ScalarWeight::NON_VIABLE
    }
}

impl<E, F> EdgeWeigher<E> for F
where
    F: Fn(&E) -> ScalarWeight,
{
    fn weight(&self, edge: &E) -> ScalarWeight {
        self(edge)
    }
}

/// Every edge costs one hop.
#[derive(Debug, Clone, Copy, Default)]
pub struct HopCountWeigher;

impl<E> EdgeWeigher<E> for HopCountWeigher {
    fn weight(&self, _edge: &E) -> ScalarWeight {
        ScalarWeight::ONE
    }
}

pub(crate) fn check_arguments<E: Edge>(
    graph: &Graph<E>,
    src: &E::Vertex,
    dst: Option<&E::Vertex>,
    max_paths: MaxPaths,
) -> Result<()> {
    check_argument(graph.contains_vertex(src), || {
        format!("source {src:?} is not in the graph")
    })?;
    if let Some(dst) = dst {
        check_argument(graph.contains_vertex(dst), || {
            format!("destination {dst:?} is not in the graph")
        })?;
    }
    check_argument(max_paths != MaxPaths::Bounded(0), || {
        "max paths must be positive".to_string()
    })
}

pub trait GraphPathSearch<E: Edge> {
    type Output;

    /// Validates the arguments and runs the search, weighing edges by hop
    /// count when no weigher is supplied.
    fn search(
        &self,
        graph: &Graph<E>,
        src: &E::Vertex,
        dst: Option<&E::Vertex>,
        weigher: Option<&dyn EdgeWeigher<E>>,
        max_paths: MaxPaths,
    ) -> Result<Self::Output> {
        check_arguments(graph, src, dst, max_paths)?;
        let weigher: &dyn EdgeWeigher<E> = weigher.unwrap_or(&HopCountWeigher);
        self.search_with(graph, src, dst, weigher, max_paths)
    }

    fn search_with(
        &self,
        graph: &Graph<E>,
        src: &E::Vertex,
        dst: Option<&E::Vertex>,
        weigher: &dyn EdgeWeigher<E>,
        max_paths: MaxPaths,
    ) -> Result<Self::Output>;
}
