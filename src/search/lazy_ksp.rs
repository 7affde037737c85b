use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap};

use tracing::debug;

use crate::model::graph::{Edge, Graph};
use crate::model::path::Path;

use super::dijkstra::dijkstra;
use super::error::{check_argument, Result};
use super::ksp::{rank_paths, spur_candidates};
use super::types::{EdgeWeigher, HopCountWeigher, MaxPaths};

struct Candidate<E>(Path<E>);

impl<E: Edge> PartialEq for Candidate<E> {
    fn eq(&self, other: &Self) -> bool {
        rank_paths(&self.0, &other.0).is_eq()
    }
}

impl<E: Edge> Eq for Candidate<E> {}

impl<E: Edge> Ord for Candidate<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        rank_paths(&other.0, &self.0)
    }
}

impl<E: Edge> PartialOrd for Candidate<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Loop-free paths from source to destination, produced one at a time in
/// non-decreasing cost order. Nothing beyond the next path is computed until
/// it is asked for.
pub struct LazyKShortestPaths<'a, E: Edge> {
    graph: &'a Graph<E>,
    src: E::Vertex,
    dst: E::Vertex,
    weigher: &'a dyn EdgeWeigher<E>,
    started: bool,
    exhausted: bool,
    accepted: Vec<Path<E>>,
    candidates: BinaryHeap<Candidate<E>>,
    seen: BTreeSet<Vec<E>>,
    peeked: Option<Option<Path<E>>>,
}

pub fn lazy_search<'a, E: Edge>(
    graph: &'a Graph<E>,
    src: &E::Vertex,
    dst: &E::Vertex,
    weigher: Option<&'a dyn EdgeWeigher<E>>,
) -> Result<LazyKShortestPaths<'a, E>> {
    check_argument(graph.contains_vertex(src), || {
        format!("source {src:?} is not in the graph")
    })?;
    check_argument(graph.contains_vertex(dst), || {
        format!("destination {dst:?} is not in the graph")
    })?;
    Ok(LazyKShortestPaths {
        graph,
        src: src.clone(),
        dst: dst.clone(),
        weigher: weigher.unwrap_or(&HopCountWeigher),
        started: false,
        exhausted: false,
        accepted: Vec::new(),
        candidates: BinaryHeap::new(),
        seen: BTreeSet::new(),
        peeked: None,
    })
}

impl<E: Edge> LazyKShortestPaths<'_, E> {
    /// The path the next call to `next` will return. Repeated calls do not
    /// advance the enumeration.
    pub fn peek_next(&mut self) -> Option<&Path<E>> {
        if self.peeked.is_none() {
            let next = self.advance();
            self.peeked = Some(next);
        }
        self.peeked.as_ref().and_then(Option::as_ref)
    }

    pub fn emitted(&self) -> usize {
        self.accepted.len() - usize::from(matches!(self.peeked, Some(Some(_))))
    }

    /// True once no further path exists; later calls return `None` without
    /// searching again.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn advance(&mut self) -> Option<Path<E>> {
        if self.exhausted {
            return None;
        }
        if !self.started {
            self.started = true;
            let Some(first) = dijkstra(
                self.graph,
                &self.src,
                Some(&self.dst),
                self.weigher,
                MaxPaths::Bounded(1),
            )
            .into_paths()
            .into_iter()
            .next() else {
                self.exhausted = true;
                return None;
            };
            self.seen.insert(first.edges().to_vec());
            self.accepted.push(first.clone());
            return Some(first);
        }

        let last = self.accepted.last()?;
        for candidate in spur_candidates(self.graph, &self.dst, self.weigher, &self.accepted, last)
        {
            if self.seen.insert(candidate.edges().to_vec()) {
                self.candidates.push(Candidate(candidate));
            }
        }

        match self.candidates.pop() {
            Some(Candidate(next)) => {
                self.accepted.push(next.clone());
                Some(next)
            }
            None => {
                debug!(paths = self.accepted.len(), "k-shortest enumeration exhausted");
                self.exhausted = true;
                None
            }
        }
    }
}

impl<E: Edge> Iterator for LazyKShortestPaths<'_, E> {
    type Item = Path<E>;

    fn next(&mut self) -> Option<Path<E>> {
        match self.peeked.take() {
            Some(peeked) => peeked,
            None => self.advance(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::ksp::KShortestPathsSearch;
    use crate::search::test_support::{default_graph, edge, graph, weights};
    use crate::search::types::GraphPathSearch;

    #[test]
    fn enumerates_like_eager_search() {
        let graph = default_graph();
        let eager = KShortestPathsSearch
            .search(&graph, &"A", Some(&"E"), Some(weights()), MaxPaths::Bounded(10))
            .expect("search");
        let lazy: Vec<_> = lazy_search(&graph, &"A", &"E", Some(weights()))
            .expect("lazy search")
            .collect();
        assert_eq!(lazy.len(), 4);
        assert_eq!(lazy, eager.paths());
    }

    #[test]
    fn peeking_is_idempotent() {
        let graph = default_graph();
        let mut paths = lazy_search(&graph, &"A", &"E", Some(weights())).expect("lazy search");
        let first = paths.peek_next().cloned();
        assert_eq!(paths.peek_next().cloned(), first);
        assert_eq!(paths.emitted(), 0);
        assert_eq!(paths.next(), first);
        assert_eq!(paths.emitted(), 1);

        let second = paths.next().expect("second path");
        assert_ne!(Some(second), first);
        assert_eq!(paths.by_ref().count(), 2);
        assert!(paths.is_exhausted());
        assert!(paths.peek_next().is_none());
        assert!(paths.next().is_none());
        assert_eq!(paths.emitted(), 4);
    }

    #[test]
    fn unreachable_destination_yields_nothing() {
        let graph = graph(
            &["A", "B", "C", "D"],
            vec![
                edge("A", "B", 1.0),
                edge("B", "A", 1.0),
                edge("C", "D", 1.0),
                edge("D", "C", 1.0),
            ],
        );
        let mut paths = lazy_search(&graph, &"A", &"D", Some(weights())).expect("lazy search");
        assert!(paths.peek_next().is_none());
        assert!(paths.is_exhausted());
        assert!(paths.next().is_none());
        assert!(lazy_search(&graph, &"A", &"Z", None).is_err());
    }
}
