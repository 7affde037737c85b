use std::collections::VecDeque;

use super::graph::Edge;
use super::weight::ScalarWeight;
use crate::search::{check_argument, Result, SearchError};

/// Non-empty, contiguous sequence of edges with its total cost.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path<E> {
    edges: Vec<E>,
    cost: ScalarWeight,
}

impl<E: Edge> Path<E> {
    pub fn new(edges: Vec<E>, cost: ScalarWeight) -> Result<Self> {
        check_argument(!edges.is_empty(), || "path must have at least one edge".to_string())?;
        for pair in edges.windows(2) {
            check_argument(pair[0].dst() == pair[1].src(), || {
                format!("edges {:?} and {:?} are not contiguous", pair[0], pair[1])
            })?;
        }
        Ok(Self { edges, cost })
    }

    pub fn edges(&self) -> &[E] {
        &self.edges
    }

    pub fn cost(&self) -> ScalarWeight {
        self.cost
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // Both accessors index a vector that construction guarantees is non-empty.
    pub fn src(&self) -> &E::Vertex {
        self.edges[0].src()
    }

    pub fn dst(&self) -> &E::Vertex {
        self.edges[self.edges.len() - 1].dst()
    }

    /// Vertices in travel order, source first.
    pub fn vertices(&self) -> impl Iterator<Item = &E::Vertex> + '_ {
        std::iter::once(self.src()).chain(self.edges.iter().map(|edge| edge.dst()))
    }

    pub fn into_edges(self) -> Vec<E> {
        self.edges
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutablePath<E> {
    edges: VecDeque<E>,
    cost: Option<ScalarWeight>,
}

impl<E> Default for MutablePath<E> {
    fn default() -> Self {
        Self {
            edges: VecDeque::new(),
            cost: None,
        }
    }
}

impl<E: Edge> MutablePath<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_path(path: &Path<E>) -> Self {
        Self {
            edges: path.edges.iter().cloned().collect(),
            cost: Some(path.cost),
        }
    }

    pub fn edges(&self) -> impl Iterator<Item = &E> + '_ {
        self.edges.iter()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn src(&self) -> Option<&E::Vertex> {
        self.edges.front().map(|edge| edge.src())
    }

    pub fn dst(&self) -> Option<&E::Vertex> {
        self.edges.back().map(|edge| edge.dst())
    }

    pub fn cost(&self) -> Option<ScalarWeight> {
        self.cost
    }

    pub fn set_cost(&mut self, cost: ScalarWeight) {
        self.cost = Some(cost);
    }

    pub fn contains_edge(&self, edge: &E) -> bool {
        self.edges.contains(edge)
    }

    pub fn reaches(&self, vertex: &E::Vertex) -> bool {
        self.edges.iter().any(|edge| edge.dst() == vertex)
    }

    /// Prepends `edge`; it must end where the path currently starts.
    pub fn insert(&mut self, edge: E) -> Result<()> {
        if let Some(src) = self.src() {
            check_argument(src == edge.dst(), || {
                format!("edge {edge:?} does not lead into path source {src:?}")
            })?;
        }
        self.edges.push_front(edge);
        Ok(())
    }

    pub fn append(&mut self, edge: E) -> Result<()> {
        if let Some(dst) = self.dst() {
            check_argument(dst == edge.src(), || {
                format!("edge {edge:?} does not leave path destination {dst:?}")
            })?;
        }
        self.edges.push_back(edge);
        Ok(())
    }

    /// Removes the first edge, the last edge, or a self-loop anywhere in the path.
    pub fn remove_edge(&mut self, edge: &E) -> Result<()> {
        if self.edges.front() == Some(edge) {
            self.edges.pop_front();
            return Ok(());
        }
        if self.edges.back() == Some(edge) {
            self.edges.pop_back();
            return Ok(());
        }
        let position = self.edges.iter().position(|candidate| candidate == edge);
        match position {
            Some(index) if edge.is_self_loop() => {
                self.edges.remove(index);
                Ok(())
            }
            Some(_) => Err(SearchError::InvalidArgument(format!(
                "edge {edge:?} is neither an end of the path nor a self-loop"
            ))),
            None => Err(SearchError::InvalidArgument(format!(
                "edge {edge:?} is not part of the path"
            ))),
        }
    }

    pub fn to_path(&self) -> Result<Path<E>> {
        Path::new(
            self.edges.iter().cloned().collect(),
            self.cost.unwrap_or_default(),
        )
    }
}

/// Primary path with an optional backup that avoids it.
#[derive(Debug, Clone)]
pub struct DisjointPathPair<E> {
    primary: Path<E>,
    secondary: Option<Path<E>>,
}

impl<E: Edge> DisjointPathPair<E> {
    pub fn new(primary: Path<E>, secondary: Option<Path<E>>) -> Self {
        Self { primary, secondary }
    }

    pub fn primary(&self) -> &Path<E> {
        &self.primary
    }

    pub fn secondary(&self) -> Option<&Path<E>> {
        self.secondary.as_ref()
    }

    pub fn has_backup(&self) -> bool {
        self.secondary.is_some()
    }

    pub fn cost(&self) -> ScalarWeight {
        match &self.secondary {
            Some(backup) => self.primary.cost().merge(backup.cost()),
            None => self.primary.cost(),
        }
    }

    pub fn edges(&self) -> &[E] {
        self.primary.edges()
    }

    pub fn src(&self) -> &E::Vertex {
        self.primary.src()
    }

    pub fn dst(&self) -> &E::Vertex {
        self.primary.dst()
    }

    pub fn size(&self) -> usize {
        if self.secondary.is_some() {
            2
        } else {
            1
        }
    }
}

impl<E: PartialEq> PartialEq for DisjointPathPair<E> {
    fn eq(&self, other: &Self) -> bool {
        let same_order = self.primary == other.primary && self.secondary == other.secondary;
        let swapped = self.secondary.as_ref() == Some(&other.primary)
            && other.secondary.as_ref() == Some(&self.primary);
        same_order || swapped
    }
}

impl<E: Eq> Eq for DisjointPathPair<E> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::graph::DefaultEdge;

    fn edge(src: char, dst: char) -> DefaultEdge<char> {
        DefaultEdge::new(src, dst)
    }

    #[test]
    fn path_rejects_gaps_and_empty_lists() {
        assert!(Path::<DefaultEdge<char>>::new(Vec::new(), ScalarWeight::ZERO).is_err());
        assert!(Path::new(vec![edge('A', 'B'), edge('C', 'D')], ScalarWeight::ONE).is_err());

        let path = Path::new(vec![edge('A', 'B'), edge('B', 'C')], ScalarWeight::new(2.0))
            .expect("contiguous path");
        assert_eq!(path.src(), &'A');
        assert_eq!(path.dst(), &'C');
        assert_eq!(path.vertices().copied().collect::<Vec<_>>(), vec!['A', 'B', 'C']);
    }

    #[test]
    fn mutable_path_removes_ends_and_self_loops() {
        let mut path = MutablePath::new();
        path.append(edge('A', 'B')).expect("append");
        path.append(edge('B', 'C')).expect("append");
        path.append(edge('C', 'C')).expect("append");
        path.append(edge('C', 'D')).expect("append");
        assert_eq!(path.len(), 4);

        path.remove_edge(&edge('A', 'B')).expect("remove first");
        assert_eq!(path.src(), Some(&'B'));
        assert_eq!(path.dst(), Some(&'D'));
        assert_eq!(path.len(), 3);

        path.remove_edge(&edge('C', 'C')).expect("remove loop");
        assert_eq!(path.len(), 2);

        path.remove_edge(&edge('C', 'D')).expect("remove last");
        assert_eq!(path.src(), Some(&'B'));
        assert_eq!(path.dst(), Some(&'C'));
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn mutable_path_checks_adjacency() {
        let mut path = MutablePath::new();
        path.insert(edge('B', 'C')).expect("first edge");
        path.insert(edge('A', 'B')).expect("prepend");
        assert!(path.insert(edge('X', 'Y')).is_err());
        assert!(path.append(edge('A', 'D')).is_err());
        path.append(edge('C', 'D')).expect("append");
        assert!(path.remove_edge(&edge('B', 'C')).is_err());
        assert!(path.reaches(&'C'));
        assert!(!path.reaches(&'A'));

        path.set_cost(ScalarWeight::new(3.0));
        let frozen = path.to_path().expect("valid path");
        assert_eq!(frozen.edge_count(), 3);
        assert_eq!(frozen.cost(), ScalarWeight::new(3.0));
    }

    #[test]
    fn pair_equality_ignores_order() {
        let primary = Path::new(vec![edge('A', 'B')], ScalarWeight::ONE).expect("path");
        let backup = Path::new(vec![edge('A', 'C'), edge('C', 'B')], ScalarWeight::new(2.0))
            .expect("path");
        let pair = DisjointPathPair::new(primary.clone(), Some(backup.clone()));
        let swapped = DisjointPathPair::new(backup, Some(primary.clone()));
        let lonely = DisjointPathPair::new(primary, None);

        assert_eq!(pair, swapped);
        assert_ne!(pair, lonely);
        assert_eq!(pair.size(), 2);
        assert_eq!(lonely.size(), 1);
        assert!(pair.cost().same_as(ScalarWeight::new(3.0)));
        assert_eq!(pair.src(), &'A');
        assert_eq!(pair.dst(), &'B');
    }
}
