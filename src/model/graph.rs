use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

pub trait Vertex: Clone + Ord + Debug {}

impl<T: Clone + Ord + Debug> Vertex for T {}

pub trait Edge: Clone + Ord + Debug {
    type Vertex: Vertex;

    fn src(&self) -> &Self::Vertex;
    fn dst(&self) -> &Self::Vertex;

    fn is_self_loop(&self) -> bool {
        self.src() == self.dst()
    }
}

/// Edge identified by its endpoints alone.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DefaultEdge<V> {
    pub src: V,
    pub dst: V,
}

impl<V> DefaultEdge<V> {
    pub fn new(src: V, dst: V) -> Self {
        Self { src, dst }
    }
}

impl<V: Vertex> Edge for DefaultEdge<V> {
    type Vertex = V;

    fn src(&self) -> &V {
        &self.src
    }

    fn dst(&self) -> &V {
        &self.dst
    }
}

type Adjacency<E> = BTreeMap<<E as Edge>::Vertex, BTreeSet<E>>;

fn index_edge<E: Edge>(sources: &mut Adjacency<E>, destinations: &mut Adjacency<E>, edge: &E) {
    sources
        .entry(edge.src().clone())
        .or_default()
        .insert(edge.clone());
    destinations
        .entry(edge.dst().clone())
        .or_default()
        .insert(edge.clone());
}

fn unindex_edge<E: Edge>(sources: &mut Adjacency<E>, destinations: &mut Adjacency<E>, edge: &E) {
    if let Some(out) = sources.get_mut(edge.src()) {
        out.remove(edge);
        if out.is_empty() {
            sources.remove(edge.src());
        }
    }
    if let Some(incoming) = destinations.get_mut(edge.dst()) {
        incoming.remove(edge);
        if incoming.is_empty() {
            destinations.remove(edge.dst());
        }
    }
}

/// Immutable adjacency-lists graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph<E: Edge> {
    vertices: BTreeSet<E::Vertex>,
    edges: BTreeSet<E>,
    sources: Adjacency<E>,
    destinations: Adjacency<E>,
}

impl<E: Edge> Graph<E> {
    pub fn new(
        vertices: impl IntoIterator<Item = E::Vertex>,
        edges: impl IntoIterator<Item = E>,
    ) -> Self {
        let mut all_vertices: BTreeSet<E::Vertex> = vertices.into_iter().collect();
        let edges: BTreeSet<E> = edges.into_iter().collect();
        let mut sources = BTreeMap::new();
        let mut destinations = BTreeMap::new();
        for edge in &edges {
            all_vertices.insert(edge.src().clone());
            all_vertices.insert(edge.dst().clone());
            index_edge(&mut sources, &mut destinations, edge);
        }
        Self {
            vertices: all_vertices,
            edges,
            sources,
            destinations,
        }
    }

    pub fn vertices(&self) -> &BTreeSet<E::Vertex> {
        &self.vertices
    }

    pub fn edges(&self) -> &BTreeSet<E> {
        &self.edges
    }

    pub fn contains_vertex(&self, vertex: &E::Vertex) -> bool {
        self.vertices.contains(vertex)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges_from<'a>(&'a self, src: &E::Vertex) -> impl Iterator<Item = &'a E> + 'a {
        self.sources.get(src).into_iter().flatten()
    }

    pub fn edges_to<'a>(&'a self, dst: &E::Vertex) -> impl Iterator<Item = &'a E> + 'a {
        self.destinations.get(dst).into_iter().flatten()
    }

    pub fn to_mutable(&self) -> MutableGraph<E> {
        MutableGraph {
            vertices: self.vertices.clone(),
            edges: self.edges.clone(),
            sources: self.sources.clone(),
            destinations: self.destinations.clone(),
        }
    }
}

/// Working copy of a graph; every mutation keeps the adjacency indices in step
/// with the edge set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutableGraph<E: Edge> {
    vertices: BTreeSet<E::Vertex>,
    edges: BTreeSet<E>,
    sources: Adjacency<E>,
    destinations: Adjacency<E>,
}

impl<E: Edge> MutableGraph<E> {
    pub fn new(
        vertices: impl IntoIterator<Item = E::Vertex>,
        edges: impl IntoIterator<Item = E>,
    ) -> Self {
        Graph::new(vertices, edges).to_mutable()
    }

    pub fn vertices(&self) -> &BTreeSet<E::Vertex> {
        &self.vertices
    }

    pub fn edges(&self) -> &BTreeSet<E> {
        &self.edges
    }

    pub fn edges_from<'a>(&'a self, src: &E::Vertex) -> impl Iterator<Item = &'a E> + 'a {
        self.sources.get(src).into_iter().flatten()
    }

    pub fn edges_to<'a>(&'a self, dst: &E::Vertex) -> impl Iterator<Item = &'a E> + 'a {
        self.destinations.get(dst).into_iter().flatten()
    }

    pub fn add_vertex(&mut self, vertex: E::Vertex) -> bool {
        self.vertices.insert(vertex)
    }

    pub fn add_edge(&mut self, edge: E) -> bool {
        if self.edges.contains(&edge) {
            return false;
        }
        self.vertices.insert(edge.src().clone());
        self.vertices.insert(edge.dst().clone());
        index_edge(&mut self.sources, &mut self.destinations, &edge);
        self.edges.insert(edge)
    }

    pub fn remove_edge(&mut self, edge: &E) -> bool {
        if !self.edges.remove(edge) {
            return false;
        }
        unindex_edge(&mut self.sources, &mut self.destinations, edge);
        true
    }

    pub fn remove_vertex(&mut self, vertex: &E::Vertex) -> bool {
        if !self.vertices.remove(vertex) {
            return false;
        }
        let incident: Vec<E> = self
            .edges_from(vertex)
            .chain(self.edges_to(vertex))
            .cloned()
            .collect();
        for edge in &incident {
            self.remove_edge(edge);
        }
        true
    }

    pub fn to_immutable(&self) -> Graph<E> {
        Graph {
            vertices: self.vertices.clone(),
            edges: self.edges.clone(),
            sources: self.sources.clone(),
            destinations: self.destinations.clone(),
        }
    }
}
