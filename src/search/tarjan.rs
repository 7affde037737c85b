use std::collections::{BTreeMap, BTreeSet};

use crate::model::graph::{Edge, Graph};

use super::types::EdgeWeigher;

/// Strongly connected components in the order Tarjan's algorithm completes
/// them, each with the edges running between its own vertices.
#[derive(Debug, Clone)]
pub struct SccResult<E: Edge> {
    pub cluster_vertices: Vec<BTreeSet<E::Vertex>>,
    pub cluster_edges: Vec<BTreeSet<E>>,
}

impl<E: Edge> SccResult<E> {
    pub fn cluster_count(&self) -> usize {
        self.cluster_vertices.len()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TarjanSearch;

impl TarjanSearch {
    /// Edges the weigher rates non-viable are ignored; without a weigher
    /// every edge counts.
    pub fn search<E: Edge>(
        &self,
        graph: &Graph<E>,
        weigher: Option<&dyn EdgeWeigher<E>>,
    ) -> SccResult<E> {
        strongly_connected_components(graph, weigher)
    }
}

struct Frame<'a, E: Edge> {
    vertex: E::Vertex,
    edges: Vec<&'a E>,
    next: usize,
}

struct Tarjan<V> {
    index: BTreeMap<V, usize>,
    lowlink: BTreeMap<V, usize>,
    stack: Vec<V>,
    on_stack: BTreeSet<V>,
}

impl<V: Ord + Clone> Tarjan<V> {
    fn visit(&mut self, vertex: &V) {
        let order = self.index.len();
        self.index.insert(vertex.clone(), order);
        self.lowlink.insert(vertex.clone(), order);
        self.stack.push(vertex.clone());
        self.on_stack.insert(vertex.clone());
    }

    fn lower(&mut self, vertex: &V, candidate: usize) {
        if let Some(low) = self.lowlink.get_mut(vertex) {
            *low = (*low).min(candidate);
        }
    }

    fn lowlink(&self, vertex: &V) -> usize {
        self.lowlink.get(vertex).copied().unwrap_or(usize::MAX)
    }

    fn is_root(&self, vertex: &V) -> bool {
        self.index.get(vertex) == self.lowlink.get(vertex)
    }

    fn pop_component(&mut self, root: &V) -> BTreeSet<V> {
        let mut component = BTreeSet::new();
        while let Some(member) = self.stack.pop() {
            self.on_stack.remove(&member);
            let done = member == *root;
            component.insert(member);
            if done {
                break;
            }
        }
        component
    }
}

pub fn strongly_connected_components<E: Edge>(
    graph: &Graph<E>,
    weigher: Option<&dyn EdgeWeigher<E>>,
) -> SccResult<E> {
    let viable_edges = |vertex: &E::Vertex| -> Vec<&E> {
        graph
            .edges_from(vertex)
            .filter(|edge| weigher.map_or(true, |weigher| weigher.weight(edge).is_viable()))
            .collect()
    };

    let mut state: Tarjan<E::Vertex> = Tarjan {
        index: BTreeMap::new(),
        lowlink: BTreeMap::new(),
        stack: Vec::new(),
        on_stack: BTreeSet::new(),
    };
    let mut cluster_vertices = Vec::new();

    for root in graph.vertices() {
        if state.index.contains_key(root) {
            continue;
        }
        state.visit(root);
        let mut frames = vec![Frame {
            vertex: root.clone(),
            edges: viable_edges(root),
            next: 0,
        }];

        while let Some(frame) = frames.last_mut() {
            if let Some(edge) = frame.edges.get(frame.next).copied() {
                frame.next += 1;
                let from = frame.vertex.clone();
                let to = edge.dst();
                if !state.index.contains_key(to) {
                    state.visit(to);
                    frames.push(Frame {
                        vertex: to.clone(),
                        edges: viable_edges(to),
                        next: 0,
                    });
                } else if state.on_stack.contains(to) {
                    let reached = state.index.get(to).copied().unwrap_or(usize::MAX);
                    state.lower(&from, reached);
                }
                continue;
            }

            let finished = frame.vertex.clone();
            frames.pop();
            if let Some(parent) = frames.last() {
                let low = state.lowlink(&finished);
                state.lower(&parent.vertex, low);
            }
            if state.is_root(&finished) {
                cluster_vertices.push(state.pop_component(&finished));
            }
        }
    }

    let cluster_edges = cluster_vertices
        .iter()
        .map(|members: &BTreeSet<E::Vertex>| {
            members
                .iter()
                .flat_map(|vertex| viable_edges(vertex))
                .filter(|edge| members.contains(edge.dst()))
                .cloned()
                .collect()
        })
        .collect();

    SccResult {
        cluster_vertices,
        cluster_edges,
    }
}
