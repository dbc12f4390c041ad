//! Track multigraph construction
//!
//! Collapses a railway's polylines into an undirected multigraph over
//! deduplicated coordinates, then repairs two geometric artifacts: degree-4
//! vertices where two lines merely cross, and station-less dead ends.

use indexmap::IndexMap;

use crate::geometry::{Polyline, Pos};
use crate::log;

pub type VertexId = usize;

/// One graph vertex with its adjacency. Parallel edges are allowed; the
/// degree of a vertex is the length of `adj`.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub pos: Pos,
    pub adj: Vec<VertexId>,
    /// Number of polyline walks that pass through this vertex
    pub path_visits: usize,
}

/// Undirected multigraph over a single railway's track geometry
#[derive(Debug, Clone, Default)]
pub struct TrackGraph {
    pub vertices: Vec<Vertex>,
}

impl TrackGraph {
    /// Walk every polyline in order, interning coordinates into dense vertex
    /// ids on first sight and adding an undirected edge per consecutive pair
    #[must_use]
    pub fn build(paths: &[Polyline]) -> Self {
        let mut index: IndexMap<Pos, VertexId> = IndexMap::new();
        let mut graph = TrackGraph::default();
        for path in paths {
            let mut prev: Option<VertexId> = None;
            for &p in path {
                let fresh = graph.vertices.len();
                let id = *index.entry(p).or_insert(fresh);
                if id == fresh {
                    graph.vertices.push(Vertex {
                        pos: p,
                        adj: Vec::new(),
                        path_visits: 0,
                    });
                }
                graph.vertices[id].path_visits += 1;
                if let Some(prev_id) = prev {
                    graph.vertices[prev_id].adj.push(id);
                    graph.vertices[id].adj.push(prev_id);
                }
                prev = Some(id);
            }
        }
        graph
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[must_use]
    pub fn pos(&self, v: VertexId) -> Pos {
        self.vertices[v].pos
    }

    #[must_use]
    pub fn degree(&self, v: VertexId) -> usize {
        self.vertices[v].adj.len()
    }

    /// Split degree-4 vertices where two polylines merely cross.
    ///
    /// A real four-way junction is visited by four distinct polylines; a
    /// crossing of two through-lines shows the same degree with fewer
    /// visits. The crossing vertex is duplicated at the same coordinate and
    /// the last two adjacency slots move to the duplicate, restoring two
    /// independent through paths.
    pub fn split_crossings(&mut self) {
        let original = self.vertices.len();
        let mut split = 0usize;
        for v in 0..original {
            if self.vertices[v].adj.len() != 4 || self.vertices[v].path_visits >= 4 {
                continue;
            }
            let clone_id = self.vertices.len();
            let moved = self.vertices[v].adj.split_off(2);
            for &neighbor in &moved {
                if let Some(slot) = self.vertices[neighbor].adj.iter().position(|&w| w == v) {
                    self.vertices[neighbor].adj[slot] = clone_id;
                }
            }
            let pos = self.vertices[v].pos;
            self.vertices.push(Vertex {
                pos,
                adj: moved,
                path_visits: 2,
            });
            split += 1;
        }
        if split > 0 {
            log!("Split {split} crossing vertices");
        }
    }

    /// Remove station-less dead ends.
    ///
    /// A degree-1 vertex that carries no station is a data artifact (a
    /// maintenance spur). Its edge is removed and the removal walks along
    /// the chain until a station or a branch stops it.
    pub fn prune_stubs(&mut self, station_of: &[Option<usize>]) {
        let mut removed = 0usize;
        for start in 0..self.vertices.len() {
            let mut v = start;
            while self.vertices[v].adj.len() == 1 && station_of[v].is_none() {
                let u = self.vertices[v].adj[0];
                self.vertices[v].adj.clear();
                self.vertices[u].adj.retain(|&w| w != v);
                removed += 1;
                v = u;
            }
        }
        if removed > 0 {
            log!("Pruned {removed} switchback edges");
        }
    }
}
