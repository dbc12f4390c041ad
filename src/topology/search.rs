//! Neighbor search
//!
//! Per-station bounded BFS over the track graph. The search starts from all
//! of a station's bound vertices, flows freely through plain track vertices,
//! and refuses steps that double back too sharply (switchback-style turns).
//! Each discovered neighbor is then bucketed into one of two provisional
//! travel directions by the heading of its first step away from the source.

use std::collections::VecDeque;

use crate::constants::{HEADING_TOLERANCE, TURN_COS_LIMIT};
use crate::geometry::angle_difference;
use crate::topology::graph::{TrackGraph, VertexId};
use crate::topology::stations::StationBinding;

/// Provisional two-direction split of one station's neighbors, as station
/// indices sorted within each side. Only locally consistent; the
/// orientation engine reassigns the sides globally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provisional {
    pub left: Vec<usize>,
    pub right: Vec<usize>,
}

impl Provisional {
    /// Both sides merged, i.e. the undirected neighbor set
    pub fn neighbors(&self) -> impl Iterator<Item = usize> + '_ {
        self.left.iter().chain(self.right.iter()).copied()
    }
}

/// BFS state, kept per search rather than per graph
struct Traversal {
    depth: Vec<Option<u32>>,
    prev: Vec<Option<VertexId>>,
}

/// Compute the provisional neighbor split for every station of the railway
#[must_use]
pub fn provisional_neighbors(
    graph: &TrackGraph,
    binding: &StationBinding,
    station_count: usize,
) -> Vec<Provisional> {
    (0..station_count)
        .map(|i| station_directions(graph, binding, i))
        .collect()
}

/// Multi-source BFS from station `i`'s vertices.
///
/// A step from `pos` to an unvisited `x` is admitted when `pos` is a
/// source, a plain degree-2 vertex, or the turn stays wide (cosine of the
/// angle between the outgoing segment and the arrival segment below the
/// limit). Vertices owned by other stations are recorded and not expanded;
/// everything else keeps the search going.
fn station_neighbors(
    graph: &TrackGraph,
    binding: &StationBinding,
    i: usize,
) -> (Vec<VertexId>, Traversal) {
    let mut traversal = Traversal {
        depth: vec![None; graph.len()],
        prev: vec![None; graph.len()],
    };
    let mut queue = VecDeque::new();
    for &v in &binding.station_vertices[i] {
        if traversal.depth[v].is_none() {
            traversal.depth[v] = Some(0);
            queue.push_back(v);
        }
    }

    let mut next_stations = Vec::new();
    while let Some(pos) = queue.pop_front() {
        let arrived_from = traversal.prev[pos];
        for &x in &graph.vertices[pos].adj {
            if traversal.depth[x].is_some() {
                continue;
            }
            let admitted = match arrived_from {
                None => true,
                Some(p) => {
                    graph.degree(pos) == 2 || {
                        let outgoing = graph.pos(x) - graph.pos(pos);
                        let back = graph.pos(p) - graph.pos(pos);
                        outgoing.arg_cos(&back) < TURN_COS_LIMIT
                    }
                }
            };
            if !admitted {
                continue;
            }
            traversal.depth[x] = traversal.depth[pos].map(|d| d + 1);
            traversal.prev[x] = Some(pos);
            match binding.station_of[x] {
                Some(owner) if owner != i => next_stations.push(x),
                _ => queue.push_back(x),
            }
        }
    }
    (next_stations, traversal)
}

/// Heading of the first step the search took toward `n`, found by walking
/// the predecessor chain back to the vertex right after a source
fn first_step_heading(graph: &TrackGraph, traversal: &Traversal, n: VertexId) -> Option<f64> {
    let mut p = n;
    loop {
        let q = traversal.prev[p]?;
        if traversal.prev[q].is_none() {
            return Some((graph.pos(p) - graph.pos(q)).arg());
        }
        p = q;
    }
}

fn station_directions(graph: &TrackGraph, binding: &StationBinding, i: usize) -> Provisional {
    let (found, traversal) = station_neighbors(graph, binding, i);

    // The first discovered neighbor fixes the primary heading; everything
    // leaving within the tolerance of it shares that direction
    let mut primary_heading: Option<f64> = None;
    let mut primary: Vec<usize> = Vec::new();
    let mut secondary: Vec<usize> = Vec::new();
    for &n in &found {
        let Some(owner) = binding.station_of[n] else {
            continue;
        };
        let Some(heading) = first_step_heading(graph, &traversal, n) else {
            continue;
        };
        match primary_heading {
            None => {
                primary_heading = Some(heading);
                primary.push(owner);
            }
            Some(h0) => {
                if angle_difference(h0, heading) < HEADING_TOLERANCE {
                    primary.push(owner);
                } else {
                    secondary.push(owner);
                }
            }
        }
    }
    primary.sort_unstable();
    primary.dedup();
    secondary.sort_unstable();
    secondary.dedup();
    Provisional {
        left: secondary,
        right: primary,
    }
}
