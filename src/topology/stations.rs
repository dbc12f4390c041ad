//! Station binding
//!
//! Anchors each station to the track graph: every platform polyline's
//! representative position picks the nearest graph vertex by planar
//! distance.

use crate::models::Station;
use crate::topology::graph::{TrackGraph, VertexId};

/// Result of binding a railway's stations to graph vertices.
///
/// `station_vertices[i]` holds one vertex id per platform of station `i`;
/// `station_of[v]` labels the station owning vertex `v`, if any. When two
/// stations claim the same vertex the later one wins; this input-order
/// tie-break is deliberate and downstream passes rely on it.
#[derive(Debug, Clone)]
pub struct StationBinding {
    pub station_vertices: Vec<Vec<VertexId>>,
    pub station_of: Vec<Option<usize>>,
}

#[must_use]
pub fn bind_stations(graph: &TrackGraph, stations: &[&Station]) -> StationBinding {
    let mut binding = StationBinding {
        station_vertices: vec![Vec::new(); stations.len()],
        station_of: vec![None; graph.len()],
    };
    for (i, station) in stations.iter().enumerate() {
        for platform in 0..station.platforms.len() {
            let Some(midpoint) = station.platform_midpoint(platform) else {
                continue;
            };
            let mut best: Option<(f64, VertexId)> = None;
            for (v, vertex) in graph.vertices.iter().enumerate() {
                let d = midpoint.dist(&vertex.pos);
                if best.is_none_or(|(bd, _)| d < bd) {
                    best = Some((d, v));
                }
            }
            if let Some((_, v)) = best {
                binding.station_vertices[i].push(v);
                binding.station_of[v] = Some(i);
            }
        }
    }
    binding
}
