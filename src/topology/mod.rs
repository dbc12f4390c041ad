//! Next-station inference
//!
//! Per railway: raw polylines go through junction injection, graph
//! building, station binding, the neighbor search, and per-component
//! classification and orientation, ending in directed next-station records.
//! Railways are independent; a failed pass reports a diagnostic without
//! affecting the others.

pub mod classify;
pub mod graph;
pub mod junctions;
pub mod orientation;
pub mod search;
pub mod stations;

pub use graph::{TrackGraph, Vertex, VertexId};
pub use orientation::OrientedStation;
pub use search::Provisional;
pub use stations::StationBinding;

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;

use crate::geometry::Polyline;
use crate::log;
use crate::models::{NextStaInfo, RailNetwork, Station};
use crate::union_find::UnionFind;

/// Run the full pipeline for one railway.
///
/// `stations` are the railway's stations in input order; the returned
/// records reference them through `NextStaInfo::station`. Connected
/// components are concatenated in first-discovery order and their station
/// indices offset by the sizes of the components before them.
///
/// # Errors
/// Returns a diagnostic when a component violates an orientation
/// invariant; the railway's whole pass is abandoned in that case.
pub fn railway_next_stations(
    paths: &[Polyline],
    stations: &[&Station],
) -> Result<Vec<NextStaInfo>, String> {
    if stations.is_empty() {
        return Ok(Vec::new());
    }

    let mut paths = paths.to_vec();
    junctions::inject_junctions(&mut paths);

    let mut track_graph = graph::TrackGraph::build(&paths);
    track_graph.split_crossings();
    let binding = stations::bind_stations(&track_graph, stations);
    track_graph.prune_stubs(&binding.station_of);
    log!(
        "Track graph ready: {} vertices for {} stations",
        track_graph.len(),
        stations.len()
    );

    let provisional = search::provisional_neighbors(&track_graph, &binding, stations.len());

    // Symmetrized station adjacency and connectivity
    let n = stations.len();
    let mut uf = UnionFind::new(n);
    let mut neighbor_sets: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
    for (i, p) in provisional.iter().enumerate() {
        for j in p.neighbors() {
            neighbor_sets[i].insert(j);
            neighbor_sets[j].insert(i);
            uf.union(i, j);
        }
    }

    // Components in first-discovery order, members keeping input order
    let mut component_slots: HashMap<usize, usize> = HashMap::new();
    let mut components: Vec<Vec<usize>> = Vec::new();
    for i in 0..n {
        let root = uf.find(i);
        let slot = *component_slots.entry(root).or_insert(components.len());
        if slot == components.len() {
            components.push(Vec::new());
        }
        components[slot].push(i);
    }
    log!("Found {} station components", components.len());

    let mut out = Vec::new();
    let mut offset = 0usize;
    for members in &components {
        let local_of: HashMap<usize, usize> = members
            .iter()
            .enumerate()
            .map(|(local, &global)| (global, local))
            .collect();
        let local_adjacency: Vec<Vec<usize>> = members
            .iter()
            .map(|&g| neighbor_sets[g].iter().map(|x| local_of[x]).collect())
            .collect();
        let local_provisional: Vec<Provisional> = members
            .iter()
            .map(|&g| Provisional {
                left: provisional[g].left.iter().map(|x| local_of[x]).collect(),
                right: provisional[g].right.iter().map(|x| local_of[x]).collect(),
            })
            .collect();
        let local_stations: Vec<&Station> = members.iter().map(|&g| stations[g]).collect();

        let shape = classify::classify(&local_adjacency);
        let oriented = orientation::orient_component(
            shape,
            &local_adjacency,
            &local_provisional,
            &local_stations,
        )?;
        for record in oriented {
            out.push(NextStaInfo {
                station: members[record.station],
                index: offset + record.station,
                left: record.left.iter().map(|&x| offset + x).collect(),
                right: record.right.iter().map(|&x| offset + x).collect(),
            });
        }
        offset += members.len();
    }
    Ok(out)
}

/// Run every railway of the network. Failed passes keep their diagnostic;
/// they never poison the other railways.
#[must_use]
pub fn analyze(net: &RailNetwork) -> IndexMap<u32, Result<Vec<NextStaInfo>, String>> {
    let mut results = IndexMap::new();
    for id in net.railway_ids() {
        let railway_stations = net.stations_of(id);
        let result = railway_next_stations(net.paths_of(id), &railway_stations);
        if let Err(diagnostic) = &result {
            log!("Railway {id} failed: {diagnostic}");
        }
        results.insert(id, result);
    }
    results
}
