//! Orientation engine
//!
//! The provisional directions coming out of the neighbor search are only
//! locally consistent. This pass reassigns every station's `left` and
//! `right` so that the whole component agrees: whenever Y is a right
//! neighbor of X, X is a left neighbor of Y. The strategy depends on the
//! component's shape; branched components are converted into a DAG and
//! decomposed by repeatedly peeling the longest remaining path, which keeps
//! the main line as a spine and attaches branches as offshoots.

use std::collections::VecDeque;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::models::{RailwayType, Station};
use crate::topology::search::Provisional;

/// Final directed adjacency of one station, in component-local indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrientedStation {
    pub station: usize,
    pub left: Vec<usize>,
    pub right: Vec<usize>,
}

/// Orient one connected component. The records come back in traversal
/// order, which becomes the component's emission order.
///
/// # Errors
/// Returns a diagnostic when a structural invariant fails: a missing
/// endpoint in a chain or loop, or a direction assignment that stays
/// cyclic after the one-shot repair.
pub fn orient_component(
    shape: RailwayType,
    adjacency: &[Vec<usize>],
    provisional: &[Provisional],
    stations: &[&Station],
) -> Result<Vec<OrientedStation>, String> {
    match shape {
        RailwayType::None => Ok(vec![OrientedStation {
            station: 0,
            left: Vec::new(),
            right: Vec::new(),
        }]),
        RailwayType::LinearList => orient_linear(adjacency),
        RailwayType::Circle => orient_circle(adjacency),
        RailwayType::WithLoop => orient_loop(adjacency, stations),
        RailwayType::WithBranches => orient_branched(adjacency, provisional),
    }
}

/// Walk an open chain from one endpoint to the other
fn orient_linear(adjacency: &[Vec<usize>]) -> Result<Vec<OrientedStation>, String> {
    let start = adjacency
        .iter()
        .position(|neighbors| neighbors.len() == 1)
        .ok_or("linear component has no endpoint")?;
    let mut out = Vec::with_capacity(adjacency.len());
    let mut prev: Option<usize> = None;
    let mut cur = start;
    loop {
        let next = adjacency[cur].iter().copied().find(|&x| Some(x) != prev);
        let left: Vec<usize> = prev.into_iter().collect();
        match next {
            Some(nx) => {
                out.push(OrientedStation {
                    station: cur,
                    left,
                    right: vec![nx],
                });
                prev = Some(cur);
                cur = nx;
            }
            None => {
                out.push(OrientedStation {
                    station: cur,
                    left,
                    right: Vec::new(),
                });
                return Ok(out);
            }
        }
    }
}

/// Walk a closed ring starting at station 0, either neighbor first
fn orient_circle(adjacency: &[Vec<usize>]) -> Result<Vec<OrientedStation>, String> {
    let first_right = *adjacency[0]
        .first()
        .ok_or("circle station has no neighbors")?;
    let mut out = vec![OrientedStation {
        station: 0,
        left: Vec::new(),
        right: vec![first_right],
    }];
    let mut prev = 0usize;
    let mut cur = first_right;
    while cur != 0 {
        let next = adjacency[cur]
            .iter()
            .copied()
            .find(|&x| x != prev)
            .ok_or("circle walk has nowhere to go")?;
        out.push(OrientedStation {
            station: cur,
            left: vec![prev],
            right: vec![next],
        });
        prev = cur;
        cur = next;
    }
    out[0].left = vec![prev];
    Ok(out)
}

/// Walk a chain that ends in a balloon loop.
///
/// At the degree-3 junction both loop arms go into `right`, ordered by the
/// lexicographically smaller first platform vertex; the walk continues
/// around the loop once and the last loop station collects both the arm
/// predecessor and the junction in `left`.
fn orient_loop(
    adjacency: &[Vec<usize>],
    stations: &[&Station],
) -> Result<Vec<OrientedStation>, String> {
    let start = adjacency
        .iter()
        .position(|neighbors| neighbors.len() == 1)
        .ok_or("loop component has no endpoint")?;
    let junction = adjacency
        .iter()
        .position(|neighbors| neighbors.len() == 3)
        .ok_or("loop component has no junction")?;

    let mut out = Vec::with_capacity(adjacency.len());
    let mut prev: Option<usize> = None;
    let mut cur = start;
    let mut visited_branch = false;
    loop {
        if cur == junction && !visited_branch {
            let pred = prev.ok_or("loop junction reached without a predecessor")?;
            let mut arms: Vec<usize> = adjacency[cur]
                .iter()
                .copied()
                .filter(|&x| x != pred)
                .collect();
            if arms.len() != 2 {
                return Err(format!(
                    "loop junction has {} continuations, expected 2",
                    arms.len()
                ));
            }
            arms.sort_by(|&a, &b| {
                stations[a]
                    .platform_origin()
                    .cmp(&stations[b].platform_origin())
            });
            out.push(OrientedStation {
                station: cur,
                left: vec![pred],
                right: arms.clone(),
            });
            visited_branch = true;
            prev = Some(cur);
            cur = arms[0];
            continue;
        }

        let next = adjacency[cur].iter().copied().find(|&x| Some(x) != prev);
        let mut left: Vec<usize> = prev.into_iter().collect();
        match next {
            Some(nx) if nx == junction && visited_branch => {
                // Closed the loop: this arm terminates here
                left.push(junction);
                out.push(OrientedStation {
                    station: cur,
                    left,
                    right: Vec::new(),
                });
                return Ok(out);
            }
            Some(nx) => {
                out.push(OrientedStation {
                    station: cur,
                    left,
                    right: vec![nx],
                });
                prev = Some(cur);
                cur = nx;
            }
            None => {
                out.push(OrientedStation {
                    station: cur,
                    left,
                    right: Vec::new(),
                });
                return Ok(out);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

fn side_of(provisional: &Provisional, v: usize) -> Side {
    if provisional.right.contains(&v) {
        Side::Right
    } else {
        Side::Left
    }
}

/// Convert the undirected component into a directed seed graph.
///
/// A BFS from station 0 carries an orientation bit: which provisional side
/// currently counts as "forward". Every edge is placed once, by whichever
/// endpoint is dequeued first, pointing forward out of that endpoint's
/// current orientation; the neighbor's bit is then chosen so its forward
/// side agrees with the edge.
fn build_seed_dag(adjacency: &[Vec<usize>], provisional: &[Provisional]) -> Vec<Vec<usize>> {
    let n = adjacency.len();
    let mut root: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut seen = vec![false; n];
    let mut done = vec![false; n];
    let mut forward_right = vec![true; n];
    let mut queue = VecDeque::new();
    seen[0] = true;
    queue.push_back(0usize);

    while let Some(u) = queue.pop_front() {
        for &v in &adjacency[u] {
            if done[v] {
                continue;
            }
            let forward_side = if forward_right[u] {
                Side::Right
            } else {
                Side::Left
            };
            let u_points_at_v = side_of(&provisional[u], v) == forward_side;
            if u_points_at_v {
                root[u].push(v);
            } else {
                root[v].push(u);
            }
            if !seen[v] {
                seen[v] = true;
                let v_sees_u_right = side_of(&provisional[v], u) == Side::Right;
                forward_right[v] = if u_points_at_v {
                    // u is behind v: forward is the side not holding u
                    !v_sees_u_right
                } else {
                    // u is ahead of v
                    v_sees_u_right
                };
                queue.push_back(v);
            }
        }
        done[u] = true;
    }
    root
}

/// Topological order of the seed graph, or None if it contains a cycle
fn topo_order(root: &[Vec<usize>]) -> Option<Vec<usize>> {
    let mut graph: DiGraph<usize, ()> = DiGraph::new();
    let nodes: Vec<NodeIndex> = (0..root.len()).map(|i| graph.add_node(i)).collect();
    for (u, outs) in root.iter().enumerate() {
        for &v in outs {
            graph.add_edge(nodes[u], nodes[v], ());
        }
    }
    toposort(&graph, None)
        .ok()
        .map(|order| order.into_iter().map(NodeIndex::index).collect())
}

/// One-shot repair when the seed assignment came out cyclic: stations whose
/// provisional split put both neighbors on a single side get rebalanced
fn repair_provisional(provisional: &mut [Provisional]) {
    for p in provisional.iter_mut() {
        if p.left.is_empty() && p.right.len() == 2 {
            std::mem::swap(&mut p.left, &mut p.right);
        }
    }
    for p in provisional.iter_mut() {
        if p.left.len() == 2 && p.right.is_empty() {
            if let Some(moved) = p.left.pop() {
                p.right.push(moved);
            }
        }
    }
}

/// Repeatedly extract the longest remaining path of the DAG.
///
/// The DP counts unvisited stations only, and edges whose endpoints are
/// both already visited are ignored, so each round must collect at least
/// one new station. Extraction keeps following admissible edges past the
/// last unvisited station so that convergent edges are still committed.
/// Seed edges no extracted path ever ran along (chords between stations of
/// one path) are committed at the end; dropping them would disconnect a
/// neighbor pair. Returns the committed edges and the order stations were
/// first covered.
fn peel_longest_paths(
    root: &[Vec<usize>],
    order: &[usize],
) -> Result<(Vec<Vec<usize>>, Vec<usize>), String> {
    let n = root.len();
    let mut visited = vec![false; n];
    let mut aligned: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut emitted: Vec<usize> = Vec::new();

    while emitted.len() < n {
        let mut dp = vec![0usize; n];
        for &v in order.iter().rev() {
            let best = root[v]
                .iter()
                .copied()
                .filter(|&u| !(visited[v] && visited[u]))
                .map(|u| dp[u])
                .max()
                .unwrap_or(0);
            dp[v] = usize::from(!visited[v]) + best;
        }

        let mut start = 0usize;
        for v in 1..n {
            if dp[v] > dp[start] {
                start = v;
            }
        }
        if dp[start] == 0 {
            return Err("longest-path extraction stalled".to_string());
        }

        let mut path = vec![start];
        let mut cur = start;
        loop {
            let mut next: Option<usize> = None;
            for &u in &root[cur] {
                if visited[cur] && visited[u] {
                    continue;
                }
                if next.is_none_or(|b| dp[u] > dp[b]) {
                    next = Some(u);
                }
            }
            let Some(nx) = next else { break };
            aligned[cur].push(nx);
            path.push(nx);
            cur = nx;
        }
        for &v in &path {
            if !visited[v] {
                visited[v] = true;
                emitted.push(v);
            }
        }
    }

    // Commit leftover chords
    for (u, outs) in root.iter().enumerate() {
        for &v in outs {
            if !aligned[u].contains(&v) {
                aligned[u].push(v);
            }
        }
    }
    Ok((aligned, emitted))
}

/// Branched components: seed DAG, toposort (with one repair retry), then
/// longest-path peeling
fn orient_branched(
    adjacency: &[Vec<usize>],
    provisional: &[Provisional],
) -> Result<Vec<OrientedStation>, String> {
    let mut provisional = provisional.to_vec();
    let mut root = build_seed_dag(adjacency, &provisional);
    let order = match topo_order(&root) {
        Some(order) => order,
        None => {
            repair_provisional(&mut provisional);
            root = build_seed_dag(adjacency, &provisional);
            topo_order(&root)
                .ok_or("direction assignment still cyclic after rebalancing repair")?
        }
    };

    let (aligned, emitted) = peel_longest_paths(&root, &order)?;

    let n = adjacency.len();
    let mut left: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (u, outs) in aligned.iter().enumerate() {
        for &v in outs {
            left[v].push(u);
        }
    }
    Ok(emitted
        .iter()
        .map(|&v| OrientedStation {
            station: v,
            left: left[v].clone(),
            right: aligned[v].clone(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Pos;

    fn station_at(code: u32, lat: f64, lng: f64) -> Station {
        Station {
            code,
            railway_id: 1,
            name: format!("S{code}"),
            platforms: vec![vec![Pos::new(lat, lng)]],
        }
    }

    fn prov(left: &[usize], right: &[usize]) -> Provisional {
        Provisional {
            left: left.to_vec(),
            right: right.to_vec(),
        }
    }

    fn check_symmetry(records: &[OrientedStation]) {
        let find = |id: usize| {
            records
                .iter()
                .find(|r| r.station == id)
                .expect("station present")
        };
        for r in records {
            for &nx in &r.right {
                assert!(
                    find(nx).left.contains(&r.station),
                    "right neighbor {nx} of {} lacks the back link",
                    r.station
                );
            }
            for &nx in &r.left {
                assert!(
                    find(nx).right.contains(&r.station),
                    "left neighbor {nx} of {} lacks the back link",
                    r.station
                );
            }
            for &nx in &r.left {
                assert!(!r.right.contains(&nx), "side overlap at {}", r.station);
            }
        }
    }

    #[test]
    fn test_linear_walk() {
        let adjacency = vec![vec![1], vec![0, 2], vec![1, 3], vec![2]];
        let records = orient_linear(&adjacency).expect("orients");
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].station, 0);
        assert!(records[0].left.is_empty());
        assert_eq!(records[0].right, vec![1]);
        assert_eq!(records[2].left, vec![1]);
        assert_eq!(records[2].right, vec![3]);
        assert_eq!(records[3].right, Vec::<usize>::new());
        check_symmetry(&records);
    }

    #[test]
    fn test_linear_without_endpoint_fails() {
        let adjacency = vec![vec![1, 2], vec![0, 2], vec![0, 1]];
        assert!(orient_linear(&adjacency).is_err());
    }

    #[test]
    fn test_circle_walk_returns_to_origin() {
        let adjacency = vec![vec![1, 3], vec![0, 2], vec![1, 3], vec![0, 2]];
        let records = orient_circle(&adjacency).expect("orients");
        assert_eq!(records.len(), 4);
        check_symmetry(&records);
        // Follow right successors around the ring
        let mut cur = 0usize;
        for _ in 0..4 {
            let record = records
                .iter()
                .find(|r| r.station == cur)
                .expect("station present");
            assert_eq!(record.right.len(), 1);
            assert_eq!(record.left.len(), 1);
            cur = record.right[0];
        }
        assert_eq!(cur, 0);
    }

    #[test]
    fn test_loop_walk() {
        // 0 - 1, then the loop 1-2-3 back to 1
        let adjacency = vec![vec![1], vec![0, 2, 3], vec![1, 3], vec![1, 2]];
        let stations = [
            station_at(10, 0.0, 0.0),
            station_at(11, 1.0, 0.0),
            station_at(12, 2.0, 1.0),
            station_at(13, 2.0, -1.0),
        ];
        let refs: Vec<&Station> = stations.iter().collect();
        let records = orient_loop(&adjacency, &refs).expect("orients");
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].station, 0);
        assert_eq!(records[0].right, vec![1]);
        // Station 3 sits at the smaller platform position, so it leads
        assert_eq!(records[1].station, 1);
        assert_eq!(records[1].left, vec![0]);
        assert_eq!(records[1].right, vec![3, 2]);
        assert_eq!(records[2].station, 3);
        assert_eq!(records[2].left, vec![1]);
        assert_eq!(records[2].right, vec![2]);
        // The last loop station carries both its arm predecessor and the
        // junction on its left
        assert_eq!(records[3].station, 2);
        assert_eq!(records[3].left, vec![3, 1]);
        assert!(records[3].right.is_empty());
        check_symmetry(&records);
    }

    #[test]
    fn test_branched_star() {
        let adjacency = vec![vec![1, 2, 3], vec![0], vec![0], vec![0]];
        let provisional = vec![
            prov(&[2, 3], &[1]),
            prov(&[], &[0]),
            prov(&[], &[0]),
            prov(&[], &[0]),
        ];
        let records = orient_branched(&adjacency, &provisional).expect("orients");
        assert_eq!(records.len(), 4);
        check_symmetry(&records);
        // The spine runs 2 -> 0 -> 1; branch 3 attaches below the hub
        assert_eq!(records[0].station, 2);
        assert_eq!(records[0].right, vec![0]);
        let hub = records
            .iter()
            .find(|r| r.station == 0)
            .expect("hub present");
        assert_eq!(hub.left, vec![2, 3]);
        assert_eq!(hub.right, vec![1]);
    }

    #[test]
    fn test_branched_cycle_without_pattern_fails() {
        // Rotationally inconsistent provisional directions on a triangle
        // produce a directed cycle the rebalancing repair cannot touch
        let adjacency = vec![vec![1, 2], vec![0, 2], vec![0, 1]];
        let provisional = vec![prov(&[2], &[1]), prov(&[0], &[2]), prov(&[1], &[0])];
        let result = orient_branched(&adjacency, &provisional);
        assert!(result.is_err());
        assert!(result
            .expect_err("cyclic")
            .contains("still cyclic"));
    }

    #[test]
    fn test_repair_rebalances_one_sided_stations() {
        let mut provisional = vec![prov(&[], &[4, 7]), prov(&[4, 7], &[]), prov(&[4], &[7])];
        repair_provisional(&mut provisional);
        // (0, 2) becomes (1, 1) through swap-then-split
        assert_eq!(provisional[0], prov(&[4], &[7]));
        assert_eq!(provisional[1], prov(&[4], &[7]));
        assert_eq!(provisional[2], prov(&[4], &[7]));
    }

    #[test]
    fn test_peeling_covers_diamond_edges() {
        // 0 -> {1, 2} -> 3: the second extraction must still commit the
        // convergent edge into 3
        let root = vec![vec![1, 2], vec![3], vec![3], vec![]];
        let order = topo_order(&root).expect("acyclic");
        let (aligned, emitted) = peel_longest_paths(&root, &order).expect("peels");
        assert_eq!(emitted.len(), 4);
        let mut edges: Vec<(usize, usize)> = aligned
            .iter()
            .enumerate()
            .flat_map(|(u, outs)| outs.iter().map(move |&v| (u, v)))
            .collect();
        edges.sort_unstable();
        assert_eq!(edges, vec![(0, 1), (0, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_peeling_commits_transitive_chord() {
        // Directed triangle 0 -> 1 -> 2 with the chord 0 -> 2: the spine
        // takes 0 -> 1 -> 2 and marks everything visited, so the chord can
        // never sit on an extracted path; it must still be committed
        let root = vec![vec![1, 2], vec![2], vec![]];
        let order = topo_order(&root).expect("acyclic");
        let (aligned, emitted) = peel_longest_paths(&root, &order).expect("peels");
        assert_eq!(emitted.len(), 3);
        let mut edges: Vec<(usize, usize)> = aligned
            .iter()
            .enumerate()
            .flat_map(|(u, outs)| outs.iter().map(move |&v| (u, v)))
            .collect();
        edges.sort_unstable();
        assert_eq!(edges, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_single_station_component() {
        let records = orient_component(RailwayType::None, &[vec![]], &[prov(&[], &[])], &[])
            .expect("orients");
        assert_eq!(records.len(), 1);
        assert!(records[0].left.is_empty() && records[0].right.is_empty());
    }
}
