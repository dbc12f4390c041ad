//! Junction injection
//!
//! Raw datasets express a T-junction as one polyline ending somewhere on
//! another polyline's interior, without a shared vertex. This pass inserts
//! the missing vertex and splits the crossed polyline so that the graph
//! builder sees the connection.

use crate::geometry::{point_on_segment, Polyline};
use crate::log;

/// Insert implicit junction vertices.
///
/// For every polyline endpoint that lies on the interior of another
/// polyline's segment (within the junction tolerance), the crossed polyline
/// is split in two at the endpoint: the prefix keeps the vertices up to the
/// segment start and gains the endpoint, the suffix starts at the endpoint
/// and is appended as a new polyline. An endpoint that coincides exactly
/// with an existing vertex of the other polyline needs no injection.
///
/// Each source polyline injects at most once; processing then moves on to
/// the next polyline. Appended suffixes take part in later iterations.
pub fn inject_junctions(paths: &mut Vec<Polyline>) {
    let mut injected = 0usize;
    let mut i = 0;
    while i < paths.len() {
        'endpoints: for side in 0..2 {
            let Some(&p) = (if side == 0 {
                paths[i].first()
            } else {
                paths[i].last()
            }) else {
                continue;
            };
            for j in 0..paths.len() {
                if j == i {
                    continue;
                }
                if paths[j].iter().any(|v| *v == p) {
                    continue;
                }
                let hit = (0..paths[j].len().saturating_sub(1))
                    .find(|&k| point_on_segment(&p, &paths[j][k], &paths[j][k + 1]));
                if let Some(k) = hit {
                    let suffix: Polyline = std::iter::once(p)
                        .chain(paths[j][k + 1..].iter().copied())
                        .collect();
                    paths[j].truncate(k + 1);
                    paths[j].push(p);
                    paths.push(suffix);
                    injected += 1;
                    break 'endpoints;
                }
            }
        }
        i += 1;
    }
    if injected > 0 {
        log!("Injected {injected} junction vertices");
    }
}
