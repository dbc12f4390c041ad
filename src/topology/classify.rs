//! Component shape classification
//!
//! A degree census over one connected component of the station graph
//! decides which orientation strategy applies.

use crate::models::RailwayType;

/// Classify a component given its per-station neighbor sets (deduplicated).
#[must_use]
pub fn classify(adjacency: &[Vec<usize>]) -> RailwayType {
    let size = adjacency.len();
    if size <= 1 {
        return RailwayType::None;
    }
    let mut ones = 0usize;
    let mut twos = 0usize;
    let mut threes = 0usize;
    for neighbors in adjacency {
        match neighbors.len() {
            1 => ones += 1,
            2 => twos += 1,
            3 => threes += 1,
            _ => {}
        }
    }
    if ones == 2 && twos == size - 2 {
        RailwayType::LinearList
    } else if twos == size {
        RailwayType::Circle
    } else if ones == 1 && threes == 1 && twos == size - 2 {
        RailwayType::WithLoop
    } else {
        RailwayType::WithBranches
    }
}
