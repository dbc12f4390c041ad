use indexmap::IndexMap;

use crate::geometry::Polyline;
use crate::models::Station;

/// The full parsed dataset: every station and, per railway id, the set of
/// raw track polylines. Railway order follows first appearance in the input.
///
/// The tables are read-only once built; every railway pass works on its own
/// transient structures.
#[derive(Debug, Clone, Default)]
pub struct RailNetwork {
    pub stations: Vec<Station>,
    pub railway_paths: IndexMap<u32, Vec<Polyline>>,
}

impl RailNetwork {
    /// All railway ids in emission order: ids with track geometry first (in
    /// input order), then ids that only appear on stations
    #[must_use]
    pub fn railway_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.railway_paths.keys().copied().collect();
        for station in &self.stations {
            if !self.railway_paths.contains_key(&station.railway_id)
                && !ids.contains(&station.railway_id)
            {
                ids.push(station.railway_id);
            }
        }
        ids
    }

    /// Stations belonging to one railway, in input order
    #[must_use]
    pub fn stations_of(&self, railway_id: u32) -> Vec<&Station> {
        self.stations
            .iter()
            .filter(|st| st.railway_id == railway_id)
            .collect()
    }

    /// Track polylines of one railway (empty when the id is unknown)
    #[must_use]
    pub fn paths_of(&self, railway_id: u32) -> &[Polyline] {
        self.railway_paths
            .get(&railway_id)
            .map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Pos;

    fn station(code: u32, railway_id: u32) -> Station {
        Station {
            code,
            railway_id,
            name: format!("S{code}"),
            platforms: vec![vec![Pos::new(0.0, 0.0)]],
        }
    }

    #[test]
    fn test_railway_ids_order() {
        let mut net = RailNetwork::default();
        net.railway_paths.insert(7, vec![]);
        net.railway_paths.insert(3, vec![]);
        net.stations.push(station(1, 3));
        net.stations.push(station(2, 9));
        assert_eq!(net.railway_ids(), vec![7, 3, 9]);
    }

    #[test]
    fn test_stations_of_preserves_order() {
        let mut net = RailNetwork::default();
        net.stations.push(station(5, 1));
        net.stations.push(station(4, 2));
        net.stations.push(station(3, 1));
        let codes: Vec<u32> = net.stations_of(1).iter().map(|s| s.code).collect();
        assert_eq!(codes, vec![5, 3]);
    }

    #[test]
    fn test_paths_of_unknown_id() {
        let net = RailNetwork::default();
        assert!(net.paths_of(42).is_empty());
    }
}
