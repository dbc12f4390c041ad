use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::Station;

/// Directed adjacency of one station after orientation.
///
/// `station` is the position of the station in the railway's station list;
/// `index` is the station's slot in the component-offset numbering that
/// `left` and `right` refer to. After orientation the two sides are
/// disjoint and together cover the station's undirected neighbor set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextStaInfo {
    pub station: usize,
    pub index: usize,
    pub left: Vec<usize>,
    pub right: Vec<usize>,
}

/// A neighbor reference in the serialized output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationRef {
    pub station_code: u32,
}

/// One element of the per-railway JSON array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextStationRecord {
    pub station_code: u32,
    pub left: Vec<StationRef>,
    pub right: Vec<StationRef>,
}

/// Resolve index-based adjacency into station-code records for serialization
#[must_use]
pub fn to_records(infos: &[NextStaInfo], stations: &[&Station]) -> Vec<NextStationRecord> {
    let code_of: HashMap<usize, u32> = infos
        .iter()
        .map(|info| (info.index, stations[info.station].code))
        .collect();
    let refs = |side: &[usize]| {
        side.iter()
            .filter_map(|idx| code_of.get(idx))
            .map(|&station_code| StationRef { station_code })
            .collect()
    };
    infos
        .iter()
        .map(|info| NextStationRecord {
            station_code: stations[info.station].code,
            left: refs(&info.left),
            right: refs(&info.right),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Pos;

    fn station(code: u32) -> Station {
        Station {
            code,
            railway_id: 1,
            name: format!("S{code}"),
            platforms: vec![vec![Pos::new(0.0, 0.0)]],
        }
    }

    #[test]
    fn test_to_records_resolves_codes() {
        let stations = [station(11), station(22)];
        let refs: Vec<&Station> = stations.iter().collect();
        let infos = vec![
            NextStaInfo {
                station: 0,
                index: 0,
                left: vec![],
                right: vec![1],
            },
            NextStaInfo {
                station: 1,
                index: 1,
                left: vec![0],
                right: vec![],
            },
        ];
        let records = to_records(&infos, &refs);
        assert_eq!(records[0].station_code, 11);
        assert_eq!(records[0].right, vec![StationRef { station_code: 22 }]);
        assert_eq!(records[1].left, vec![StationRef { station_code: 11 }]);
        assert!(records[1].right.is_empty());
    }

    #[test]
    fn test_record_json_shape() {
        let record = NextStationRecord {
            station_code: 1130201,
            left: vec![StationRef {
                station_code: 1130102,
            }],
            right: vec![],
        };
        let value = serde_json::to_value(&record).expect("serializes");
        assert_eq!(
            value,
            serde_json::json!({
                "stationCode": 1130201,
                "left": [{"stationCode": 1130102}],
                "right": [],
            })
        );
    }
}
