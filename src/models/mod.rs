mod next_station;
mod railway;
mod railway_type;
mod station;

pub use next_station::{to_records, NextStaInfo, NextStationRecord, StationRef};
pub use railway::RailNetwork;
pub use railway_type::RailwayType;
pub use station::Station;
