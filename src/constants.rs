/// Perpendicular distance below which a polyline endpoint is treated as
/// lying on another polyline's interior segment
pub const JUNCTION_TOLERANCE: f64 = 1e-6;

/// Cosine threshold for the neighbor-search turn filter: a step is admitted
/// when the cosine of the angle between the outgoing segment and the
/// arrival segment stays below this value
pub const TURN_COS_LIMIT: f64 = 0.33;

/// Angular tolerance (radians) when bucketing first-step headings into the
/// two travel directions
pub const HEADING_TOLERANCE: f64 = 0.1;

/// Earth radius in kilometers, for great-circle distances
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Fixed decimal scale of raw coordinate tokens
pub const COORDINATE_SCALE: f64 = 1e-5;
