use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::constants::{EARTH_RADIUS_KM, JUNCTION_TOLERANCE};

/// A geographic coordinate treated as a plain 2D point (lat, lng).
///
/// Raw coordinates are reconstructed from fixed-precision decimal tokens, so
/// identical input tokens produce bit-identical doubles. Equality and
/// hashing are deliberately bit-exact; ordering is lexicographic
/// (lat first, then lng).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pos {
    pub lat: f64,
    pub lng: f64,
}

/// Ordered point sequence, used both for track geometry and for station
/// platform outlines.
pub type Polyline = Vec<Pos>;

impl Pos {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Planar (Euclidean) distance in coordinate units
    #[must_use]
    pub fn dist(&self, a: &Pos) -> f64 {
        ((self.lat - a.lat) * (self.lat - a.lat) + (self.lng - a.lng) * (self.lng - a.lng)).sqrt()
    }

    /// Great-circle distance in kilometers
    #[must_use]
    pub fn dist_km(&self, a: &Pos) -> f64 {
        const R: f64 = std::f64::consts::PI / 180.0;
        ((self.lat * R).cos() * (a.lat * R).cos() * (a.lng * R - self.lng * R).cos()
            + (self.lat * R).sin() * (a.lat * R).sin())
        .acos()
            * EARTH_RADIUS_KM
    }

    #[must_use]
    pub fn dot(&self, a: &Pos) -> f64 {
        self.lat * a.lat + self.lng * a.lng
    }

    #[must_use]
    pub fn cross(&self, a: &Pos) -> f64 {
        self.lat * a.lng - self.lng * a.lat
    }

    /// Vector norm
    #[must_use]
    pub fn abs(&self) -> f64 {
        (self.lat * self.lat + self.lng * self.lng).sqrt()
    }

    /// Cosine of the angle between this vector and `a`
    #[must_use]
    pub fn arg_cos(&self, a: &Pos) -> f64 {
        self.dot(a) / (self.abs() * a.abs())
    }

    /// Heading of this vector as atan2(lng, lat)
    #[must_use]
    pub fn arg(&self) -> f64 {
        self.lng.atan2(self.lat)
    }
}

impl std::ops::Sub for Pos {
    type Output = Pos;

    fn sub(self, a: Pos) -> Pos {
        Pos::new(self.lat - a.lat, self.lng - a.lng)
    }
}

impl PartialEq for Pos {
    fn eq(&self, a: &Pos) -> bool {
        self.lat.to_bits() == a.lat.to_bits() && self.lng.to_bits() == a.lng.to_bits()
    }
}

impl Eq for Pos {}

impl Hash for Pos {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lat.to_bits().hash(state);
        self.lng.to_bits().hash(state);
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, a: &Pos) -> Option<Ordering> {
        Some(self.cmp(a))
    }
}

impl Ord for Pos {
    fn cmp(&self, a: &Pos) -> Ordering {
        self.lat
            .total_cmp(&a.lat)
            .then_with(|| self.lng.total_cmp(&a.lng))
    }
}

/// Calculates the shortest angular distance between two angles in radians.
///
/// Returns a value in the range [0, π], representing the smallest angle
/// between the two input angles when considering the circular nature of
/// angles.
#[must_use]
pub fn angle_difference(a1: f64, a2: f64) -> f64 {
    let diff = (a1 - a2).abs();
    if diff > std::f64::consts::PI {
        2.0 * std::f64::consts::PI - diff
    } else {
        diff
    }
}

/// Checks whether point `p` lies on the segment from `a` to `b`.
///
/// The point must project inside the segment (both endpoint dot products
/// non-negative) and its perpendicular distance to the carrying line must
/// stay below the junction tolerance. A degenerate segment (`a == b`)
/// never matches.
#[must_use]
pub fn point_on_segment(p: &Pos, a: &Pos, b: &Pos) -> bool {
    let ab = *b - *a;
    let ap = *p - *a;
    if ab.dot(&ap) < 0.0 {
        return false;
    }
    let ba = *a - *b;
    let bp = *p - *b;
    if ba.dot(&bp) < 0.0 {
        return false;
    }
    ab.cross(&ap).abs() / ab.abs() < JUNCTION_TOLERANCE
}
