use serde::{Deserialize, Serialize};

use crate::geometry::{Polyline, Pos};

/// A raw station record: identity plus the platform outlines that anchor it
/// to the track geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub code: u32,
    pub railway_id: u32,
    pub name: String,
    /// One or more platform polylines; each has at least one vertex
    pub platforms: Vec<Polyline>,
}

impl Station {
    /// Representative position of one platform: the element at ⌊len/2⌋
    #[must_use]
    pub fn platform_midpoint(&self, platform: usize) -> Option<Pos> {
        let line = self.platforms.get(platform)?;
        line.get(line.len() / 2).copied()
    }

    /// First vertex of the first platform outline, used as a stable
    /// tie-break key when two stations compete for the same slot
    #[must_use]
    pub fn platform_origin(&self) -> Option<Pos> {
        self.platforms.first()?.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(platforms: Vec<Polyline>) -> Station {
        Station {
            code: 100,
            railway_id: 1,
            name: "Test".to_string(),
            platforms,
        }
    }

    #[test]
    fn test_platform_midpoint_odd() {
        let st = station(vec![vec![
            Pos::new(0.0, 0.0),
            Pos::new(1.0, 0.0),
            Pos::new(2.0, 0.0),
        ]]);
        assert_eq!(st.platform_midpoint(0), Some(Pos::new(1.0, 0.0)));
    }

    #[test]
    fn test_platform_midpoint_even() {
        let st = station(vec![vec![Pos::new(0.0, 0.0), Pos::new(1.0, 0.0)]]);
        // ⌊2/2⌋ = 1: the later of the two vertices
        assert_eq!(st.platform_midpoint(0), Some(Pos::new(1.0, 0.0)));
    }

    #[test]
    fn test_platform_midpoint_missing() {
        let st = station(vec![]);
        assert_eq!(st.platform_midpoint(0), None);
        assert_eq!(st.platform_origin(), None);
    }

    #[test]
    fn test_platform_origin() {
        let st = station(vec![vec![Pos::new(3.0, 4.0), Pos::new(5.0, 6.0)]]);
        assert_eq!(st.platform_origin(), Some(Pos::new(3.0, 4.0)));
    }
}
