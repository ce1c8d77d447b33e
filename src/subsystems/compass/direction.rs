//! Eight-point compass directions
//!
//! Buckets a heading into the eight principal winds for display. Each
//! bucket is 45° wide and centered on its direction, so north covers
//! [337.5°, 360°) and [0°, 22.5°).

use core::fmt;

/// One of the eight principal compass points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CompassPoint {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl CompassPoint {
    /// Bucket a heading in [0, 360) degrees into a compass point.
    pub fn from_heading(heading: f32) -> Self {
        let idx = (libm::floorf((heading + 22.5) / 45.0) as i32).rem_euclid(8);
        match idx {
            0 => CompassPoint::North,
            1 => CompassPoint::NorthEast,
            2 => CompassPoint::East,
            3 => CompassPoint::SouthEast,
            4 => CompassPoint::South,
            5 => CompassPoint::SouthWest,
            6 => CompassPoint::West,
            _ => CompassPoint::NorthWest,
        }
    }

    /// Short display label ("N", "NE", ...)
    pub fn label(&self) -> &'static str {
        match self {
            CompassPoint::North => "N",
            CompassPoint::NorthEast => "NE",
            CompassPoint::East => "E",
            CompassPoint::SouthEast => "SE",
            CompassPoint::South => "S",
            CompassPoint::SouthWest => "SW",
            CompassPoint::West => "W",
            CompassPoint::NorthWest => "NW",
        }
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_centers() {
        assert_eq!(CompassPoint::from_heading(0.0), CompassPoint::North);
        assert_eq!(CompassPoint::from_heading(90.0), CompassPoint::East);
        assert_eq!(CompassPoint::from_heading(180.0), CompassPoint::South);
        assert_eq!(CompassPoint::from_heading(270.0), CompassPoint::West);
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(CompassPoint::from_heading(22.4), CompassPoint::North);
        assert_eq!(CompassPoint::from_heading(22.6), CompassPoint::NorthEast);
        assert_eq!(CompassPoint::from_heading(337.4), CompassPoint::NorthWest);
        assert_eq!(CompassPoint::from_heading(337.6), CompassPoint::North);
    }

    #[test]
    fn north_wraps_at_the_seam() {
        assert_eq!(CompassPoint::from_heading(359.9), CompassPoint::North);
    }

    #[test]
    fn labels() {
        assert_eq!(CompassPoint::NorthEast.label(), "NE");
        assert_eq!(CompassPoint::SouthWest.label(), "SW");
        assert_eq!(format!("{}", CompassPoint::West), "W");
    }
}
