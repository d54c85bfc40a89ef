use geo::{Contains, Intersects, MultiPolygon, Point};
use std::fmt;

/// Spatial test a station location must pass against the region to be kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpatialPredicate {
    /// Strictly inside the region; points on the boundary are excluded.
    #[default]
    Within,
    /// Inside or on the boundary.
    Intersects,
    /// On the boundary only.
    Touches,
}

impl SpatialPredicate {
    pub fn evaluate(&self, location: &Point<f64>, region: &MultiPolygon<f64>) -> bool {
        match self {
            SpatialPredicate::Within => region.contains(location),
            SpatialPredicate::Intersects => region.intersects(location),
            SpatialPredicate::Touches => region.intersects(location) && !region.contains(location),
        }
    }
}

impl fmt::Display for SpatialPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SpatialPredicate::Within => "within",
            SpatialPredicate::Intersects => "intersects",
            SpatialPredicate::Touches => "touches",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{point, polygon};

    fn square() -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 10.0),
            (x: 0.0, y: 0.0),
        ]])
    }

    #[test]
    fn boundary_handling() {
        let region = square();
        let inside = point!(x: 5.0, y: 5.0);
        let edge = point!(x: 10.0, y: 5.0);
        let outside = point!(x: 11.0, y: 5.0);

        assert!(SpatialPredicate::Within.evaluate(&inside, &region));
        assert!(!SpatialPredicate::Within.evaluate(&edge, &region));
        assert!(SpatialPredicate::Intersects.evaluate(&edge, &region));
        assert!(SpatialPredicate::Touches.evaluate(&edge, &region));
        assert!(!SpatialPredicate::Touches.evaluate(&inside, &region));
        for predicate in [
            SpatialPredicate::Within,
            SpatialPredicate::Intersects,
            SpatialPredicate::Touches,
        ] {
            assert!(!predicate.evaluate(&outside, &region));
        }
    }
}
