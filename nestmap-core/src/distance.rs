use geo::{Coord, Distance, Haversine, Point};

/// Great-circle distance between two positions in metres.
///
/// Positions use `x = longitude`, `y = latitude`. Used to order merged POI
/// results by proximity to the focal point; exposed for hosts that want the
/// same measure.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use nestmap_core::distance_between;
///
/// let haifa_centre = Coord { x: 34.989_167, y: 32.794_167 };
/// let technion = Coord { x: 35.0233, y: 32.7767 };
/// let metres = distance_between(haifa_centre, technion);
/// assert!(metres > 3_000.0 && metres < 5_000.0);
/// ```
#[must_use]
pub fn distance_between(a: Coord<f64>, b: Coord<f64>) -> f64 {
    Haversine.distance(Point::from(a), Point::from(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Coord { x: 34.99, y: 32.79 })]
    #[case(Coord { x: 0.0, y: 0.0 })]
    fn distance_to_self_is_zero(#[case] position: Coord<f64>) {
        assert!(distance_between(position, position).abs() < 1e-6);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coord {
            x: 34.989_167,
            y: 32.794_167,
        };
        let b = Coord {
            x: 35.0233,
            y: 32.7767,
        };
        let forward = distance_between(a, b);
        let backward = distance_between(b, a);
        assert!((forward - backward).abs() < 1e-6);
    }
}
