//! Great-circle distance between two points.

use std::f64::consts::PI;

use crate::record::GeoPoint;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[inline]
pub fn to_radians(degrees: f64) -> f64 {
    degrees * (PI / 180.0)
}

/// Haversine distance in kilometres.
///
/// Inputs are not range checked.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = to_radians(b.lat - a.lat);
    let d_lng = to_radians(b.lng - a.lng);

    let h = (d_lat / 2.0).sin().powi(2)
        + to_radians(a.lat).cos() * to_radians(b.lat).cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points
    let c = 2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOGOTA: GeoPoint = GeoPoint::new(4.7110, -74.0721);
    const MEDELLIN: GeoPoint = GeoPoint::new(6.2442, -75.5812);
    const LONDON: GeoPoint = GeoPoint::new(51.5074, -0.1278);
    const PARIS: GeoPoint = GeoPoint::new(48.8566, 2.3522);
    const SYDNEY: GeoPoint = GeoPoint::new(-33.8688, 151.2093);

    fn assert_relative_eq(a: f64, b: f64) {
        let scale = a.abs().max(b.abs()).max(1.0);
        assert!(
            (a - b).abs() <= 1e-9 * scale,
            "{a} and {b} differ by more than 1e-9 relative"
        );
    }

    #[test]
    fn test_zero_distance_identity() {
        for point in [BOGOTA, LONDON, SYDNEY, GeoPoint::new(90.0, 0.0)] {
            assert_eq!(haversine_km(point, point), 0.0);
        }
    }

    #[test]
    fn test_symmetry() {
        let points = [
            BOGOTA,
            MEDELLIN,
            LONDON,
            PARIS,
            SYDNEY,
            GeoPoint::new(-90.0, 180.0),
            GeoPoint::new(0.0, -180.0),
        ];
        for a in points {
            for b in points {
                assert_relative_eq(haversine_km(a, b), haversine_km(b, a));
            }
        }
    }

    #[test]
    fn test_known_distances() {
        let london_paris = haversine_km(LONDON, PARIS);
        assert!(
            (london_paris - 343.5).abs() < 1.0,
            "London-Paris should be about 343.5 km, got {london_paris}"
        );

        let bogota_medellin = haversine_km(BOGOTA, MEDELLIN);
        assert!(
            (bogota_medellin - 240.0).abs() < 5.0,
            "Bogota-Medellin should be about 240 km, got {bogota_medellin}"
        );
    }

    #[test]
    fn test_one_degree_of_latitude_on_the_equator() {
        let d = haversine_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0));
        assert_relative_eq(d, EARTH_RADIUS_KM * PI / 180.0);
    }

    #[test]
    fn test_antipodal_points_are_half_circumference() {
        let d = haversine_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 180.0));
        assert!((d - EARTH_RADIUS_KM * PI).abs() < 1e-6);
        assert!(d.is_finite());
    }

    #[test]
    fn test_distance_is_non_negative() {
        let d = haversine_km(SYDNEY, GeoPoint::new(-33.8689, 151.2093));
        assert!(d >= 0.0);
        assert!(d < 0.02);
    }
}
