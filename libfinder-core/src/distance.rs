use crate::model::GeoPoint;

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance in metres between two points given in degrees.
pub fn haversine(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARIS: GeoPoint = GeoPoint { lat: 48.8566, lng: 2.3522 };
    const LONDON: GeoPoint = GeoPoint { lat: 51.5074, lng: -0.1278 };

    #[test]
    fn same_point_is_zero() {
        assert_eq!(haversine(PARIS, PARIS), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let there = haversine(PARIS, LONDON);
        let back = haversine(LONDON, PARIS);
        assert!((there - back).abs() < 1e-6);
    }

    #[test]
    fn paris_to_london_is_about_344_km() {
        let d = haversine(PARIS, LONDON);
        assert!((d - 343_560.0).abs() < 343_560.0 * 0.005, "got {d}");
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = haversine(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0));
        assert!((d - 111_195.0).abs() < 10.0, "got {d}");
    }

    #[test]
    fn farther_points_are_farther() {
        let center = GeoPoint::new(34.0901, -118.4065);
        let near = GeoPoint::new(34.0950, -118.4000);
        let far = GeoPoint::new(34.2000, -118.2000);
        assert!(haversine(center, near) < haversine(center, far));
    }
}
