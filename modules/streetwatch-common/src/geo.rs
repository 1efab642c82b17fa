//! Great-circle distance. Two consumers, two units: nearest-record ranking
//! works in kilometers, radius alerting in meters.

const EARTH_RADIUS_KM: f64 = 6371.0;
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine great-circle distance between two lat/lng points in kilometers.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    EARTH_RADIUS_KM * haversine_angle(lat1, lng1, lat2, lng2)
}

/// Haversine great-circle distance between two lat/lng points in meters.
pub fn haversine_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    EARTH_RADIUS_M * haversine_angle(lat1, lng1, lat2, lng2)
}

fn haversine_angle(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let lat1_r = lat1.to_radians();
    let lat2_r = lat2.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1_r.cos() * lat2_r.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * a.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        let dist = haversine_km(44.9778, -93.265, 44.9778, -93.265);
        assert!(dist < 0.001, "Same point should be 0km, got {dist}");
        let dist_m = haversine_m(44.9778, -93.265, 44.9778, -93.265);
        assert!(dist_m < 0.001, "Same point should be 0m, got {dist_m}");
    }

    #[test]
    fn sf_to_oakland() {
        // SF to Oakland is ~13km
        let dist = haversine_km(37.7749, -122.4194, 37.8044, -122.2712);
        assert!(
            (dist - 13.0).abs() < 2.0,
            "SF to Oakland should be ~13km, got {dist}"
        );
    }

    #[test]
    fn symmetric() {
        let ab = haversine_km(37.7749, -122.4194, 34.0522, -118.2437);
        let ba = haversine_km(34.0522, -118.2437, 37.7749, -122.4194);
        assert!((ab - ba).abs() < 1e-9, "distance should be symmetric");
    }

    #[test]
    fn meters_and_kilometers_agree() {
        let km = haversine_km(37.7749, -122.4194, 37.8044, -122.2712);
        let m = haversine_m(37.7749, -122.4194, 37.8044, -122.2712);
        assert!(
            (m - km * 1000.0).abs() < 0.5,
            "units should agree: {m}m vs {km}km"
        );
    }

    #[test]
    fn antipodal_points_do_not_produce_nan() {
        let dist = haversine_km(0.0, 0.0, 0.0, 180.0);
        assert!(dist.is_finite());
        // Half the Earth's circumference, ~20015km
        assert!((dist - 20015.0).abs() < 10.0, "antipodal should be ~20015km, got {dist}");
    }
}
