//! Geographic calculations

use crate::types::Coordinates;

/// Earth radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Road distance coefficient (straight line to road)
const ROAD_COEFFICIENT: f64 = 1.3;

/// Average speed in km/h for travel time estimation
const AVERAGE_SPEED_KMH: f64 = 40.0;

/// Calculate Haversine distance between two points in kilometers
pub fn haversine_distance(from: &Coordinates, to: &Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lng - from.lng).to_radians();

    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Estimate road distance from straight-line distance
pub fn road_distance(from: &Coordinates, to: &Coordinates) -> f64 {
    haversine_distance(from, to) * ROAD_COEFFICIENT
}

/// Estimate travel time in minutes
pub fn travel_time_minutes(from: &Coordinates, to: &Coordinates) -> f64 {
    let distance = road_distance(from, to);
    (distance / AVERAGE_SPEED_KMH) * 60.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_leon_guanajuato() {
        let leon = Coordinates { lat: 21.1221, lng: -101.6827 };
        let guanajuato = Coordinates { lat: 21.0190, lng: -101.2574 };

        let distance = haversine_distance(&leon, &guanajuato);

        // Leon to Guanajuato city is approximately 45 km
        assert!((distance - 45.0).abs() < 5.0);
    }

    #[test]
    fn test_haversine_same_point() {
        let point = Coordinates { lat: 20.9168, lng: -101.3508 };
        let distance = haversine_distance(&point, &point);
        assert!(distance.abs() < 0.001);
    }

    #[test]
    fn test_road_distance_applies_coefficient() {
        let leon = Coordinates { lat: 21.1221, lng: -101.6827 };
        let guanajuato = Coordinates { lat: 21.0190, lng: -101.2574 };

        let road = road_distance(&leon, &guanajuato);
        let straight = haversine_distance(&leon, &guanajuato);

        assert!((road / straight - ROAD_COEFFICIENT).abs() < 0.01);
    }

    #[test]
    fn test_travel_time_is_reasonable() {
        let from = Coordinates { lat: 20.9168, lng: -101.3508 };
        let to = Coordinates { lat: 21.0, lng: -101.3508 };

        let time = travel_time_minutes(&from, &to);

        assert!(time > 0.0);
        assert!(time < 60.0); // under an hour for ~10 km
    }
}
