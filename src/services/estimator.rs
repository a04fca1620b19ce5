//! Route order estimation.
//!
//! Produces a visiting sequence for a set of destinations, starting from the
//! dispatch depot. Two interchangeable estimators exist:
//!
//! - `LatitudeSortEstimator` (default): orders destinations north to south and
//!   reports synthetic distance/duration figures derived from latitude offsets
//!   against the depot. Cheap, fully deterministic, and stable for equal
//!   latitudes.
//! - `NearestNeighborEstimator`: greedy tour over road-adjusted haversine
//!   distance, with real-ish travel times.
//!
//! Both emit the depot as the first stop with zero accumulated cost, and
//! round the per-stop figures to two decimals while accumulating unrounded.

use crate::config::EstimatorKind;
use crate::defaults;
use crate::services::geo;
use crate::types::route::{Destination, RouteStop};
use crate::types::Coordinates;

/// Kilometers charged per degree of latitude offset from the depot
const LATITUDE_KM_FACTOR: f64 = 100.0;

/// Minutes charged per accumulated kilometer at each stop
const DURATION_FACTOR: f64 = 0.20;

/// Strategy for ordering destinations and pricing the legs between them.
pub trait RouteEstimator: Send + Sync {
    /// Identifier reported in estimation responses
    fn name(&self) -> &'static str;

    /// Produce the visiting sequence, depot first.
    fn estimate(&self, depot: Coordinates, destinations: &[Destination]) -> Vec<RouteStop>;
}

/// Build the estimator selected by configuration.
pub fn create_estimator(kind: EstimatorKind) -> Box<dyn RouteEstimator> {
    match kind {
        EstimatorKind::LatitudeSort => Box::new(LatitudeSortEstimator),
        EstimatorKind::NearestNeighbor => Box::new(NearestNeighborEstimator),
    }
}

fn depot_stop(depot: Coordinates) -> RouteStop {
    RouteStop {
        name: defaults::DEPOT_NAME.to_string(),
        address: defaults::DEPOT_ADDRESS.to_string(),
        lat: Some(depot.lat),
        lng: Some(depot.lng),
        distance_km: 0.0,
        duration_min: 0.0,
    }
}

/// Round half away from zero to two decimals.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// LatitudeSortEstimator
// =============================================================================

/// Orders destinations by latitude, northernmost first. Destinations without
/// coordinates sort last and contribute nothing to the accumulated cost.
pub struct LatitudeSortEstimator;

impl LatitudeSortEstimator {
    fn sort_key(destination: &Destination) -> f64 {
        destination
            .coordinates
            .map(|c| c.lat)
            .unwrap_or(f64::NEG_INFINITY)
    }
}

impl RouteEstimator for LatitudeSortEstimator {
    fn name(&self) -> &'static str {
        "latitude_sort"
    }

    fn estimate(&self, depot: Coordinates, destinations: &[Destination]) -> Vec<RouteStop> {
        let mut ordered: Vec<&Destination> = destinations.iter().collect();
        // Stable sort: equal latitudes keep their input order
        ordered.sort_by(|a, b| Self::sort_key(b).total_cmp(&Self::sort_key(a)));

        let mut stops = Vec::with_capacity(ordered.len() + 1);
        stops.push(depot_stop(depot));

        let mut distance_km = 0.0;
        let mut duration_min = 0.0;

        for destination in ordered {
            if let Some(coords) = destination.coordinates {
                distance_km += (coords.lat - depot.lat).abs() * LATITUDE_KM_FACTOR;
                duration_min += distance_km * DURATION_FACTOR;
            }

            stops.push(RouteStop {
                name: destination.name.clone(),
                address: destination.address.clone(),
                lat: destination.coordinates.map(|c| c.lat),
                lng: destination.coordinates.map(|c| c.lng),
                distance_km: round2(distance_km),
                duration_min: round2(duration_min),
            });
        }

        stops
    }
}

// =============================================================================
// NearestNeighborEstimator
// =============================================================================

/// Greedy tour: from the depot, repeatedly visit the closest unvisited
/// destination by road-adjusted haversine distance. Destinations without
/// coordinates are appended after all located ones, at no extra cost.
pub struct NearestNeighborEstimator;

impl RouteEstimator for NearestNeighborEstimator {
    fn name(&self) -> &'static str {
        "nearest_neighbor"
    }

    fn estimate(&self, depot: Coordinates, destinations: &[Destination]) -> Vec<RouteStop> {
        let (mut located, unlocated): (Vec<&Destination>, Vec<&Destination>) =
            destinations.iter().partition(|d| d.coordinates.is_some());

        let mut stops = Vec::with_capacity(destinations.len() + 1);
        stops.push(depot_stop(depot));

        let mut position = depot;
        let mut distance_km = 0.0;
        let mut duration_min = 0.0;

        while !located.is_empty() {
            let mut best = 0;
            let mut best_distance = f64::INFINITY;
            for (i, destination) in located.iter().enumerate() {
                if let Some(coords) = destination.coordinates {
                    let d = geo::road_distance(&position, &coords);
                    if d < best_distance {
                        best_distance = d;
                        best = i;
                    }
                }
            }

            let destination = located.remove(best);
            // Partitioned on is_some, so coordinates are always present here
            if let Some(coords) = destination.coordinates {
                distance_km += best_distance;
                duration_min += geo::travel_time_minutes(&position, &coords);
                position = coords;
            }

            stops.push(RouteStop {
                name: destination.name.clone(),
                address: destination.address.clone(),
                lat: destination.coordinates.map(|c| c.lat),
                lng: destination.coordinates.map(|c| c.lng),
                distance_km: round2(distance_km),
                duration_min: round2(duration_min),
            });
        }

        for destination in unlocated {
            stops.push(RouteStop {
                name: destination.name.clone(),
                address: destination.address.clone(),
                lat: None,
                lng: None,
                distance_km: round2(distance_km),
                duration_min: round2(duration_min),
            });
        }

        stops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depot() -> Coordinates {
        Coordinates {
            lat: defaults::DEFAULT_DEPOT_LAT,
            lng: defaults::DEFAULT_DEPOT_LNG,
        }
    }

    fn destination(name: &str, lat: f64, lng: f64) -> Destination {
        Destination {
            name: name.to_string(),
            address: format!("{} address", name),
            coordinates: Some(Coordinates { lat, lng }),
        }
    }

    fn unlocated(name: &str) -> Destination {
        Destination {
            name: name.to_string(),
            address: format!("{} address", name),
            coordinates: None,
        }
    }

    #[test]
    fn test_empty_input_yields_depot_only() {
        let stops = LatitudeSortEstimator.estimate(depot(), &[]);

        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].name, defaults::DEPOT_NAME);
        assert_eq!(stops[0].address, defaults::DEPOT_ADDRESS);
        assert_eq!(stops[0].lat, Some(defaults::DEFAULT_DEPOT_LAT));
        assert_eq!(stops[0].lng, Some(defaults::DEFAULT_DEPOT_LNG));
        assert_eq!(stops[0].distance_km, 0.0);
        assert_eq!(stops[0].duration_min, 0.0);
    }

    #[test]
    fn test_latitude_sort_known_figures() {
        // Depot at 20.9168: A sits 0.0832 degrees north, B 0.4168 south
        let destinations = vec![
            destination("B", 20.5, -101.30),
            destination("A", 21.0, -101.40),
        ];

        let stops = LatitudeSortEstimator.estimate(depot(), &destinations);

        assert_eq!(stops.len(), 3);
        // Northernmost first
        assert_eq!(stops[1].name, "A");
        assert_eq!(stops[1].distance_km, 8.32);
        assert_eq!(stops[1].duration_min, 1.66);

        assert_eq!(stops[2].name, "B");
        assert_eq!(stops[2].distance_km, 50.0);
        // 1.664 + 50.0 * 0.2
        assert_eq!(stops[2].duration_min, 11.66);
    }

    #[test]
    fn test_latitude_sort_orders_north_to_south() {
        let destinations = vec![
            destination("mid", 20.9, -101.3),
            destination("north", 21.3, -101.3),
            destination("south", 20.4, -101.3),
        ];

        let stops = LatitudeSortEstimator.estimate(depot(), &destinations);

        let names: Vec<&str> = stops.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec![defaults::DEPOT_NAME, "north", "mid", "south"]);
    }

    #[test]
    fn test_latitude_sort_is_stable_for_equal_latitudes() {
        let destinations = vec![
            destination("first", 21.0, -101.1),
            destination("second", 21.0, -101.2),
            destination("third", 21.0, -101.3),
        ];

        let stops = LatitudeSortEstimator.estimate(depot(), &destinations);

        let names: Vec<&str> = stops[1..].iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_latitude_sort_missing_coordinates_go_last_at_no_cost() {
        let destinations = vec![
            unlocated("nowhere"),
            destination("somewhere", 21.0, -101.4),
        ];

        let stops = LatitudeSortEstimator.estimate(depot(), &destinations);

        assert_eq!(stops[1].name, "somewhere");
        assert_eq!(stops[2].name, "nowhere");
        assert_eq!(stops[2].lat, None);
        assert_eq!(stops[2].lng, None);
        // Accumulators do not advance for an unlocated stop
        assert_eq!(stops[2].distance_km, stops[1].distance_km);
        assert_eq!(stops[2].duration_min, stops[1].duration_min);
    }

    #[test]
    fn test_latitude_sort_accumulators_never_decrease() {
        let destinations = vec![
            destination("a", 21.4, -101.1),
            destination("b", 20.3, -101.2),
            unlocated("c"),
            destination("d", 20.95, -101.3),
            destination("e", 20.9168, -101.4),
        ];

        let stops = LatitudeSortEstimator.estimate(depot(), &destinations);

        for pair in stops.windows(2) {
            assert!(pair[1].distance_km >= pair[0].distance_km);
            assert!(pair[1].duration_min >= pair[0].duration_min);
        }
    }

    #[test]
    fn test_latitude_sort_is_deterministic() {
        let destinations = vec![
            destination("a", 21.1, -101.1),
            destination("b", 20.6, -101.2),
            unlocated("c"),
        ];

        let first = LatitudeSortEstimator.estimate(depot(), &destinations);
        let second = LatitudeSortEstimator.estimate(depot(), &destinations);

        assert_eq!(first, second);
    }

    #[test]
    fn test_latitude_sort_measures_from_configured_depot() {
        let northern_depot = Coordinates { lat: 21.5, lng: -101.3508 };
        let destinations = vec![destination("a", 21.0, -101.4)];

        let stops = LatitudeSortEstimator.estimate(northern_depot, &destinations);

        // |21.0 - 21.5| * 100 = 50
        assert_eq!(stops[1].distance_km, 50.0);
        assert_eq!(stops[1].duration_min, 10.0);
        assert_eq!(stops[0].lat, Some(21.5));
    }

    #[test]
    fn test_latitude_sort_rounds_to_two_decimals() {
        // 0.0833 degrees -> 8.33 km exactly after rounding 8.3300000...
        let destinations = vec![destination("a", 20.9168 + 0.083349, -101.3)];

        let stops = LatitudeSortEstimator.estimate(depot(), &destinations);

        assert_eq!(stops[1].distance_km, 8.33);
        // 8.3349 * 0.2 = 1.66698 -> 1.67
        assert_eq!(stops[1].duration_min, 1.67);
    }

    #[test]
    fn test_nearest_neighbor_visits_closest_first() {
        let destinations = vec![
            destination("far", 21.4, -101.3508),
            destination("near", 21.0, -101.3508),
        ];

        let stops = NearestNeighborEstimator.estimate(depot(), &destinations);

        let names: Vec<&str> = stops.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec![defaults::DEPOT_NAME, "near", "far"]);
        assert!(stops[1].distance_km < stops[2].distance_km);
        assert!(stops[1].duration_min < stops[2].duration_min);
    }

    #[test]
    fn test_nearest_neighbor_appends_unlocated_last() {
        let destinations = vec![
            unlocated("mystery"),
            destination("known", 21.0, -101.3508),
        ];

        let stops = NearestNeighborEstimator.estimate(depot(), &destinations);

        assert_eq!(stops[2].name, "mystery");
        assert_eq!(stops[2].lat, None);
        assert_eq!(stops[2].distance_km, stops[1].distance_km);
    }

    #[test]
    fn test_factory_selects_by_kind() {
        assert_eq!(
            create_estimator(EstimatorKind::LatitudeSort).name(),
            "latitude_sort"
        );
        assert_eq!(
            create_estimator(EstimatorKind::NearestNeighbor).name(),
            "nearest_neighbor"
        );
    }

    #[test]
    fn test_round2_half_away_from_zero() {
        assert_eq!(round2(1.664), 1.66);
        assert_eq!(round2(1.667), 1.67);
        assert_eq!(round2(-1.237), -1.24);
        assert_eq!(round2(50.0), 50.0);
    }
}
