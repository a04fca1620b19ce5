//! Route types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Coordinates;

/// Route entity (a courier's planned delivery run for a day)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: Uuid,
    pub name: String,
    pub courier_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a route
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRouteRequest {
    pub name: String,
    pub courier_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
}

/// Request to update a route
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRouteRequest {
    pub id: Uuid,
    pub name: Option<String>,
    pub courier_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
}

/// A stop to be visited, fed into the route estimator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub name: String,
    pub address: String,
    pub coordinates: Option<Coordinates>,
}

/// One element of the estimated visiting sequence: a destination (or the
/// depot) annotated with cumulative synthetic distance/duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStop {
    pub name: String,
    pub address: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub distance_km: f64,
    pub duration_min: f64,
}

/// Request to estimate a visiting order for a set of clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRouteRequest {
    pub client_ids: Vec<Uuid>,
}

/// Response from route estimation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRouteResponse {
    /// Stops in visiting order, depot first
    pub stops: Vec<RouteStop>,
    /// Estimator that produced the sequence
    pub algorithm: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_stop_serializes_absent_coordinates_as_null() {
        let stop = RouteStop {
            name: "Unlocated".into(),
            address: "Unknown 1".into(),
            lat: None,
            lng: None,
            distance_km: 0.0,
            duration_min: 0.0,
        };
        let json = serde_json::to_string(&stop).unwrap();
        assert!(json.contains("\"lat\":null"));
        assert!(json.contains("\"lng\":null"));
        assert!(json.contains("\"distanceKm\":0.0"));
        assert!(json.contains("\"durationMin\":0.0"));
    }
}
