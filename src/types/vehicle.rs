//! Vehicle types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Vehicle entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub make: Option<String>,
    pub model: Option<String>,
    pub plates: Option<String>,
    pub capacity: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    pub make: Option<String>,
    pub model: Option<String>,
    pub plates: Option<String>,
    pub capacity: Option<i32>,
}

/// Request to update a vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
    pub id: Uuid,
    pub make: Option<String>,
    pub model: Option<String>,
    pub plates: Option<String>,
    pub capacity: Option<i32>,
}
