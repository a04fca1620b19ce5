//! Package types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Package entity: an item carried within a delivery
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: Uuid,
    pub delivery_id: Uuid,
    pub description: Option<String>,
    pub weight_kg: Option<f64>,
    pub declared_value: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a package
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePackageRequest {
    pub delivery_id: Uuid,
    pub description: Option<String>,
    pub weight_kg: Option<f64>,
    pub declared_value: Option<f64>,
}

/// Request to update a package
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePackageRequest {
    pub id: Uuid,
    pub description: Option<String>,
    pub weight_kg: Option<f64>,
    pub declared_value: Option<f64>,
}
