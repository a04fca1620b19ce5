//! Courier (driver) types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Courier entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Courier {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a courier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourierRequest {
    pub name: String,
    pub phone: Option<String>,
    pub license_number: Option<String>,
}

/// Request to update a courier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourierRequest {
    pub id: Uuid,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub is_active: Option<bool>,
}
