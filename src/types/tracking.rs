//! Tracking event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::DeliveryStatus;

/// Tracking event: a status change recorded against a delivery
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    pub id: Uuid,
    pub delivery_id: Uuid,
    pub status: DeliveryStatus,
    pub comment: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Request to record a tracking event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrackingEventRequest {
    pub delivery_id: Uuid,
    pub status: DeliveryStatus,
    pub comment: Option<String>,
}

/// Request to list tracking events for one delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingByDeliveryRequest {
    pub delivery_id: Uuid,
}
