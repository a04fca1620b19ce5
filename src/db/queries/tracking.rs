//! Tracking event database queries

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::types::tracking::{CreateTrackingEventRequest, TrackingEvent};

/// Record a tracking event against a delivery
pub async fn create_tracking_event(
    pool: &PgPool,
    req: &CreateTrackingEventRequest,
) -> Result<TrackingEvent> {
    let event = sqlx::query_as::<_, TrackingEvent>(
        r#"
        INSERT INTO tracking_events (id, delivery_id, status, comment, recorded_at)
        VALUES ($1, $2, $3, $4, NOW())
        RETURNING id, delivery_id, status, comment, recorded_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.delivery_id)
    .bind(req.status)
    .bind(&req.comment)
    .fetch_one(pool)
    .await?;

    Ok(event)
}

/// Get tracking event by ID
pub async fn get_tracking_event(pool: &PgPool, event_id: Uuid) -> Result<Option<TrackingEvent>> {
    let event = sqlx::query_as::<_, TrackingEvent>(
        r#"
        SELECT id, delivery_id, status, comment, recorded_at
        FROM tracking_events
        WHERE id = $1
        "#,
    )
    .bind(event_id)
    .fetch_optional(pool)
    .await?;

    Ok(event)
}

/// List tracking events, paginated, newest first
pub async fn list_tracking_events(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<TrackingEvent>> {
    let events = sqlx::query_as::<_, TrackingEvent>(
        r#"
        SELECT id, delivery_id, status, comment, recorded_at
        FROM tracking_events
        ORDER BY recorded_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(events)
}

/// Count tracking events
pub async fn count_tracking_events(pool: &PgPool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tracking_events")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// List the tracking history of one delivery, oldest first
pub async fn list_tracking_by_delivery(
    pool: &PgPool,
    delivery_id: Uuid,
) -> Result<Vec<TrackingEvent>> {
    let events = sqlx::query_as::<_, TrackingEvent>(
        r#"
        SELECT id, delivery_id, status, comment, recorded_at
        FROM tracking_events
        WHERE delivery_id = $1
        ORDER BY recorded_at ASC
        "#,
    )
    .bind(delivery_id)
    .fetch_all(pool)
    .await?;

    Ok(events)
}
