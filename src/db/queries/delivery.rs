//! Delivery database queries

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::types::delivery::{
    CreateDeliveryRequest, Delivery, DeliveryStatus, UpdateDeliveryRequest,
};

/// Create a new delivery. Status defaults to pending when omitted.
pub async fn create_delivery(pool: &PgPool, req: &CreateDeliveryRequest) -> Result<Delivery> {
    let status = req.status.unwrap_or_default();

    let delivery = sqlx::query_as::<_, Delivery>(
        r#"
        INSERT INTO deliveries (id, route_id, client_id, status, scheduled_date, scheduled_time, notes, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
        RETURNING id, route_id, client_id, status, scheduled_date, scheduled_time, notes, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.route_id)
    .bind(req.client_id)
    .bind(status)
    .bind(req.scheduled_date)
    .bind(req.scheduled_time)
    .bind(&req.notes)
    .fetch_one(pool)
    .await?;

    Ok(delivery)
}

/// Get delivery by ID
pub async fn get_delivery(pool: &PgPool, delivery_id: Uuid) -> Result<Option<Delivery>> {
    let delivery = sqlx::query_as::<_, Delivery>(
        r#"
        SELECT id, route_id, client_id, status, scheduled_date, scheduled_time, notes, created_at, updated_at
        FROM deliveries
        WHERE id = $1
        "#,
    )
    .bind(delivery_id)
    .fetch_optional(pool)
    .await?;

    Ok(delivery)
}

/// List deliveries, paginated, newest first
pub async fn list_deliveries(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Delivery>> {
    let deliveries = sqlx::query_as::<_, Delivery>(
        r#"
        SELECT id, route_id, client_id, status, scheduled_date, scheduled_time, notes, created_at, updated_at
        FROM deliveries
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(deliveries)
}

/// Count deliveries
pub async fn count_deliveries(pool: &PgPool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM deliveries")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// List deliveries belonging to a route, oldest first
pub async fn list_deliveries_by_route(pool: &PgPool, route_id: Uuid) -> Result<Vec<Delivery>> {
    let deliveries = sqlx::query_as::<_, Delivery>(
        r#"
        SELECT id, route_id, client_id, status, scheduled_date, scheduled_time, notes, created_at, updated_at
        FROM deliveries
        WHERE route_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(route_id)
    .fetch_all(pool)
    .await?;

    Ok(deliveries)
}

/// Update a delivery
pub async fn update_delivery(
    pool: &PgPool,
    req: &UpdateDeliveryRequest,
) -> Result<Option<Delivery>> {
    let delivery = sqlx::query_as::<_, Delivery>(
        r#"
        UPDATE deliveries
        SET
            route_id = COALESCE($2, route_id),
            status = COALESCE($3, status),
            scheduled_date = COALESCE($4, scheduled_date),
            scheduled_time = COALESCE($5, scheduled_time),
            notes = COALESCE($6, notes),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, route_id, client_id, status, scheduled_date, scheduled_time, notes, created_at, updated_at
        "#,
    )
    .bind(req.id)
    .bind(req.route_id)
    .bind(req.status)
    .bind(req.scheduled_date)
    .bind(req.scheduled_time)
    .bind(&req.notes)
    .fetch_optional(pool)
    .await?;

    Ok(delivery)
}

/// Set only the status of a delivery
pub async fn set_delivery_status(
    pool: &PgPool,
    delivery_id: Uuid,
    status: DeliveryStatus,
) -> Result<Option<Delivery>> {
    let delivery = sqlx::query_as::<_, Delivery>(
        r#"
        UPDATE deliveries
        SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING id, route_id, client_id, status, scheduled_date, scheduled_time, notes, created_at, updated_at
        "#,
    )
    .bind(delivery_id)
    .bind(status)
    .fetch_optional(pool)
    .await?;

    Ok(delivery)
}

/// Delete a delivery
pub async fn delete_delivery(pool: &PgPool, delivery_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM deliveries WHERE id = $1")
        .bind(delivery_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
