//! Route database queries

use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::types::route::{CreateRouteRequest, Route, UpdateRouteRequest};

/// Create a new route. The date defaults to today when omitted.
pub async fn create_route(pool: &PgPool, req: &CreateRouteRequest) -> Result<Route> {
    let date = req.date.unwrap_or_else(|| Utc::now().date_naive());

    let route = sqlx::query_as::<_, Route>(
        r#"
        INSERT INTO routes (id, name, courier_id, vehicle_id, date, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
        RETURNING id, name, courier_id, vehicle_id, date, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&req.name)
    .bind(req.courier_id)
    .bind(req.vehicle_id)
    .bind(date)
    .fetch_one(pool)
    .await?;

    Ok(route)
}

/// Get route by ID
pub async fn get_route(pool: &PgPool, route_id: Uuid) -> Result<Option<Route>> {
    let route = sqlx::query_as::<_, Route>(
        r#"
        SELECT id, name, courier_id, vehicle_id, date, created_at, updated_at
        FROM routes
        WHERE id = $1
        "#,
    )
    .bind(route_id)
    .fetch_optional(pool)
    .await?;

    Ok(route)
}

/// List routes, paginated, most recent date first
pub async fn list_routes(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Route>> {
    let routes = sqlx::query_as::<_, Route>(
        r#"
        SELECT id, name, courier_id, vehicle_id, date, created_at, updated_at
        FROM routes
        ORDER BY date DESC, name ASC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(routes)
}

/// Count routes
pub async fn count_routes(pool: &PgPool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM routes")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Update a route
pub async fn update_route(pool: &PgPool, req: &UpdateRouteRequest) -> Result<Option<Route>> {
    let route = sqlx::query_as::<_, Route>(
        r#"
        UPDATE routes
        SET
            name = COALESCE($2, name),
            courier_id = COALESCE($3, courier_id),
            vehicle_id = COALESCE($4, vehicle_id),
            date = COALESCE($5, date),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, courier_id, vehicle_id, date, created_at, updated_at
        "#,
    )
    .bind(req.id)
    .bind(&req.name)
    .bind(req.courier_id)
    .bind(req.vehicle_id)
    .bind(req.date)
    .fetch_optional(pool)
    .await?;

    Ok(route)
}

/// Delete a route
pub async fn delete_route(pool: &PgPool, route_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM routes WHERE id = $1")
        .bind(route_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
