//! Vehicle database queries

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::types::vehicle::{CreateVehicleRequest, UpdateVehicleRequest, Vehicle};

/// Create a new vehicle
pub async fn create_vehicle(pool: &PgPool, req: &CreateVehicleRequest) -> Result<Vehicle> {
    let vehicle = sqlx::query_as::<_, Vehicle>(
        r#"
        INSERT INTO vehicles (id, make, model, plates, capacity, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
        RETURNING id, make, model, plates, capacity, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&req.make)
    .bind(&req.model)
    .bind(&req.plates)
    .bind(req.capacity)
    .fetch_one(pool)
    .await?;

    Ok(vehicle)
}

/// Get vehicle by ID
pub async fn get_vehicle(pool: &PgPool, vehicle_id: Uuid) -> Result<Option<Vehicle>> {
    let vehicle = sqlx::query_as::<_, Vehicle>(
        r#"
        SELECT id, make, model, plates, capacity, created_at, updated_at
        FROM vehicles
        WHERE id = $1
        "#,
    )
    .bind(vehicle_id)
    .fetch_optional(pool)
    .await?;

    Ok(vehicle)
}

/// List vehicles, paginated, ordered by plates
pub async fn list_vehicles(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Vehicle>> {
    let vehicles = sqlx::query_as::<_, Vehicle>(
        r#"
        SELECT id, make, model, plates, capacity, created_at, updated_at
        FROM vehicles
        ORDER BY plates ASC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(vehicles)
}

/// Count vehicles
pub async fn count_vehicles(pool: &PgPool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vehicles")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Update a vehicle
pub async fn update_vehicle(
    pool: &PgPool,
    req: &UpdateVehicleRequest,
) -> Result<Option<Vehicle>> {
    let vehicle = sqlx::query_as::<_, Vehicle>(
        r#"
        UPDATE vehicles
        SET
            make = COALESCE($2, make),
            model = COALESCE($3, model),
            plates = COALESCE($4, plates),
            capacity = COALESCE($5, capacity),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, make, model, plates, capacity, created_at, updated_at
        "#,
    )
    .bind(req.id)
    .bind(&req.make)
    .bind(&req.model)
    .bind(&req.plates)
    .bind(req.capacity)
    .fetch_optional(pool)
    .await?;

    Ok(vehicle)
}

/// Delete a vehicle
pub async fn delete_vehicle(pool: &PgPool, vehicle_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
        .bind(vehicle_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
