//! Courier database queries

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::types::courier::{Courier, CreateCourierRequest, UpdateCourierRequest};

/// Create a new courier
pub async fn create_courier(pool: &PgPool, req: &CreateCourierRequest) -> Result<Courier> {
    let courier = sqlx::query_as::<_, Courier>(
        r#"
        INSERT INTO couriers (id, name, phone, license_number, created_at, updated_at)
        VALUES ($1, $2, $3, $4, NOW(), NOW())
        RETURNING id, name, phone, license_number, is_active, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&req.name)
    .bind(&req.phone)
    .bind(&req.license_number)
    .fetch_one(pool)
    .await?;

    Ok(courier)
}

/// Get courier by ID
pub async fn get_courier(pool: &PgPool, courier_id: Uuid) -> Result<Option<Courier>> {
    let courier = sqlx::query_as::<_, Courier>(
        r#"
        SELECT id, name, phone, license_number, is_active, created_at, updated_at
        FROM couriers
        WHERE id = $1
        "#,
    )
    .bind(courier_id)
    .fetch_optional(pool)
    .await?;

    Ok(courier)
}

/// List couriers, paginated, ordered by name
pub async fn list_couriers(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Courier>> {
    let couriers = sqlx::query_as::<_, Courier>(
        r#"
        SELECT id, name, phone, license_number, is_active, created_at, updated_at
        FROM couriers
        ORDER BY name ASC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(couriers)
}

/// Count couriers
pub async fn count_couriers(pool: &PgPool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM couriers")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Update a courier
pub async fn update_courier(
    pool: &PgPool,
    req: &UpdateCourierRequest,
) -> Result<Option<Courier>> {
    let courier = sqlx::query_as::<_, Courier>(
        r#"
        UPDATE couriers
        SET
            name = COALESCE($2, name),
            phone = COALESCE($3, phone),
            license_number = COALESCE($4, license_number),
            is_active = COALESCE($5, is_active),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, phone, license_number, is_active, created_at, updated_at
        "#,
    )
    .bind(req.id)
    .bind(&req.name)
    .bind(&req.phone)
    .bind(&req.license_number)
    .bind(req.is_active)
    .fetch_optional(pool)
    .await?;

    Ok(courier)
}

/// Delete a courier
pub async fn delete_courier(pool: &PgPool, courier_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM couriers WHERE id = $1")
        .bind(courier_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
