//! Package database queries

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::types::package::{CreatePackageRequest, Package, UpdatePackageRequest};

/// Create a new package
pub async fn create_package(pool: &PgPool, req: &CreatePackageRequest) -> Result<Package> {
    let package = sqlx::query_as::<_, Package>(
        r#"
        INSERT INTO packages (id, delivery_id, description, weight_kg, declared_value, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
        RETURNING id, delivery_id, description, weight_kg, declared_value, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.delivery_id)
    .bind(&req.description)
    .bind(req.weight_kg)
    .bind(req.declared_value)
    .fetch_one(pool)
    .await?;

    Ok(package)
}

/// Get package by ID
pub async fn get_package(pool: &PgPool, package_id: Uuid) -> Result<Option<Package>> {
    let package = sqlx::query_as::<_, Package>(
        r#"
        SELECT id, delivery_id, description, weight_kg, declared_value, created_at, updated_at
        FROM packages
        WHERE id = $1
        "#,
    )
    .bind(package_id)
    .fetch_optional(pool)
    .await?;

    Ok(package)
}

/// List packages, paginated, newest first
pub async fn list_packages(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Package>> {
    let packages = sqlx::query_as::<_, Package>(
        r#"
        SELECT id, delivery_id, description, weight_kg, declared_value, created_at, updated_at
        FROM packages
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(packages)
}

/// Count packages
pub async fn count_packages(pool: &PgPool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM packages")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// List packages belonging to a delivery
pub async fn list_packages_by_delivery(pool: &PgPool, delivery_id: Uuid) -> Result<Vec<Package>> {
    let packages = sqlx::query_as::<_, Package>(
        r#"
        SELECT id, delivery_id, description, weight_kg, declared_value, created_at, updated_at
        FROM packages
        WHERE delivery_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(delivery_id)
    .fetch_all(pool)
    .await?;

    Ok(packages)
}

/// Update a package
pub async fn update_package(pool: &PgPool, req: &UpdatePackageRequest) -> Result<Option<Package>> {
    let package = sqlx::query_as::<_, Package>(
        r#"
        UPDATE packages
        SET
            description = COALESCE($2, description),
            weight_kg = COALESCE($3, weight_kg),
            declared_value = COALESCE($4, declared_value),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, delivery_id, description, weight_kg, declared_value, created_at, updated_at
        "#,
    )
    .bind(req.id)
    .bind(&req.description)
    .bind(req.weight_kg)
    .bind(req.declared_value)
    .fetch_optional(pool)
    .await?;

    Ok(package)
}

/// Delete a package
pub async fn delete_package(pool: &PgPool, package_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM packages WHERE id = $1")
        .bind(package_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
