//! Client database queries

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::types::client::{Client, CreateClientRequest, UpdateClientRequest};

/// Create a new client
pub async fn create_client(pool: &PgPool, req: &CreateClientRequest) -> Result<Client> {
    let client = sqlx::query_as::<_, Client>(
        r#"
        INSERT INTO clients (id, name, address, phone, email, lat, lng, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
        RETURNING id, name, address, phone, email, lat, lng, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&req.name)
    .bind(&req.address)
    .bind(&req.phone)
    .bind(&req.email)
    .bind(req.lat)
    .bind(req.lng)
    .fetch_one(pool)
    .await?;

    Ok(client)
}

/// Get client by ID
pub async fn get_client(pool: &PgPool, client_id: Uuid) -> Result<Option<Client>> {
    let client = sqlx::query_as::<_, Client>(
        r#"
        SELECT id, name, address, phone, email, lat, lng, created_at, updated_at
        FROM clients
        WHERE id = $1
        "#,
    )
    .bind(client_id)
    .fetch_optional(pool)
    .await?;

    Ok(client)
}

/// List clients, paginated, ordered by name
pub async fn list_clients(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Client>> {
    let clients = sqlx::query_as::<_, Client>(
        r#"
        SELECT id, name, address, phone, email, lat, lng, created_at, updated_at
        FROM clients
        ORDER BY name ASC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(clients)
}

/// Count clients (for pagination totals)
pub async fn count_clients(pool: &PgPool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clients")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Fetch the clients matching the given IDs (for route estimation).
/// IDs with no matching row are silently absent from the result.
pub async fn get_clients_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Client>> {
    let clients = sqlx::query_as::<_, Client>(
        r#"
        SELECT id, name, address, phone, email, lat, lng, created_at, updated_at
        FROM clients
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(clients)
}

/// Update a client
pub async fn update_client(
    pool: &PgPool,
    req: &UpdateClientRequest,
) -> Result<Option<Client>> {
    let client = sqlx::query_as::<_, Client>(
        r#"
        UPDATE clients
        SET
            name = COALESCE($2, name),
            address = COALESCE($3, address),
            phone = COALESCE($4, phone),
            email = COALESCE($5, email),
            lat = COALESCE($6, lat),
            lng = COALESCE($7, lng),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, address, phone, email, lat, lng, created_at, updated_at
        "#,
    )
    .bind(req.id)
    .bind(&req.name)
    .bind(&req.address)
    .bind(&req.phone)
    .bind(&req.email)
    .bind(req.lat)
    .bind(req.lng)
    .fetch_optional(pool)
    .await?;

    Ok(client)
}

/// Delete a client
pub async fn delete_client(pool: &PgPool, client_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM clients WHERE id = $1")
        .bind(client_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
