//! Delivery proof database queries

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::types::proof::{DeliveryProof, ProofKind};

/// Insert a proof record. The file itself is written by the handler
/// before this row is created.
pub async fn create_proof(
    pool: &PgPool,
    proof_id: Uuid,
    delivery_id: Uuid,
    photo_url: &str,
    kind: ProofKind,
) -> Result<DeliveryProof> {
    let proof = sqlx::query_as::<_, DeliveryProof>(
        r#"
        INSERT INTO delivery_proofs (id, delivery_id, photo_url, kind, uploaded_at)
        VALUES ($1, $2, $3, $4, NOW())
        RETURNING id, delivery_id, photo_url, kind, uploaded_at
        "#,
    )
    .bind(proof_id)
    .bind(delivery_id)
    .bind(photo_url)
    .bind(kind)
    .fetch_one(pool)
    .await?;

    Ok(proof)
}

/// Get proof by ID
pub async fn get_proof(pool: &PgPool, proof_id: Uuid) -> Result<Option<DeliveryProof>> {
    let proof = sqlx::query_as::<_, DeliveryProof>(
        r#"
        SELECT id, delivery_id, photo_url, kind, uploaded_at
        FROM delivery_proofs
        WHERE id = $1
        "#,
    )
    .bind(proof_id)
    .fetch_optional(pool)
    .await?;

    Ok(proof)
}

/// List proofs attached to one delivery, oldest first
pub async fn list_proofs_by_delivery(
    pool: &PgPool,
    delivery_id: Uuid,
) -> Result<Vec<DeliveryProof>> {
    let proofs = sqlx::query_as::<_, DeliveryProof>(
        r#"
        SELECT id, delivery_id, photo_url, kind, uploaded_at
        FROM delivery_proofs
        WHERE delivery_id = $1
        ORDER BY uploaded_at ASC
        "#,
    )
    .bind(delivery_id)
    .fetch_all(pool)
    .await?;

    Ok(proofs)
}

/// Delete a proof record
pub async fn delete_proof(pool: &PgPool, proof_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM delivery_proofs WHERE id = $1")
        .bind(proof_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
