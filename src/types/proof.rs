//! Delivery proof (photo evidence) types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Kind of evidence attached to a delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "proof_kind", rename_all = "snake_case")]
pub enum ProofKind {
    Delivery,
    Document,
    Client,
    Other,
}

impl Default for ProofKind {
    fn default() -> Self {
        ProofKind::Delivery
    }
}

/// Delivery proof entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryProof {
    pub id: Uuid,
    pub delivery_id: Uuid,
    pub photo_url: String,
    pub kind: ProofKind,
    pub uploaded_at: DateTime<Utc>,
}

/// Request to upload a proof photo.
///
/// The photo travels base64-encoded in the message payload; the worker
/// writes it under the uploads directory and stores the public URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadProofRequest {
    pub delivery_id: Uuid,
    /// Base64-encoded photo bytes
    pub data: String,
    /// File extension without the dot, e.g. "jpg"
    pub extension: String,
    #[serde(default)]
    pub kind: Option<ProofKind>,
}

/// Request to list proofs for one delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofsByDeliveryRequest {
    pub delivery_id: Uuid,
}
