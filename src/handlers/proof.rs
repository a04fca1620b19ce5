//! Delivery proof message handlers.
//!
//! Proof photos travel base64-encoded over NATS. The upload handler decodes
//! them, writes the file under the uploads directory with a fresh UUID name
//! and records the row pointing at the served URL.

use std::path::Path;

use anyhow::Result;
use async_nats::{Client, Subscriber};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use futures::StreamExt;
use sqlx::PgPool;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::auth;
use crate::db::queries;
use crate::types::{
    DeleteRequest, DeleteResponse, ErrorResponse, GetRequest, ProofsByDeliveryRequest, Request,
    SuccessResponse, UploadProofRequest, UserRole,
};

/// Allowed proof photo extensions
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "pdf"];

/// Handle proof.upload messages
pub async fn handle_upload(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
    uploads_dir: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received proof.upload message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<UploadProofRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        if let Err(e) = auth::extract_auth(&request, &secret) {
            let error = ErrorResponse::new(request.id, "UNAUTHORIZED", e.to_string());
            let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            continue;
        }

        let extension = request.payload.extension.to_lowercase();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            let error = ErrorResponse::new(
                request.id,
                "VALIDATION_ERROR",
                format!("Unsupported file extension '{}'", request.payload.extension),
            );
            let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            continue;
        }

        let bytes = match BASE64.decode(&request.payload.data) {
            Ok(bytes) => bytes,
            Err(e) => {
                let error = ErrorResponse::new(
                    request.id,
                    "VALIDATION_ERROR",
                    format!("Invalid base64 payload: {}", e),
                );
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        // Confirm the delivery exists before writing anything to disk
        match queries::delivery::get_delivery(&pool, request.payload.delivery_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", "Delivery not found");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
            Err(e) => {
                error!("Failed to check delivery: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        }

        let proof_id = Uuid::new_v4();
        let file_name = format!("{}.{}", proof_id, extension);
        let proofs_dir = Path::new(&uploads_dir).join("proofs");
        let file_path = proofs_dir.join(&file_name);

        if let Err(e) = tokio::fs::create_dir_all(&proofs_dir).await {
            error!("Failed to create uploads directory: {}", e);
            let error = ErrorResponse::new(request.id, "UPLOAD_ERROR", e.to_string());
            let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            continue;
        }

        if let Err(e) = tokio::fs::write(&file_path, &bytes).await {
            error!("Failed to write proof file: {}", e);
            let error = ErrorResponse::new(request.id, "UPLOAD_ERROR", e.to_string());
            let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            continue;
        }

        let photo_url = format!("/uploads/proofs/{}", file_name);
        let kind = request.payload.kind.unwrap_or_default();

        match queries::proof::create_proof(
            &pool,
            proof_id,
            request.payload.delivery_id,
            &photo_url,
            kind,
        )
        .await
        {
            Ok(created) => {
                let response = SuccessResponse::new(request.id, created);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Stored proof: {}", response.payload.id);
            }
            Err(e) => {
                // Remove the orphaned file so disk and DB stay consistent
                let _ = tokio::fs::remove_file(&file_path).await;
                error!("Failed to store proof record: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle proof.get messages
pub async fn handle_get(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received proof.get message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<GetRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        if let Err(e) = auth::extract_auth(&request, &secret) {
            let error = ErrorResponse::new(request.id, "UNAUTHORIZED", e.to_string());
            let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            continue;
        }

        match queries::proof::get_proof(&pool, request.payload.id).await {
            Ok(Some(found)) => {
                let response = SuccessResponse::new(request.id, found);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Got proof: {}", response.payload.id);
            }
            Ok(None) => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", "Proof not found");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
            Err(e) => {
                error!("Failed to get proof: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle proof.by_delivery messages
pub async fn handle_by_delivery(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received proof.by_delivery message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<ProofsByDeliveryRequest> = match serde_json::from_slice(&msg.payload)
        {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        if let Err(e) = auth::extract_auth(&request, &secret) {
            let error = ErrorResponse::new(request.id, "UNAUTHORIZED", e.to_string());
            let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            continue;
        }

        match queries::proof::list_proofs_by_delivery(&pool, request.payload.delivery_id).await {
            Ok(proofs) => {
                let response = SuccessResponse::new(request.id, proofs);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Listed {} proofs for delivery", response.payload.len());
            }
            Err(e) => {
                error!("Failed to list proofs by delivery: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle proof.delete messages (admin only)
pub async fn handle_delete(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received proof.delete message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<DeleteRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let auth_info = match auth::extract_auth(&request, &secret) {
            Ok(info) => info,
            Err(e) => {
                let error = ErrorResponse::new(request.id, "UNAUTHORIZED", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        if let Err(e) = auth_info.require_role(&[UserRole::SuperAdmin, UserRole::Admin]) {
            let error = ErrorResponse::new(request.id, "FORBIDDEN", e.to_string());
            let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            continue;
        }

        match queries::proof::delete_proof(&pool, request.payload.id).await {
            Ok(true) => {
                let response =
                    SuccessResponse::new(request.id, DeleteResponse { deleted: true });
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Deleted proof: {}", request.payload.id);
            }
            Ok(false) => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", "Proof not found");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
            Err(e) => {
                error!("Failed to delete proof: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}
