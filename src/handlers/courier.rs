//! Courier message handlers.
//!
//! Reads are open to any authenticated user; writes require an admin role.

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use sqlx::PgPool;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::auth;
use crate::db::queries;
use crate::types::{
    CreateCourierRequest, DeleteRequest, DeleteResponse, ErrorResponse, GetRequest, ListRequest,
    ListResponse, Request, SuccessResponse, UpdateCourierRequest, UserRole,
};

const WRITE_ROLES: &[UserRole] = &[UserRole::SuperAdmin, UserRole::Admin];

/// Handle courier.create messages
pub async fn handle_create(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received courier.create message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<CreateCourierRequest> = match serde_json::from_slice(&msg.payload) {
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

        if let Err(e) = auth_info.require_role(WRITE_ROLES) {
            let error = ErrorResponse::new(request.id, "FORBIDDEN", e.to_string());
            let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            continue;
        }

        match queries::courier::create_courier(&pool, &request.payload).await {
            Ok(created) => {
                let response = SuccessResponse::new(request.id, created);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Created courier: {}", response.payload.id);
            }
            Err(e) => {
                error!("Failed to create courier: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle courier.list messages
pub async fn handle_list(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received courier.list message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<ListRequest> = match serde_json::from_slice(&msg.payload) {
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

        let listed = queries::courier::list_couriers(
            &pool,
            request.payload.limit,
            request.payload.offset,
        )
        .await;

        match listed {
            Ok(couriers) => {
                let total = match queries::courier::count_couriers(&pool).await {
                    Ok(total) => total,
                    Err(e) => {
                        error!("Failed to count couriers: {}", e);
                        let error =
                            ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                        let _ =
                            client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                        continue;
                    }
                };
                let response = SuccessResponse::new(
                    request.id,
                    ListResponse {
                        items: couriers,
                        total,
                        limit: request.payload.limit,
                        offset: request.payload.offset,
                    },
                );
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Listed {} couriers", response.payload.items.len());
            }
            Err(e) => {
                error!("Failed to list couriers: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle courier.get messages
pub async fn handle_get(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received courier.get message");

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

        match queries::courier::get_courier(&pool, request.payload.id).await {
            Ok(Some(found)) => {
                let response = SuccessResponse::new(request.id, found);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Got courier: {}", response.payload.id);
            }
            Ok(None) => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", "Courier not found");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
            Err(e) => {
                error!("Failed to get courier: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle courier.update messages
pub async fn handle_update(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received courier.update message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<UpdateCourierRequest> = match serde_json::from_slice(&msg.payload) {
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

        if let Err(e) = auth_info.require_role(WRITE_ROLES) {
            let error = ErrorResponse::new(request.id, "FORBIDDEN", e.to_string());
            let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            continue;
        }

        match queries::courier::update_courier(&pool, &request.payload).await {
            Ok(Some(updated)) => {
                let response = SuccessResponse::new(request.id, updated);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Updated courier: {}", response.payload.id);
            }
            Ok(None) => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", "Courier not found");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
            Err(e) => {
                error!("Failed to update courier: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle courier.delete messages
pub async fn handle_delete(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received courier.delete message");

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

        if let Err(e) = auth_info.require_role(WRITE_ROLES) {
            let error = ErrorResponse::new(request.id, "FORBIDDEN", e.to_string());
            let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            continue;
        }

        match queries::courier::delete_courier(&pool, request.payload.id).await {
            Ok(true) => {
                let response =
                    SuccessResponse::new(request.id, DeleteResponse { deleted: true });
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Deleted courier: {}", request.payload.id);
            }
            Ok(false) => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", "Courier not found");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
            Err(e) => {
                error!("Failed to delete courier: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}
