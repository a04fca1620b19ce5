//! Client message handlers

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use sqlx::PgPool;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::auth;
use crate::db::queries;
use crate::types::{
    CreateClientRequest, DeleteRequest, DeleteResponse, ErrorResponse, GetRequest, ListRequest,
    ListResponse, Request, SuccessResponse, UpdateClientRequest,
};

/// Handle client.create messages
pub async fn handle_create(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received client.create message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<CreateClientRequest> = match serde_json::from_slice(&msg.payload) {
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

        match queries::client::create_client(&pool, &request.payload).await {
            Ok(created) => {
                let response = SuccessResponse::new(request.id, created);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Created client: {}", response.payload.id);
            }
            Err(e) => {
                error!("Failed to create client: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle client.list messages
pub async fn handle_list(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received client.list message");

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

        let listed = queries::client::list_clients(
            &pool,
            request.payload.limit,
            request.payload.offset,
        )
        .await;

        match listed {
            Ok(clients) => {
                let total = match queries::client::count_clients(&pool).await {
                    Ok(total) => total,
                    Err(e) => {
                        error!("Failed to count clients: {}", e);
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
                        items: clients,
                        total,
                        limit: request.payload.limit,
                        offset: request.payload.offset,
                    },
                );
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Listed {} clients", response.payload.items.len());
            }
            Err(e) => {
                error!("Failed to list clients: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle client.get messages
pub async fn handle_get(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received client.get message");

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

        match queries::client::get_client(&pool, request.payload.id).await {
            Ok(Some(found)) => {
                let response = SuccessResponse::new(request.id, found);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Got client: {}", response.payload.id);
            }
            Ok(None) => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", "Client not found");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
            Err(e) => {
                error!("Failed to get client: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle client.update messages
pub async fn handle_update(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received client.update message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<UpdateClientRequest> = match serde_json::from_slice(&msg.payload) {
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

        match queries::client::update_client(&pool, &request.payload).await {
            Ok(Some(updated)) => {
                let response = SuccessResponse::new(request.id, updated);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Updated client: {}", response.payload.id);
            }
            Ok(None) => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", "Client not found");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
            Err(e) => {
                error!("Failed to update client: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle client.delete messages
pub async fn handle_delete(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received client.delete message");

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

        if let Err(e) = auth::extract_auth(&request, &secret) {
            let error = ErrorResponse::new(request.id, "UNAUTHORIZED", e.to_string());
            let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            continue;
        }

        match queries::client::delete_client(&pool, request.payload.id).await {
            Ok(true) => {
                let response =
                    SuccessResponse::new(request.id, DeleteResponse { deleted: true });
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Deleted client: {}", request.payload.id);
            }
            Ok(false) => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", "Client not found");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
            Err(e) => {
                error!("Failed to delete client: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}
