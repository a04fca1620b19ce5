//! Package message handlers

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use sqlx::PgPool;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::auth;
use crate::db::queries;
use crate::types::{
    CreatePackageRequest, DeleteRequest, DeleteResponse, ErrorResponse, GetRequest, ListRequest,
    ListResponse, Request, SuccessResponse, UpdatePackageRequest,
};

/// Handle package.create messages
pub async fn handle_create(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received package.create message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<CreatePackageRequest> = match serde_json::from_slice(&msg.payload) {
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

        match queries::package::create_package(&pool, &request.payload).await {
            Ok(created) => {
                let response = SuccessResponse::new(request.id, created);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Created package: {}", response.payload.id);
            }
            Err(e) => {
                error!("Failed to create package: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle package.list messages
pub async fn handle_list(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received package.list message");

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

        let listed = queries::package::list_packages(
            &pool,
            request.payload.limit,
            request.payload.offset,
        )
        .await;

        match listed {
            Ok(packages) => {
                let total = match queries::package::count_packages(&pool).await {
                    Ok(total) => total,
                    Err(e) => {
                        error!("Failed to count packages: {}", e);
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
                        items: packages,
                        total,
                        limit: request.payload.limit,
                        offset: request.payload.offset,
                    },
                );
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Listed {} packages", response.payload.items.len());
            }
            Err(e) => {
                error!("Failed to list packages: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle package.get messages
pub async fn handle_get(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received package.get message");

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

        match queries::package::get_package(&pool, request.payload.id).await {
            Ok(Some(found)) => {
                let response = SuccessResponse::new(request.id, found);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Got package: {}", response.payload.id);
            }
            Ok(None) => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", "Package not found");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
            Err(e) => {
                error!("Failed to get package: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Request payload for listing packages of one delivery
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByDeliveryRequest {
    pub delivery_id: Uuid,
}

/// Handle package.by_delivery messages
pub async fn handle_by_delivery(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received package.by_delivery message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<ByDeliveryRequest> = match serde_json::from_slice(&msg.payload) {
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

        match queries::package::list_packages_by_delivery(&pool, request.payload.delivery_id)
            .await
        {
            Ok(packages) => {
                let response = SuccessResponse::new(request.id, packages);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Listed {} packages for delivery", response.payload.len());
            }
            Err(e) => {
                error!("Failed to list packages by delivery: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle package.update messages
pub async fn handle_update(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received package.update message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<UpdatePackageRequest> = match serde_json::from_slice(&msg.payload) {
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

        match queries::package::update_package(&pool, &request.payload).await {
            Ok(Some(updated)) => {
                let response = SuccessResponse::new(request.id, updated);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Updated package: {}", response.payload.id);
            }
            Ok(None) => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", "Package not found");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
            Err(e) => {
                error!("Failed to update package: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle package.delete messages
pub async fn handle_delete(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received package.delete message");

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

        match queries::package::delete_package(&pool, request.payload.id).await {
            Ok(true) => {
                let response =
                    SuccessResponse::new(request.id, DeleteResponse { deleted: true });
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Deleted package: {}", request.payload.id);
            }
            Ok(false) => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", "Package not found");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
            Err(e) => {
                error!("Failed to delete package: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}
