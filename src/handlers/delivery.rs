//! Delivery message handlers

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use sqlx::PgPool;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::auth;
use crate::db::queries;
use crate::types::{
    CreateDeliveryRequest, CreateTrackingEventRequest, DeleteRequest, DeleteResponse,
    DeliveryStatus, ErrorResponse, GetRequest, ListRequest, ListResponse, Request,
    SuccessResponse, UpdateDeliveryRequest,
};

/// Handle delivery.create messages
pub async fn handle_create(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received delivery.create message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<CreateDeliveryRequest> = match serde_json::from_slice(&msg.payload) {
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

        match queries::delivery::create_delivery(&pool, &request.payload).await {
            Ok(created) => {
                let response = SuccessResponse::new(request.id, created);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Created delivery: {}", response.payload.id);
            }
            Err(e) => {
                error!("Failed to create delivery: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle delivery.list messages
pub async fn handle_list(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received delivery.list message");

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

        let listed = queries::delivery::list_deliveries(
            &pool,
            request.payload.limit,
            request.payload.offset,
        )
        .await;

        match listed {
            Ok(deliveries) => {
                let total = match queries::delivery::count_deliveries(&pool).await {
                    Ok(total) => total,
                    Err(e) => {
                        error!("Failed to count deliveries: {}", e);
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
                        items: deliveries,
                        total,
                        limit: request.payload.limit,
                        offset: request.payload.offset,
                    },
                );
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Listed {} deliveries", response.payload.items.len());
            }
            Err(e) => {
                error!("Failed to list deliveries: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle delivery.get messages
pub async fn handle_get(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received delivery.get message");

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

        match queries::delivery::get_delivery(&pool, request.payload.id).await {
            Ok(Some(found)) => {
                let response = SuccessResponse::new(request.id, found);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Got delivery: {}", response.payload.id);
            }
            Ok(None) => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", "Delivery not found");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
            Err(e) => {
                error!("Failed to get delivery: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Request payload for listing deliveries of one route
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByRouteRequest {
    pub route_id: Uuid,
}

/// Handle delivery.by_route messages
pub async fn handle_by_route(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received delivery.by_route message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<ByRouteRequest> = match serde_json::from_slice(&msg.payload) {
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

        match queries::delivery::list_deliveries_by_route(&pool, request.payload.route_id).await {
            Ok(deliveries) => {
                let response = SuccessResponse::new(request.id, deliveries);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Listed {} deliveries for route", response.payload.len());
            }
            Err(e) => {
                error!("Failed to list deliveries by route: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle delivery.update messages
pub async fn handle_update(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received delivery.update message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<UpdateDeliveryRequest> = match serde_json::from_slice(&msg.payload) {
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

        match queries::delivery::update_delivery(&pool, &request.payload).await {
            Ok(Some(updated)) => {
                let response = SuccessResponse::new(request.id, updated);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Updated delivery: {}", response.payload.id);
            }
            Ok(None) => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", "Delivery not found");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
            Err(e) => {
                error!("Failed to update delivery: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Request payload for a status transition
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub id: Uuid,
    pub status: DeliveryStatus,
    pub comment: Option<String>,
}

/// Handle delivery.status messages.
///
/// Sets the delivery status and records a tracking event so the status
/// history stays complete.
pub async fn handle_status(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received delivery.status message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<UpdateStatusRequest> = match serde_json::from_slice(&msg.payload) {
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

        match queries::delivery::set_delivery_status(
            &pool,
            request.payload.id,
            request.payload.status,
        )
        .await
        {
            Ok(Some(updated)) => {
                let event = CreateTrackingEventRequest {
                    delivery_id: updated.id,
                    status: updated.status,
                    comment: request.payload.comment.clone(),
                };
                if let Err(e) = queries::tracking::create_tracking_event(&pool, &event).await {
                    warn!("Failed to record tracking event: {}", e);
                }

                let response = SuccessResponse::new(request.id, updated);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!(
                    "Set delivery {} status to {}",
                    response.payload.id,
                    response.payload.status.as_str()
                );
            }
            Ok(None) => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", "Delivery not found");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
            Err(e) => {
                error!("Failed to set delivery status: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle delivery.delete messages
pub async fn handle_delete(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received delivery.delete message");

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

        match queries::delivery::delete_delivery(&pool, request.payload.id).await {
            Ok(true) => {
                let response =
                    SuccessResponse::new(request.id, DeleteResponse { deleted: true });
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Deleted delivery: {}", request.payload.id);
            }
            Ok(false) => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", "Delivery not found");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
            Err(e) => {
                error!("Failed to delete delivery: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}
