//! NATS message handlers

pub mod auth;
pub mod client;
pub mod courier;
pub mod delivery;
pub mod package;
pub mod ping;
pub mod proof;
pub mod route;
pub mod tracking;
pub mod user;
pub mod vehicle;

use std::sync::Arc;

use anyhow::Result;
use async_nats::Client;
use sqlx::PgPool;
use tokio::select;
use tracing::{error, info};

use crate::config::Config;
use crate::services::estimator::{create_estimator, RouteEstimator};
use crate::services::rate_limiter::RateLimiter;

/// Login attempts allowed per email inside the window
const LOGIN_MAX_ATTEMPTS: usize = 5;

/// Login throttling window in seconds
const LOGIN_WINDOW_SECS: u64 = 300;

/// Start all message handlers
pub async fn start_handlers(client: Client, pool: PgPool, config: &Config) -> Result<()> {
    info!("Starting message handlers...");

    let estimator: Arc<dyn RouteEstimator> = Arc::from(create_estimator(config.estimator));
    info!("Route estimator initialized: {}", estimator.name());

    let login_limiter = Arc::new(RateLimiter::new(LOGIN_MAX_ATTEMPTS, LOGIN_WINDOW_SECS));
    let secret = config.jwt_secret.clone();
    let depot = config.depot;
    let uploads_dir = config.uploads_dir.clone();

    // Subscribe to all subjects
    let ping_sub = client.subscribe("dispatch.ping").await?;

    let auth_login_sub = client.subscribe("dispatch.auth.login").await?;
    let auth_verify_sub = client.subscribe("dispatch.auth.verify").await?;
    let auth_change_password_sub = client.subscribe("dispatch.auth.change_password").await?;

    let client_create_sub = client.subscribe("dispatch.client.create").await?;
    let client_list_sub = client.subscribe("dispatch.client.list").await?;
    let client_get_sub = client.subscribe("dispatch.client.get").await?;
    let client_update_sub = client.subscribe("dispatch.client.update").await?;
    let client_delete_sub = client.subscribe("dispatch.client.delete").await?;

    let courier_create_sub = client.subscribe("dispatch.courier.create").await?;
    let courier_list_sub = client.subscribe("dispatch.courier.list").await?;
    let courier_get_sub = client.subscribe("dispatch.courier.get").await?;
    let courier_update_sub = client.subscribe("dispatch.courier.update").await?;
    let courier_delete_sub = client.subscribe("dispatch.courier.delete").await?;

    let vehicle_create_sub = client.subscribe("dispatch.vehicle.create").await?;
    let vehicle_list_sub = client.subscribe("dispatch.vehicle.list").await?;
    let vehicle_get_sub = client.subscribe("dispatch.vehicle.get").await?;
    let vehicle_update_sub = client.subscribe("dispatch.vehicle.update").await?;
    let vehicle_delete_sub = client.subscribe("dispatch.vehicle.delete").await?;

    let route_create_sub = client.subscribe("dispatch.route.create").await?;
    let route_list_sub = client.subscribe("dispatch.route.list").await?;
    let route_get_sub = client.subscribe("dispatch.route.get").await?;
    let route_update_sub = client.subscribe("dispatch.route.update").await?;
    let route_delete_sub = client.subscribe("dispatch.route.delete").await?;
    let route_estimate_sub = client.subscribe("dispatch.route.estimate").await?;

    let delivery_create_sub = client.subscribe("dispatch.delivery.create").await?;
    let delivery_list_sub = client.subscribe("dispatch.delivery.list").await?;
    let delivery_get_sub = client.subscribe("dispatch.delivery.get").await?;
    let delivery_by_route_sub = client.subscribe("dispatch.delivery.by_route").await?;
    let delivery_update_sub = client.subscribe("dispatch.delivery.update").await?;
    let delivery_status_sub = client.subscribe("dispatch.delivery.status").await?;
    let delivery_delete_sub = client.subscribe("dispatch.delivery.delete").await?;

    let package_create_sub = client.subscribe("dispatch.package.create").await?;
    let package_list_sub = client.subscribe("dispatch.package.list").await?;
    let package_get_sub = client.subscribe("dispatch.package.get").await?;
    let package_by_delivery_sub = client.subscribe("dispatch.package.by_delivery").await?;
    let package_update_sub = client.subscribe("dispatch.package.update").await?;
    let package_delete_sub = client.subscribe("dispatch.package.delete").await?;

    let tracking_create_sub = client.subscribe("dispatch.tracking.create").await?;
    let tracking_list_sub = client.subscribe("dispatch.tracking.list").await?;
    let tracking_get_sub = client.subscribe("dispatch.tracking.get").await?;
    let tracking_by_delivery_sub = client.subscribe("dispatch.tracking.by_delivery").await?;

    let proof_upload_sub = client.subscribe("dispatch.proof.upload").await?;
    let proof_get_sub = client.subscribe("dispatch.proof.get").await?;
    let proof_by_delivery_sub = client.subscribe("dispatch.proof.by_delivery").await?;
    let proof_delete_sub = client.subscribe("dispatch.proof.delete").await?;

    let user_create_sub = client.subscribe("dispatch.user.create").await?;
    let user_list_sub = client.subscribe("dispatch.user.list").await?;
    let user_get_sub = client.subscribe("dispatch.user.get").await?;
    let user_update_sub = client.subscribe("dispatch.user.update").await?;
    let user_delete_sub = client.subscribe("dispatch.user.delete").await?;

    info!("Subscribed to NATS subjects");

    // Spawn handlers
    let ping_handle = {
        let client = client.clone();
        tokio::spawn(async move { ping::handle_ping(client, ping_sub).await })
    };

    // Auth handlers
    let auth_login_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        let limiter = Arc::clone(&login_limiter);
        tokio::spawn(async move {
            auth::handle_login(client, auth_login_sub, pool, secret, limiter).await
        })
    };

    let auth_verify_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            auth::handle_verify(client, auth_verify_sub, pool, secret).await
        })
    };

    let auth_change_password_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            auth::handle_change_password(client, auth_change_password_sub, pool, secret).await
        })
    };

    // Client handlers
    let client_create_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            client::handle_create(client, client_create_sub, pool, secret).await
        })
    };

    let client_list_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            client::handle_list(client, client_list_sub, pool, secret).await
        })
    };

    let client_get_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move { client::handle_get(client, client_get_sub, pool, secret).await })
    };

    let client_update_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            client::handle_update(client, client_update_sub, pool, secret).await
        })
    };

    let client_delete_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            client::handle_delete(client, client_delete_sub, pool, secret).await
        })
    };

    // Courier handlers
    let courier_create_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            courier::handle_create(client, courier_create_sub, pool, secret).await
        })
    };

    let courier_list_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            courier::handle_list(client, courier_list_sub, pool, secret).await
        })
    };

    let courier_get_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            courier::handle_get(client, courier_get_sub, pool, secret).await
        })
    };

    let courier_update_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            courier::handle_update(client, courier_update_sub, pool, secret).await
        })
    };

    let courier_delete_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            courier::handle_delete(client, courier_delete_sub, pool, secret).await
        })
    };

    // Vehicle handlers
    let vehicle_create_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            vehicle::handle_create(client, vehicle_create_sub, pool, secret).await
        })
    };

    let vehicle_list_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            vehicle::handle_list(client, vehicle_list_sub, pool, secret).await
        })
    };

    let vehicle_get_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            vehicle::handle_get(client, vehicle_get_sub, pool, secret).await
        })
    };

    let vehicle_update_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            vehicle::handle_update(client, vehicle_update_sub, pool, secret).await
        })
    };

    let vehicle_delete_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            vehicle::handle_delete(client, vehicle_delete_sub, pool, secret).await
        })
    };

    // Route handlers
    let route_create_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            route::handle_create(client, route_create_sub, pool, secret).await
        })
    };

    let route_list_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            route::handle_list(client, route_list_sub, pool, secret).await
        })
    };

    let route_get_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move { route::handle_get(client, route_get_sub, pool, secret).await })
    };

    let route_update_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            route::handle_update(client, route_update_sub, pool, secret).await
        })
    };

    let route_delete_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            route::handle_delete(client, route_delete_sub, pool, secret).await
        })
    };

    let route_estimate_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        let estimator = Arc::clone(&estimator);
        tokio::spawn(async move {
            route::handle_estimate(client, route_estimate_sub, pool, secret, depot, estimator)
                .await
        })
    };

    // Delivery handlers
    let delivery_create_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            delivery::handle_create(client, delivery_create_sub, pool, secret).await
        })
    };

    let delivery_list_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            delivery::handle_list(client, delivery_list_sub, pool, secret).await
        })
    };

    let delivery_get_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            delivery::handle_get(client, delivery_get_sub, pool, secret).await
        })
    };

    let delivery_by_route_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            delivery::handle_by_route(client, delivery_by_route_sub, pool, secret).await
        })
    };

    let delivery_update_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            delivery::handle_update(client, delivery_update_sub, pool, secret).await
        })
    };

    let delivery_status_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            delivery::handle_status(client, delivery_status_sub, pool, secret).await
        })
    };

    let delivery_delete_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            delivery::handle_delete(client, delivery_delete_sub, pool, secret).await
        })
    };

    // Package handlers
    let package_create_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            package::handle_create(client, package_create_sub, pool, secret).await
        })
    };

    let package_list_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            package::handle_list(client, package_list_sub, pool, secret).await
        })
    };

    let package_get_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            package::handle_get(client, package_get_sub, pool, secret).await
        })
    };

    let package_by_delivery_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            package::handle_by_delivery(client, package_by_delivery_sub, pool, secret).await
        })
    };

    let package_update_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            package::handle_update(client, package_update_sub, pool, secret).await
        })
    };

    let package_delete_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            package::handle_delete(client, package_delete_sub, pool, secret).await
        })
    };

    // Tracking handlers
    let tracking_create_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            tracking::handle_create(client, tracking_create_sub, pool, secret).await
        })
    };

    let tracking_list_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            tracking::handle_list(client, tracking_list_sub, pool, secret).await
        })
    };

    let tracking_get_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            tracking::handle_get(client, tracking_get_sub, pool, secret).await
        })
    };

    let tracking_by_delivery_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            tracking::handle_by_delivery(client, tracking_by_delivery_sub, pool, secret).await
        })
    };

    // Proof handlers
    let proof_upload_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        let uploads_dir = uploads_dir.clone();
        tokio::spawn(async move {
            proof::handle_upload(client, proof_upload_sub, pool, secret, uploads_dir).await
        })
    };

    let proof_get_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move { proof::handle_get(client, proof_get_sub, pool, secret).await })
    };

    let proof_by_delivery_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            proof::handle_by_delivery(client, proof_by_delivery_sub, pool, secret).await
        })
    };

    let proof_delete_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            proof::handle_delete(client, proof_delete_sub, pool, secret).await
        })
    };

    // User handlers
    let user_create_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            user::handle_create(client, user_create_sub, pool, secret).await
        })
    };

    let user_list_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move { user::handle_list(client, user_list_sub, pool, secret).await })
    };

    let user_get_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move { user::handle_get(client, user_get_sub, pool, secret).await })
    };

    let user_update_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            user::handle_update(client, user_update_sub, pool, secret).await
        })
    };

    let user_delete_handle = {
        let client = client.clone();
        let pool = pool.clone();
        let secret = secret.clone();
        tokio::spawn(async move {
            user::handle_delete(client, user_delete_sub, pool, secret).await
        })
    };

    info!("All handlers started");

    // Handlers run until the NATS connection drops. If any one of them
    // finishes, log it and shut down so the supervisor can restart us.
    select! {
        result = ping_handle => {
            error!("Ping handler finished: {:?}", result);
        }
        result = auth_login_handle => {
            error!("Auth login handler finished: {:?}", result);
        }
        result = auth_verify_handle => {
            error!("Auth verify handler finished: {:?}", result);
        }
        result = auth_change_password_handle => {
            error!("Auth change password handler finished: {:?}", result);
        }
        result = client_create_handle => {
            error!("Client create handler finished: {:?}", result);
        }
        result = client_list_handle => {
            error!("Client list handler finished: {:?}", result);
        }
        result = client_get_handle => {
            error!("Client get handler finished: {:?}", result);
        }
        result = client_update_handle => {
            error!("Client update handler finished: {:?}", result);
        }
        result = client_delete_handle => {
            error!("Client delete handler finished: {:?}", result);
        }
        result = courier_create_handle => {
            error!("Courier create handler finished: {:?}", result);
        }
        result = courier_list_handle => {
            error!("Courier list handler finished: {:?}", result);
        }
        result = courier_get_handle => {
            error!("Courier get handler finished: {:?}", result);
        }
        result = courier_update_handle => {
            error!("Courier update handler finished: {:?}", result);
        }
        result = courier_delete_handle => {
            error!("Courier delete handler finished: {:?}", result);
        }
        result = vehicle_create_handle => {
            error!("Vehicle create handler finished: {:?}", result);
        }
        result = vehicle_list_handle => {
            error!("Vehicle list handler finished: {:?}", result);
        }
        result = vehicle_get_handle => {
            error!("Vehicle get handler finished: {:?}", result);
        }
        result = vehicle_update_handle => {
            error!("Vehicle update handler finished: {:?}", result);
        }
        result = vehicle_delete_handle => {
            error!("Vehicle delete handler finished: {:?}", result);
        }
        result = route_create_handle => {
            error!("Route create handler finished: {:?}", result);
        }
        result = route_list_handle => {
            error!("Route list handler finished: {:?}", result);
        }
        result = route_get_handle => {
            error!("Route get handler finished: {:?}", result);
        }
        result = route_update_handle => {
            error!("Route update handler finished: {:?}", result);
        }
        result = route_delete_handle => {
            error!("Route delete handler finished: {:?}", result);
        }
        result = route_estimate_handle => {
            error!("Route estimate handler finished: {:?}", result);
        }
        result = delivery_create_handle => {
            error!("Delivery create handler finished: {:?}", result);
        }
        result = delivery_list_handle => {
            error!("Delivery list handler finished: {:?}", result);
        }
        result = delivery_get_handle => {
            error!("Delivery get handler finished: {:?}", result);
        }
        result = delivery_by_route_handle => {
            error!("Delivery by_route handler finished: {:?}", result);
        }
        result = delivery_update_handle => {
            error!("Delivery update handler finished: {:?}", result);
        }
        result = delivery_status_handle => {
            error!("Delivery status handler finished: {:?}", result);
        }
        result = delivery_delete_handle => {
            error!("Delivery delete handler finished: {:?}", result);
        }
        result = package_create_handle => {
            error!("Package create handler finished: {:?}", result);
        }
        result = package_list_handle => {
            error!("Package list handler finished: {:?}", result);
        }
        result = package_get_handle => {
            error!("Package get handler finished: {:?}", result);
        }
        result = package_by_delivery_handle => {
            error!("Package by_delivery handler finished: {:?}", result);
        }
        result = package_update_handle => {
            error!("Package update handler finished: {:?}", result);
        }
        result = package_delete_handle => {
            error!("Package delete handler finished: {:?}", result);
        }
        result = tracking_create_handle => {
            error!("Tracking create handler finished: {:?}", result);
        }
        result = tracking_list_handle => {
            error!("Tracking list handler finished: {:?}", result);
        }
        result = tracking_get_handle => {
            error!("Tracking get handler finished: {:?}", result);
        }
        result = tracking_by_delivery_handle => {
            error!("Tracking by_delivery handler finished: {:?}", result);
        }
        result = proof_upload_handle => {
            error!("Proof upload handler finished: {:?}", result);
        }
        result = proof_get_handle => {
            error!("Proof get handler finished: {:?}", result);
        }
        result = proof_by_delivery_handle => {
            error!("Proof by_delivery handler finished: {:?}", result);
        }
        result = proof_delete_handle => {
            error!("Proof delete handler finished: {:?}", result);
        }
        result = user_create_handle => {
            error!("User create handler finished: {:?}", result);
        }
        result = user_list_handle => {
            error!("User list handler finished: {:?}", result);
        }
        result = user_get_handle => {
            error!("User get handler finished: {:?}", result);
        }
        result = user_update_handle => {
            error!("User update handler finished: {:?}", result);
        }
        result = user_delete_handle => {
            error!("User delete handler finished: {:?}", result);
        }
    }

    Ok(())
}
