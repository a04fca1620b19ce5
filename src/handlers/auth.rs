//! Authentication message handlers.
//!
//! Login is throttled per email through the shared rate limiter and replies
//! with a JWT plus the public user profile. Failed logins always answer
//! INVALID_CREDENTIALS so the response does not reveal whether the email
//! exists.

use std::sync::Arc;

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::auth;
use crate::db::queries;
use crate::services::rate_limiter::RateLimiter;
use crate::types::{AuthResponse, ErrorResponse, Request, SuccessResponse, UserPublic};

/// Login request payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Password change request payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Password change acknowledgement
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordResponse {
    pub changed: bool,
}

/// Minimum accepted password length
const MIN_PASSWORD_LEN: usize = 8;

/// Validate a password change payload before touching the database.
fn validate_new_password(payload: &ChangePasswordRequest) -> Result<(), String> {
    if payload.new_password != payload.confirm_password {
        return Err("New password confirmation does not match".to_string());
    }
    if payload.new_password.len() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }
    Ok(())
}

/// Handle auth.login messages
pub async fn handle_login(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
    limiter: Arc<RateLimiter>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received auth.login message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<LoginRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let email = request.payload.email.trim().to_lowercase();

        if !limiter.check_and_record(&email) {
            warn!("Login rate limited for {}", email);
            let error = ErrorResponse::new(
                request.id,
                "RATE_LIMITED",
                "Too many login attempts, try again later",
            );
            let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            continue;
        }

        let user = match queries::user::get_user_by_email(&pool, &email).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                let error =
                    ErrorResponse::new(request.id, "INVALID_CREDENTIALS", "Invalid credentials");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
            Err(e) => {
                error!("Failed to look up user: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        match auth::verify_password(&request.payload.password, &user.password_hash) {
            Ok(true) => {}
            Ok(false) | Err(_) => {
                let error =
                    ErrorResponse::new(request.id, "INVALID_CREDENTIALS", "Invalid credentials");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        }

        if !user.is_active {
            let error = ErrorResponse::new(request.id, "FORBIDDEN", "Account is disabled");
            let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            continue;
        }

        let token = match auth::generate_token(user.id, &user.email, user.role, &secret) {
            Ok(token) => token,
            Err(e) => {
                error!("Failed to generate token: {}", e);
                let error = ErrorResponse::new(request.id, "INTERNAL_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        info!("User logged in: {}", user.email);
        let response = SuccessResponse::new(
            request.id,
            AuthResponse {
                token,
                user: UserPublic::from(user),
            },
        );
        let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
    }

    Ok(())
}

/// Handle auth.verify messages.
///
/// Validates the token in the envelope and returns the caller's profile.
pub async fn handle_verify(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received auth.verify message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<serde_json::Value> = match serde_json::from_slice(&msg.payload) {
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

        match queries::user::get_user(&pool, auth_info.user_id).await {
            Ok(Some(user)) if user.is_active => {
                let response = SuccessResponse::new(request.id, UserPublic::from(user));
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                debug!("Verified token for {}", response.payload.email);
            }
            Ok(Some(_)) => {
                let error = ErrorResponse::new(request.id, "FORBIDDEN", "Account is disabled");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
            Ok(None) => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", "User no longer exists");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
            Err(e) => {
                error!("Failed to load user: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle auth.change_password messages
pub async fn handle_change_password(
    client: Client,
    mut subscriber: Subscriber,
    pool: PgPool,
    secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received auth.change_password message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<ChangePasswordRequest> = match serde_json::from_slice(&msg.payload) {
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

        if let Err(reason) = validate_new_password(&request.payload) {
            let error = ErrorResponse::new(request.id, "VALIDATION_ERROR", reason);
            let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            continue;
        }

        let user = match queries::user::get_user(&pool, auth_info.user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                let error = ErrorResponse::new(request.id, "UNAUTHORIZED", "User no longer exists");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
            Err(e) => {
                error!("Failed to load user: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        match auth::verify_password(&request.payload.current_password, &user.password_hash) {
            Ok(true) => {}
            Ok(false) | Err(_) => {
                let error = ErrorResponse::new(
                    request.id,
                    "INVALID_CREDENTIALS",
                    "Current password is incorrect",
                );
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        }

        let password_hash = match auth::hash_password(&request.payload.new_password) {
            Ok(hash) => hash,
            Err(e) => {
                error!("Failed to hash password: {}", e);
                let error = ErrorResponse::new(request.id, "INTERNAL_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        match queries::user::set_password_hash(&pool, user.id, &password_hash).await {
            Ok(true) => {
                info!("Password changed for {}", user.email);
                let response =
                    SuccessResponse::new(request.id, ChangePasswordResponse { changed: true });
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
            }
            Ok(false) => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", "User not found");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
            Err(e) => {
                error!("Failed to update password: {}", e);
                let error = ErrorResponse::new(request.id, "DATABASE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change_request(current: &str, new: &str, confirm: &str) -> ChangePasswordRequest {
        ChangePasswordRequest {
            current_password: current.to_string(),
            new_password: new.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_login_request_parses_camel_case() {
        let json = r#"{"email":"ana@example.com","password":"hunter22"}"#;
        let req: LoginRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.email, "ana@example.com");
        assert_eq!(req.password, "hunter22");
    }

    #[test]
    fn test_change_password_request_parses_camel_case() {
        let json = r#"{
            "currentPassword": "old-secret",
            "newPassword": "new-secret-1",
            "confirmPassword": "new-secret-1"
        }"#;
        let req: ChangePasswordRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.current_password, "old-secret");
        assert_eq!(req.new_password, "new-secret-1");
        assert_eq!(req.confirm_password, "new-secret-1");
    }

    #[test]
    fn test_change_password_request_requires_confirmation() {
        let json = r#"{"currentPassword":"a","newPassword":"b"}"#;
        assert!(serde_json::from_str::<ChangePasswordRequest>(json).is_err());
    }

    #[test]
    fn test_validate_new_password_accepts_matching_pair() {
        let req = change_request("old-secret", "new-secret-1", "new-secret-1");
        assert!(validate_new_password(&req).is_ok());
    }

    #[test]
    fn test_validate_new_password_rejects_mismatched_confirmation() {
        let req = change_request("old-secret", "new-secret-1", "new-secret-2");
        let err = validate_new_password(&req).unwrap_err();
        assert!(err.contains("confirmation"));
    }

    #[test]
    fn test_validate_new_password_rejects_short_password() {
        let req = change_request("old-secret", "short", "short");
        let err = validate_new_password(&req).unwrap_err();
        assert!(err.contains("at least"));
    }
}
