//! Authentication utilities: JWT token management and password hashing

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::defaults::TOKEN_TTL_SECS;
use crate::types::{Request, UserRole};

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User email
    pub email: String,
    /// User role (super_admin, admin, courier)
    pub role: String,
    /// Issued at (unix timestamp)
    pub iat: usize,
    /// Expiration (unix timestamp)
    pub exp: usize,
}

/// Authentication result from extract_auth
#[derive(Debug, Clone)]
pub struct AuthInfo {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl AuthInfo {
    /// Ensure the caller holds one of the allowed roles.
    pub fn require_role(&self, allowed: &[UserRole]) -> Result<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(anyhow!("Role '{}' is not permitted", self.role.as_str()))
        }
    }
}

/// Generate a JWT access token
pub fn generate_token(user_id: Uuid, email: &str, role: UserRole, secret: &str) -> Result<String> {
    let now = chrono::Utc::now().timestamp() as usize;
    let exp = now + TOKEN_TTL_SECS;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: role.as_str().to_string(),
        iat: now,
        exp,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Validate a JWT token and return claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| anyhow!("Invalid token: {}", e))?;

    Ok(token_data.claims)
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| anyhow!("Invalid password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Extract authentication info from a NATS request envelope.
///
/// The JWT travels in the `token` field; a missing or invalid token is an
/// authentication failure.
pub fn extract_auth<T>(request: &Request<T>, jwt_secret: &str) -> Result<AuthInfo> {
    let token = request
        .token
        .as_ref()
        .ok_or_else(|| anyhow!("No authentication provided; JWT token is required"))?;

    let claims = validate_token(token, jwt_secret)?;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|e| anyhow!("Invalid user_id in token: {}", e))?;
    let role = UserRole::parse(&claims.role)
        .ok_or_else(|| anyhow!("Unknown role in token: {}", claims.role))?;

    Ok(AuthInfo { user_id, role })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Request;
    use chrono::Utc;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-at-least-32-bytes-long";

    // ---- Password hashing tests ----

    #[test]
    fn test_hash_password_produces_valid_hash() {
        let hash = hash_password("my-secure-password").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(hash.len() > 50);
    }

    #[test]
    fn test_hash_password_different_each_time() {
        let hash1 = hash_password("same-password").unwrap();
        let hash2 = hash_password("same-password").unwrap();
        assert_ne!(hash1, hash2, "Hashes should differ due to random salt");
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = hash_password("correct-password").unwrap();
        assert!(verify_password("correct-password", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password("correct-password").unwrap();
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        let result = verify_password("any-password", "not-a-valid-hash");
        assert!(result.is_err());
    }

    // ---- JWT token tests ----

    #[test]
    fn test_generate_and_validate_token() {
        let user_id = Uuid::new_v4();
        let token =
            generate_token(user_id, "test@example.com", UserRole::Admin, TEST_SECRET).unwrap();

        let claims = validate_token(&token, TEST_SECRET).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp, claims.iat + TOKEN_TTL_SECS);
    }

    #[test]
    fn test_validate_token_wrong_secret() {
        let user_id = Uuid::new_v4();
        let token =
            generate_token(user_id, "test@example.com", UserRole::Courier, TEST_SECRET).unwrap();

        let result = validate_token(&token, "wrong-secret");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_token_malformed() {
        let result = validate_token("not.a.valid.token", TEST_SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn test_token_contains_correct_role() {
        let user_id = Uuid::new_v4();

        for role in [UserRole::SuperAdmin, UserRole::Admin, UserRole::Courier] {
            let token = generate_token(user_id, "test@example.com", role, TEST_SECRET).unwrap();
            let claims = validate_token(&token, TEST_SECRET).unwrap();
            assert_eq!(claims.role, role.as_str());
        }
    }

    // ---- extract_auth tests ----

    #[test]
    fn test_extract_auth_with_valid_token() {
        let user_id = Uuid::new_v4();
        let token =
            generate_token(user_id, "test@example.com", UserRole::SuperAdmin, TEST_SECRET).unwrap();

        let request = Request::with_token(token, serde_json::Value::Null);
        let auth = extract_auth(&request, TEST_SECRET).unwrap();

        assert_eq!(auth.user_id, user_id);
        assert_eq!(auth.role, UserRole::SuperAdmin);
    }

    #[test]
    fn test_extract_auth_no_token_fails() {
        let request = Request {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            token: None,
            payload: serde_json::Value::Null,
        };
        let result = extract_auth(&request, TEST_SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_auth_invalid_token_fails() {
        let request = Request::with_token("bad-token".to_string(), serde_json::Value::Null);
        let result = extract_auth(&request, TEST_SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn test_require_role_allows_listed_roles() {
        let auth = AuthInfo {
            user_id: Uuid::new_v4(),
            role: UserRole::Admin,
        };
        assert!(auth
            .require_role(&[UserRole::SuperAdmin, UserRole::Admin])
            .is_ok());
        assert!(auth.require_role(&[UserRole::SuperAdmin]).is_err());
    }
}
