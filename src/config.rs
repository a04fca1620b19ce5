//! Configuration management

use anyhow::{self, Context, Result};

use crate::defaults;
use crate::types::Coordinates;

/// Which route estimator implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimatorKind {
    /// Deterministic latitude sort with synthetic costs (default)
    LatitudeSort,
    /// Greedy nearest-neighbor over haversine distance
    NearestNeighbor,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// NATS server URL
    pub nats_url: String,

    /// PostgreSQL connection string
    pub database_url: String,

    /// JWT secret key for token signing/validation
    pub jwt_secret: String,

    /// Dispatch depot the estimator measures from
    pub depot: Coordinates,

    /// Route estimator selection
    pub estimator: EstimatorKind,

    /// Directory proof photos are written to
    pub uploads_dir: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let nats_url = std::env::var("NATS_URL")
            .unwrap_or_else(|_| "nats://localhost:4222".to_string());

        let database_url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL must be set")?;

        let jwt_secret = std::env::var("JWT_SECRET")
            .context("JWT_SECRET must be set; generate one with: openssl rand -base64 48")?;

        if jwt_secret.len() < 32 {
            anyhow::bail!(
                "JWT_SECRET must be at least 32 bytes (current: {} bytes). Generate one with: openssl rand -base64 48",
                jwt_secret.len()
            );
        }

        let depot = Coordinates {
            lat: parse_env_f64("DEPOT_LAT", defaults::DEFAULT_DEPOT_LAT)?,
            lng: parse_env_f64("DEPOT_LNG", defaults::DEFAULT_DEPOT_LNG)?,
        };

        let estimator = match std::env::var("ROUTE_ESTIMATOR").as_deref() {
            Err(_) | Ok("latitude_sort") => EstimatorKind::LatitudeSort,
            Ok("nearest_neighbor") => EstimatorKind::NearestNeighbor,
            Ok(other) => anyhow::bail!(
                "ROUTE_ESTIMATOR must be 'latitude_sort' or 'nearest_neighbor' (got '{}')",
                other
            ),
        };

        let uploads_dir = std::env::var("UPLOADS_DIR")
            .unwrap_or_else(|_| "uploads".to_string());

        Ok(Self {
            nats_url,
            database_url,
            jwt_secret,
            depot,
            estimator,
            uploads_dir,
        })
    }
}

fn parse_env_f64(name: &str, default: f64) -> Result<f64> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<f64>()
            .with_context(|| format!("{} must be a decimal number (got '{}')", name, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_f64_uses_default_when_unset() {
        std::env::remove_var("TEST_DEPOT_COORD_UNSET");
        let value = parse_env_f64("TEST_DEPOT_COORD_UNSET", 20.9168).unwrap();
        assert_eq!(value, 20.9168);
    }

    #[test]
    fn test_parse_env_f64_reads_override() {
        std::env::set_var("TEST_DEPOT_COORD_SET", "-101.5");
        let value = parse_env_f64("TEST_DEPOT_COORD_SET", 0.0).unwrap();
        assert_eq!(value, -101.5);
        std::env::remove_var("TEST_DEPOT_COORD_SET");
    }

    #[test]
    fn test_parse_env_f64_rejects_garbage() {
        std::env::set_var("TEST_DEPOT_COORD_BAD", "north-ish");
        assert!(parse_env_f64("TEST_DEPOT_COORD_BAD", 0.0).is_err());
        std::env::remove_var("TEST_DEPOT_COORD_BAD");
    }
}
