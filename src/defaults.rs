/// Dispatch depot used when DEPOT_LAT/DEPOT_LNG are not configured.
pub const DEFAULT_DEPOT_LAT: f64 = 20.9168;
pub const DEFAULT_DEPOT_LNG: f64 = -101.3508;

/// Label the estimator emits for the depot stop.
pub const DEPOT_NAME: &str = "BASE";
pub const DEPOT_ADDRESS: &str = "Centro";

/// Access token lifetime in seconds (2 hours).
pub const TOKEN_TTL_SECS: usize = 2 * 60 * 60;

pub const DEFAULT_PAGE_LIMIT: i64 = 100;
