// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer token when `security.require_auth`)

pub mod protected;
pub mod public;

use crate::error::ApiError;

/// Parse a numeric path id, naming the resource in the error
pub(crate) fn parse_id(raw: &str, resource: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::bad_request(format!("Invalid {} ID format", resource)))
}
