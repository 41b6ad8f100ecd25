//! Parsing helpers shared by the feature handlers.

use std::str::FromStr;

use super::error::ApiError;

/// Parses a numeric path id, naming the parameter on failure.
pub fn parse_id<T: FromStr>(raw: &str, name: &str) -> Result<T, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid {name}: '{raw}'")))
}
