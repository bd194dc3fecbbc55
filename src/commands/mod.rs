//! JSON command surface for a UI shell
//!
//! Each command takes a JSON request string and returns a JSON response
//! string, so a desktop or web front end can call the engine without
//! sharing Rust types.

pub mod analysis;

use serde::Serialize;
use thiserror::Error;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Error, Debug, Serialize, PartialEq)]
pub enum CommandError {
  #[error("Invalid payload: {0}")]
  InvalidPayload(String),

  #[error("Serialization error: {0}")]
  Serialization(String),
}

pub(crate) fn parse_request<'a, T>(request_json: &'a str) -> Result<T, CommandError>
where
  T: serde::Deserialize<'a>,
{
  serde_json::from_str(request_json).map_err(|e| CommandError::InvalidPayload(e.to_string()))
}

pub(crate) fn to_response<T: Serialize>(value: &T) -> Result<String, CommandError> {
  serde_json::to_string(value).map_err(|e| CommandError::Serialization(e.to_string()))
}
