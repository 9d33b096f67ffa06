//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod ai;
pub mod audit;
pub mod auth;
pub mod records;

// Re-export all handlers for use in router
pub use ai::*;
pub use audit::*;
pub use auth::*;
pub use records::*;

use axum::extract::Request;
use axum::http::HeaderMap;
use serde::de::DeserializeOwned;

use crate::{AppError, MAX_BODY_SIZE};

/// Split a request into its headers and a JSON body
pub(crate) async fn read_json<T: DeserializeOwned>(
    request: Request,
) -> Result<(HeaderMap, T), AppError> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_BODY_SIZE)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body"))?;
    let value = serde_json::from_slice(&bytes).map_err(|_| AppError::bad_request("Invalid JSON"))?;
    Ok((parts.headers, value))
}
