//! Errors that can occur when using this crate

use thiserror::Error;

/// Errors from performing network requests.
pub use comdirect_api_base::Error as ApiError;

/// Client is not authenticated or the session has expired.
#[derive(Debug, Error)]
#[error("The client is not authenticated or the session has expired")]
pub struct NotAuthenticatedError;
