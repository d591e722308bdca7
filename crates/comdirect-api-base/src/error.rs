//! Error types for API operations.

/// An error returned by the API client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Server returned an HTTP error response.
    #[error("API error {status}: {content}")]
    Response {
        /// HTTP status code of the response.
        status: reqwest::StatusCode,
        /// Raw response body content.
        content: String,
    },

    /// Could not reach the server (DNS failure, TLS error, connection refused, etc.)
    #[error("not connected: {0}")]
    NotConnected(String),

    /// The request did not complete within the configured HTTP timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The response body could not be decoded into the expected type.
    #[error("could not decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The caller cancelled the operation before the response arrived.
    #[error("request was cancelled")]
    Cancelled,

    /// Catch-all for other errors (serialization, IO, etc.)
    #[error("other error: {0}")]
    Other(String),
}

impl Error {
    /// HTTP status of an error response, if the server answered at all.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Error::Response { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return Error::Response {
                status,
                // Can't get the response body from a reqwest::Error, so just leave it empty.
                content: String::new(),
            };
        }

        if e.is_timeout() {
            return Error::Timeout(e.to_string());
        }

        // Consider connection errors and errors sending requests as "not connected",
        // since they all indicate a failure to communicate with the server.
        if e.is_connect() || e.is_request() {
            return Error::NotConnected(e.to_string());
        }

        Error::Other(e.to_string())
    }
}

impl From<reqwest_middleware::Error> for Error {
    fn from(e: reqwest_middleware::Error) -> Self {
        match e {
            reqwest_middleware::Error::Reqwest(e) => e.into(),
            reqwest_middleware::Error::Middleware(e) => Error::Other(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Other(e.to_string())
    }
}
