//! Cancellable request/response exchange.

use reqwest::{header::HeaderMap, StatusCode};
use reqwest_middleware::RequestBuilder;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::Error;

/// A decoded response together with the parts of the HTTP response that callers may need to
/// inspect, such as headers carrying structured metadata.
#[derive(Debug)]
pub struct Exchange<T> {
    /// HTTP status of the response.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Decoded response body.
    pub value: T,
}

/// Send a request, aborting as soon as `cancel` is triggered.
///
/// The HTTP status is not interpreted.
pub async fn send(
    request: RequestBuilder,
    cancel: &CancellationToken,
) -> Result<reqwest::Response, Error> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        response = request.send() => Ok(response?),
    }
}

/// Send a request and decode the JSON body of a successful response into `T`.
///
/// Non-success statuses are returned as [`Error::Response`] with the raw body, bodies that do
/// not match `T` as [`Error::Decode`].
pub async fn exchange<T: DeserializeOwned>(
    request: RequestBuilder,
    cancel: &CancellationToken,
) -> Result<Exchange<T>, Error> {
    let response = send(request, cancel).await?;
    let status = response.status();
    let headers = response.headers().clone();

    let content = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(Error::Cancelled),
        text = response.text() => text?,
    };

    if !status.is_success() {
        return Err(Error::Response { status, content });
    }

    let value = serde_json::from_str(&content)?;

    Ok(Exchange {
        status,
        headers,
        value,
    })
}

/// Send a request whose response body is irrelevant, failing on non-success statuses.
pub async fn exchange_empty(
    request: RequestBuilder,
    cancel: &CancellationToken,
) -> Result<Exchange<()>, Error> {
    let response = send(request, cancel).await?;
    let status = response.status();
    let headers = response.headers().clone();

    if !status.is_success() {
        return Err(error_response(response, cancel).await);
    }

    Ok(Exchange {
        status,
        headers,
        value: (),
    })
}

/// Send a request and return the raw body of a successful response.
pub async fn exchange_bytes(
    request: RequestBuilder,
    cancel: &CancellationToken,
) -> Result<Exchange<Vec<u8>>, Error> {
    let response = send(request, cancel).await?;
    let status = response.status();
    let headers = response.headers().clone();

    if !status.is_success() {
        return Err(error_response(response, cancel).await);
    }

    let body = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(Error::Cancelled),
        bytes = response.bytes() => bytes?,
    };

    Ok(Exchange {
        status,
        headers,
        value: body.to_vec(),
    })
}

/// The error for a non-success response, carrying its body when it can be read.
async fn error_response(response: reqwest::Response, cancel: &CancellationToken) -> Error {
    let status = response.status();
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Error::Cancelled,
        text = response.text() => Error::Response {
            status,
            content: text.unwrap_or_default(),
        },
    }
}
