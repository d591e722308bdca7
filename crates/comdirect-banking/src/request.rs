use comdirect_api_base::exchange;
use comdirect_core::Client;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::BankingError;

/// GET `path` with the client's credential and decode the JSON response.
pub(crate) async fn get<T: DeserializeOwned>(
    client: &Client,
    path: &str,
    query: &[(&str, String)],
    cancel: &CancellationToken,
) -> Result<T, BankingError> {
    let request = client
        .internal
        .authenticated_request(Method::GET, path)?
        .query(query);

    Ok(exchange(request, cancel).await?.value)
}

/// Percent-encode a path segment supplied by the caller.
pub(crate) fn segment(value: &str) -> String {
    comdirect_api_base::urlencode(value)
}
