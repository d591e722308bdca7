mod password_token_request;
pub(crate) use password_token_request::*;

mod secondary_token_request;
pub(crate) use secondary_token_request::*;

mod refresh_token_request;
pub(crate) use refresh_token_request::*;

use comdirect_api_base::{exchange, Configuration};
use tokio_util::sync::CancellationToken;

use crate::{auth::AccessToken, ApiError};

pub(crate) const TOKEN_PATH: &str = "/oauth/token";

pub(crate) async fn send_token_request(
    config: &Configuration,
    body: impl serde::Serialize,
    cancel: &CancellationToken,
) -> Result<AccessToken, ApiError> {
    let mut request = config
        .client
        .post(config.url(TOKEN_PATH))
        .header(
            reqwest::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .header(reqwest::header::ACCEPT, "application/json");

    if let Some(ref user_agent) = config.user_agent {
        request = request.header(reqwest::header::USER_AGENT, user_agent.clone());
    }

    let body = serde_qs::to_string(&body).map_err(|e| ApiError::Other(e.to_string()))?;

    Ok(exchange(request.body(body), cancel).await?.value)
}
