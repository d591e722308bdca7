use comdirect_api_base::Configuration;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::{
    auth::{AccessToken, AuthOptions},
    ApiError,
};

/// Exchanges the session-scoped token for a banking token once the session is activated.
#[derive(Serialize)]
pub(crate) struct SecondaryTokenRequest<'a> {
    token: &'a str,
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
}

impl<'a> SecondaryTokenRequest<'a> {
    pub(crate) fn new(token: &'a str, options: &'a AuthOptions) -> Self {
        Self {
            token,
            grant_type: "cd_secondary",
            client_id: &options.client_id,
            client_secret: &options.client_secret,
        }
    }

    pub(crate) async fn send(
        &self,
        config: &Configuration,
        cancel: &CancellationToken,
    ) -> Result<AccessToken, ApiError> {
        super::send_token_request(config, self, cancel).await
    }
}
