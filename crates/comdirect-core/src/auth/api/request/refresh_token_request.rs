use comdirect_api_base::Configuration;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::{
    auth::{AccessToken, ClientCredentials},
    ApiError,
};

#[derive(Serialize)]
pub(crate) struct RefreshTokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
    refresh_token: &'a str,
}

impl<'a> RefreshTokenRequest<'a> {
    pub(crate) fn new(refresh_token: &'a str, client_credentials: &'a ClientCredentials) -> Self {
        Self {
            grant_type: "refresh_token",
            client_id: &client_credentials.client_id,
            client_secret: &client_credentials.client_secret,
            refresh_token,
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
