use comdirect_api_base::Configuration;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::{
    auth::{AccessToken, AuthOptions},
    ApiError,
};

#[derive(Serialize)]
pub(crate) struct PasswordTokenRequest<'a> {
    username: &'a str,
    password: &'a str,
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
}

impl<'a> PasswordTokenRequest<'a> {
    pub(crate) fn new(options: &'a AuthOptions) -> Self {
        Self {
            username: &options.username,
            password: &options.password,
            grant_type: "password",
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
