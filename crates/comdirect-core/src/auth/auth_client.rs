use chrono::Utc;
use comdirect_api_base::send;
use reqwest::{header, StatusCode};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{
    api::request::{RefreshTokenRequest, TOKEN_PATH},
    AuthOptions, Authenticator, ChallengeConfirmation, ClientCredentials, Credential, LoginError,
};
use crate::{ApiError, Client, NotAuthenticatedError};

/// Input of [`AuthClient::login`].
#[derive(Debug, Clone)]
pub struct LoginRequest {
    #[allow(missing_docs)]
    pub options: AuthOptions,
    /// How to wait for the TAN challenge to be confirmed.
    pub confirmation: ChallengeConfirmation,
}

/// Errors refreshing or revoking the token of an existing credential.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum TokenError {
    #[error(transparent)]
    NotAuthenticated(#[from] NotAuthenticatedError),
    #[error("Client id and secret are required to refresh the token")]
    MissingClientCredentials,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Token revocation failed with status {0}")]
    RevocationFailed(StatusCode),
}

/// Subclient containing auth functionality.
pub struct AuthClient {
    pub(crate) client: Client,
}

impl AuthClient {
    /// Run the login flow and store the resulting credential in the client.
    pub async fn login(
        &self,
        request: &LoginRequest,
        cancel: &CancellationToken,
    ) -> Result<Credential, LoginError> {
        let internal = &self.client.internal;
        let _guard = internal.token_lock.lock().await;

        let credential = Authenticator::new(&internal.api_configuration, request.confirmation)
            .authenticate(&request.options, cancel)
            .await?;

        internal.set_credential(Some(credential.clone()));
        internal.set_client_credentials(Some(request.options.client_credentials()));

        Ok(credential)
    }

    /// Replace the access token using the refresh token grant. Works on expired credentials.
    pub async fn refresh(&self, cancel: &CancellationToken) -> Result<Credential, TokenError> {
        let internal = &self.client.internal;
        let _guard = internal.token_lock.lock().await;

        let mut credential = internal.get_credential().ok_or(NotAuthenticatedError)?;
        if credential.access_token().refresh_token.is_empty() {
            return Err(NotAuthenticatedError.into());
        }
        let client_credentials = internal
            .get_client_credentials()
            .ok_or(TokenError::MissingClientCredentials)?;

        let token = RefreshTokenRequest::new(
            &credential.access_token().refresh_token,
            &client_credentials,
        )
        .send(&internal.api_configuration, cancel)
        .await?;

        credential.renew(token, Utc::now());
        internal.set_credential(Some(credential.clone()));
        debug!(expires_at = %credential.expires_at(), "token refreshed");

        Ok(credential)
    }

    /// Revoke the access token. Only a `204 No Content` answer counts as success, in which case
    /// the credential is removed from the client.
    pub async fn revoke(&self, cancel: &CancellationToken) -> Result<(), TokenError> {
        let internal = &self.client.internal;
        let _guard = internal.token_lock.lock().await;

        let credential = internal.get_credential().ok_or(NotAuthenticatedError)?;
        let config = &internal.api_configuration;

        let request = config
            .client
            .delete(config.url(TOKEN_PATH))
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .bearer_auth(&credential.access_token().access_token);

        let status = send(request, cancel).await?.status();
        if status != StatusCode::NO_CONTENT {
            return Err(TokenError::RevocationFailed(status));
        }

        internal.set_credential(None);
        info!("token revoked");

        Ok(())
    }

    /// Use a credential obtained elsewhere, e.g. restored from disk.
    pub fn set_credential(
        &self,
        credential: Credential,
        client_credentials: Option<ClientCredentials>,
    ) {
        let internal = &self.client.internal;
        internal.set_credential(Some(credential));
        if client_credentials.is_some() {
            internal.set_client_credentials(client_credentials);
        }
    }

    /// The current credential, expired or not.
    pub fn credential(&self) -> Option<Credential> {
        self.client.internal.get_credential()
    }

    /// Whether the client holds a credential usable for data requests.
    pub fn is_authenticated(&self) -> bool {
        self.client.internal.get_valid_credential().is_ok()
    }
}

impl Client {
    #[allow(missing_docs)]
    pub fn auth(&self) -> AuthClient {
        AuthClient {
            client: self.clone(),
        }
    }
}
