use std::sync::RwLock;

use comdirect_api_base::Configuration;
use reqwest::{header, Method};
use reqwest_middleware::RequestBuilder;
use tracing::debug;

use crate::{
    auth::{ClientCredentials, Credential, RequestIdentity, REQUEST_INFO_HEADER},
    NotAuthenticatedError,
};

#[allow(missing_docs)]
pub struct InternalClient {
    pub(crate) api_configuration: Configuration,
    pub(crate) credential: RwLock<Option<Credential>>,
    pub(crate) client_credentials: RwLock<Option<ClientCredentials>>,

    /// Held while the token is being refreshed or revoked.
    pub(crate) token_lock: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for InternalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InternalClient")
            .field("api_configuration", &self.api_configuration.base_path)
            .field("credential", &self.credential)
            .field("client_credentials", &self.client_credentials)
            .finish_non_exhaustive()
    }
}

impl InternalClient {
    #[allow(missing_docs)]
    pub fn get_api_configuration(&self) -> &Configuration {
        &self.api_configuration
    }

    /// A copy of the current credential, if any.
    pub fn get_credential(&self) -> Option<Credential> {
        self.credential
            .read()
            .expect("RwLock is not poisoned")
            .clone()
    }

    pub(crate) fn set_credential(&self, credential: Option<Credential>) {
        debug!(present = credential.is_some(), "setting credential.");
        *self.credential.write().expect("RwLock is not poisoned") = credential;
    }

    #[allow(missing_docs)]
    pub fn get_client_credentials(&self) -> Option<ClientCredentials> {
        self.client_credentials
            .read()
            .expect("RwLock is not poisoned")
            .clone()
    }

    pub(crate) fn set_client_credentials(&self, client_credentials: Option<ClientCredentials>) {
        *self
            .client_credentials
            .write()
            .expect("RwLock is not poisoned") = client_credentials;
    }

    /// The current credential if it can be used for a data request: present, with a non-empty
    /// access token and not expired.
    pub fn get_valid_credential(&self) -> Result<Credential, NotAuthenticatedError> {
        match self.get_credential() {
            Some(credential)
                if !credential.access_token().access_token.is_empty()
                    && !credential.is_expired() =>
            {
                Ok(credential)
            }
            _ => Err(NotAuthenticatedError),
        }
    }

    /// Start a JSON request against `path` carrying the bearer token and a fresh request
    /// identity for the credential's session.
    ///
    /// Fails without touching the network when there is no usable credential.
    pub fn authenticated_request(
        &self,
        method: Method,
        path: &str,
    ) -> Result<RequestBuilder, NotAuthenticatedError> {
        self.authenticated_request_accepting(method, path, "application/json")
    }

    /// Like [`authenticated_request`](Self::authenticated_request), for responses that are not
    /// JSON.
    pub fn authenticated_request_accepting(
        &self,
        method: Method,
        path: &str,
        accept: &str,
    ) -> Result<RequestBuilder, NotAuthenticatedError> {
        let credential = self.get_valid_credential()?;
        let identity = RequestIdentity::for_session(credential.session_id());
        let config = &self.api_configuration;

        Ok(config
            .client
            .request(method, config.url(path))
            .header(header::ACCEPT, accept)
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(&credential.access_token().access_token)
            .header(REQUEST_INFO_HEADER, identity.header_value()))
    }
}
