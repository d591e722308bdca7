use std::{
    sync::{Arc, RwLock},
    time::Duration,
};

use comdirect_api_base::Configuration;
use reqwest::header::{self, HeaderValue};

use super::internal::InternalClient;
use crate::{
    auth::{ClientCredentials, Credential},
    client::client_settings::ClientSettings,
    http::TraceMiddleware,
};

/// The main struct to interact with the comdirect API.
#[derive(Debug, Clone)]
pub struct Client {
    // Important: `Clone` must hand out another reference to the same instance, so any mutable
    // state lives behind the `Arc` in [`InternalClient`].
    #[doc(hidden)]
    pub internal: Arc<InternalClient>,
}

impl Client {
    /// Create a new client without a credential.
    pub fn new(settings: Option<ClientSettings>) -> Self {
        Self::new_internal(settings, None, None)
    }

    /// Create a new client that resumes a previously obtained credential, for example one
    /// restored from disk. `client_credentials` are required for [`refresh`] to work.
    ///
    /// [`refresh`]: crate::auth::AuthClient::refresh
    pub fn with_credential(
        settings: Option<ClientSettings>,
        credential: Credential,
        client_credentials: Option<ClientCredentials>,
    ) -> Self {
        Self::new_internal(settings, Some(credential), client_credentials)
    }

    fn new_internal(
        settings_input: Option<ClientSettings>,
        credential: Option<Credential>,
        client_credentials: Option<ClientCredentials>,
    ) -> Self {
        let settings = settings_input.unwrap_or_default();

        let headers = build_default_headers(&settings);

        let http_client = new_http_client_builder(&settings)
            .default_headers(headers)
            .build()
            .expect("HTTP Client build should not fail");

        let http_client = reqwest_middleware::ClientBuilder::new(http_client)
            .with(TraceMiddleware)
            .build();

        let api = Configuration {
            base_path: settings.api_url,
            user_agent: Some(settings.user_agent),
            client: http_client,
        };

        Self {
            internal: Arc::new(InternalClient {
                api_configuration: api,
                credential: RwLock::new(credential),
                client_credentials: RwLock::new(client_credentials),
                token_lock: tokio::sync::Mutex::new(()),
            }),
        }
    }
}

fn new_http_client_builder(settings: &ClientSettings) -> reqwest::ClientBuilder {
    #[allow(unused_mut)]
    let mut client_builder =
        reqwest::Client::builder().timeout(Duration::from_secs(settings.timeout_secs));

    // Enforce HTTPS for all requests in non-debug builds
    #[cfg(not(debug_assertions))]
    {
        client_builder = client_builder.https_only(true);
    }

    client_builder
}

/// Build default headers for the comdirect HttpClient
fn build_default_headers(settings: &ClientSettings) -> header::HeaderMap {
    let mut headers = header::HeaderMap::new();

    if let Ok(user_agent) = HeaderValue::from_str(&settings.user_agent) {
        headers.append(header::USER_AGENT, user_agent);
    }

    headers.append(header::ACCEPT, HeaderValue::from_static("application/json"));

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_headers_carry_user_agent_and_accept() {
        let headers = build_default_headers(&ClientSettings::default());

        assert_eq!(headers[header::USER_AGENT], "comdirect-rs");
        assert_eq!(headers[header::ACCEPT], "application/json");
    }

    #[test]
    fn invalid_user_agent_is_skipped() {
        let headers = build_default_headers(&ClientSettings {
            user_agent: "bad\nagent".to_string(),
            ..Default::default()
        });

        assert!(!headers.contains_key(header::USER_AGENT));
    }

    #[test]
    fn clones_share_state() {
        let client = Client::new(None);
        let clone = client.clone();

        assert!(Arc::ptr_eq(&client.internal, &clone.internal));
    }
}
