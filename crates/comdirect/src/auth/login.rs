use color_eyre::eyre::Result;
use comdirect_cli::{password_prompt_when_none, text_prompt_when_none};
use comdirect_core::{
    auth::{AuthOptions, ChallengeConfirmation, LoginRequest},
    Client,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::state::{SessionState, SessionStore};
use crate::command::CommandConfig;

/// Values given on the command line or through the environment. Missing ones are prompted for.
pub(crate) struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

pub(crate) async fn login(
    config: &CommandConfig,
    credentials: Credentials,
    confirmation: ChallengeConfirmation,
    cancel: &CancellationToken,
) -> Result<Client> {
    let options = AuthOptions {
        username: text_prompt_when_none("Username", credentials.username)?,
        password: password_prompt_when_none("Password", credentials.password)?,
        client_id: text_prompt_when_none("Client ID", credentials.client_id)?,
        client_secret: password_prompt_when_none("Client Secret", credentials.client_secret)?,
    };

    let client = Client::new(Some(config.client_settings()));
    authenticate(&client, options, confirmation, cancel).await?;

    Ok(client)
}

/// Run the login flow on `client` and persist the resulting session.
pub(crate) async fn authenticate(
    client: &Client,
    options: AuthOptions,
    confirmation: ChallengeConfirmation,
    cancel: &CancellationToken,
) -> Result<()> {
    info!("Confirm the login in your photoTAN app");

    let credential = client
        .auth()
        .login(
            &LoginRequest {
                options: options.clone(),
                confirmation,
            },
            cancel,
        )
        .await?;
    debug!(expires_at = %credential.expires_at(), "logged in");

    SessionStore::default_location()?.save(&SessionState {
        username: options.username.clone(),
        client_credentials: options.client_credentials(),
        credential,
    })?;
    info!("Session saved to disk");

    Ok(())
}
