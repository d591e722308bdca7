use color_eyre::eyre::{eyre, Result};
use comdirect_core::Client;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::state::SessionStore;
use crate::{command::CommandConfig, render::CommandResult};

pub(crate) async fn run(config: &CommandConfig, cancel: &CancellationToken) -> CommandResult {
    logout(config, cancel).await?;
    Ok("Successfully logged out!".into())
}

async fn logout(config: &CommandConfig, cancel: &CancellationToken) -> Result<()> {
    let store = SessionStore::default_location()?;
    let state = store.load()?.ok_or_else(|| eyre!("Not logged in"))?;

    let client = Client::with_credential(
        Some(config.client_settings()),
        state.credential,
        Some(state.client_credentials),
    );

    // The stored session is removed even if the server refuses the revocation
    if let Err(e) = client.auth().revoke(cancel).await {
        warn!("Failed to revoke the access token: {}", e);
    }

    store.clear()?;

    info!("Logged out successfully");
    Ok(())
}
