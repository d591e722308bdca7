//! Session persistence for the CLI.
//!
//! The credential obtained by `login` is kept in the operating system keychain together with the
//! username and the API client credentials, so later commands can reuse or refresh it. When no
//! keychain is available the state goes to `~/.comdirect/session.json`, readable by the owner
//! only. The password is never stored.

use std::{
    fs,
    io::{ErrorKind, Write},
    path::PathBuf,
};

use color_eyre::eyre::{eyre, Result, WrapErr};
use comdirect_cli::password_prompt_when_none;
use comdirect_core::{
    auth::{AuthOptions, ClientCredentials, Credential},
    Client,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::command::CommandConfig;

const SESSION_DIR: &str = ".comdirect";
const SESSION_FILE: &str = "session.json";

const KEYRING_SERVICE: &str = "comdirect-cli";
const KEYRING_USER: &str = "comdirect";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionState {
    pub username: String,
    pub client_credentials: ClientCredentials,
    pub credential: Credential,
}

pub(crate) struct SessionStore {
    keyring: Option<keyring::Entry>,
    path: PathBuf,
}

impl SessionStore {
    pub fn new(keyring: Option<keyring::Entry>, path: PathBuf) -> Self {
        Self { keyring, path }
    }

    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| eyre!("Could not determine home directory"))?;
        let keyring = match keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("keychain unavailable: {}", e);
                None
            }
        };
        Ok(Self::new(keyring, home.join(SESSION_DIR).join(SESSION_FILE)))
    }

    pub fn save(&self, state: &SessionState) -> Result<()> {
        let json = serde_json::to_string(state)?;

        if let Some(entry) = &self.keyring {
            match entry.set_password(&json) {
                Ok(()) => {
                    debug!("session saved to the keychain");
                    // drop a stale fallback copy
                    return self.remove_file();
                }
                Err(e) => warn!("Failed to store the session in the keychain: {}", e),
            }
        }

        self.save_file(json.as_bytes())
    }

    pub fn load(&self) -> Result<Option<SessionState>> {
        if let Some(entry) = &self.keyring {
            match entry.get_password() {
                Ok(json) => {
                    let state = serde_json::from_str(&json)
                        .wrap_err("Corrupt session in the keychain")?;
                    return Ok(Some(state));
                }
                Err(keyring::Error::NoEntry) => {}
                Err(e) => warn!("Failed to read the session from the keychain: {}", e),
            }
        }

        self.load_file()
    }

    pub fn clear(&self) -> Result<()> {
        if let Some(entry) = &self.keyring {
            match entry.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => {}
                Err(e) => warn!("Failed to remove the session from the keychain: {}", e),
            }
        }

        self.remove_file()
    }

    fn save_file(&self, json: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
        }

        let mut file = open_private(&self.path)
            .wrap_err_with(|| format!("Failed to open {}", self.path.display()))?;
        file.write_all(json)?;

        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    fn load_file(&self) -> Result<Option<SessionState>> {
        let json = match fs::read(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).wrap_err_with(|| format!("Failed to read {}", self.path.display()))
            }
        };

        let state = serde_json::from_slice(&json)
            .wrap_err_with(|| format!("Corrupt session file {}", self.path.display()))?;
        Ok(Some(state))
    }

    fn remove_file(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(unix)]
fn open_private(path: &std::path::Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies when the file is created
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &std::path::Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

/// A client holding a usable credential restored from disk.
///
/// An expired credential is refreshed with the refresh token. When that fails the user is asked
/// for the password and the login flow runs again.
pub(crate) async fn authenticated_client(
    config: &CommandConfig,
    cancel: &CancellationToken,
) -> Result<Client> {
    let store = SessionStore::default_location()?;
    let state = store
        .load()?
        .ok_or_else(|| eyre!("Not logged in. Run `comdirect login` first."))?;

    let client = Client::with_credential(
        Some(config.client_settings()),
        state.credential.clone(),
        Some(state.client_credentials.clone()),
    );

    if !state.credential.is_expired() {
        return Ok(client);
    }

    match client.auth().refresh(cancel).await {
        Ok(credential) => {
            info!("Access token refreshed");
            store.save(&SessionState {
                credential,
                ..state
            })?;
        }
        Err(e) => {
            warn!("Failed to refresh the access token: {}", e);

            let options = AuthOptions {
                password: password_prompt_when_none(
                    "Password",
                    std::env::var("COMDIRECT_PASSWORD").ok(),
                )?,
                username: state.username,
                client_id: state.client_credentials.client_id,
                client_secret: state.client_credentials.client_secret,
            };
            super::login::authenticate(&client, options, config.confirmation(None), cancel)
                .await?;
        }
    }

    Ok(client)
}
