use serde::{Deserialize, Serialize};

/// Basic client behavior settings. These settings specify the target and behavior of the
/// comdirect client. They are optional and uneditable once the client is initialized.
///
/// Defaults to
///
/// ```
/// # use comdirect_core::ClientSettings;
/// let settings = ClientSettings {
///     api_url: "https://api.comdirect.de".to_string(),
///     user_agent: "comdirect-rs".to_string(),
///     timeout_secs: 30,
/// };
/// let default = ClientSettings::default();
/// ```
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ClientSettings {
    /// The base url of the comdirect API. Defaults to `https://api.comdirect.de`
    pub api_url: String,
    /// The user_agent to send to comdirect. Defaults to `comdirect-rs`
    pub user_agent: String,
    /// Per-request HTTP timeout in seconds. Defaults to 30
    pub timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.comdirect.de".into(),
            user_agent: "comdirect-rs".into(),
            timeout_secs: 30,
        }
    }
}
