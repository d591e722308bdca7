use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Response header describing the TAN challenge issued by session validation.
pub(crate) const ONCE_AUTHENTICATION_INFO_HEADER: &str = "x-once-authentication-info";
/// Request header confirming a TAN challenge when activating the session.
pub(crate) const ONCE_AUTHENTICATION_HEADER: &str = "x-once-authentication";

/// Server-side login session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionDescriptor {
    /// Session identifier used in the validate and activate paths.
    pub identifier: String,
    #[allow(missing_docs)]
    #[serde(default)]
    pub session_tan_active: bool,
    #[allow(missing_docs)]
    #[serde(default, rename = "activated2FA")]
    pub activated_2fa: bool,
}

impl SessionDescriptor {
    /// The descriptor as sent to the validate and activate endpoints.
    pub(crate) fn with_tan_activated(mut self) -> Self {
        self.session_tan_active = true;
        self.activated_2fa = true;
        self
    }
}

/// Challenge returned in the [`ONCE_AUTHENTICATION_INFO_HEADER`] header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeInfo {
    /// Challenge id, echoed back on activation.
    pub id: String,
    /// Type of the challenge, e.g. `P_TAN_PUSH` or `P_TAN`.
    #[serde(default, rename = "typ")]
    pub challenge_type: String,
    #[allow(missing_docs)]
    #[serde(default)]
    pub available_types: Vec<String>,
    /// Where the challenge status can be polled. Not all challenge types have one.
    #[serde(default)]
    pub link: Option<ChallengeLink>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChallengeLink {
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub rel: String,
    #[serde(default)]
    pub method: String,
}

/// The challenge header was absent or could not be read.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ChallengeHeaderError {
    #[error("The x-once-authentication-info header is missing")]
    Missing,
    #[error("The x-once-authentication-info header is not valid text")]
    NotText,
    #[error("The x-once-authentication-info header is malformed: {0}")]
    Malformed(#[source] serde_json::Error),
}

impl ChallengeInfo {
    /// Parse the challenge from the validation response headers.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ChallengeHeaderError> {
        Self::from_header_value(headers.get(ONCE_AUTHENTICATION_INFO_HEADER))
    }

    fn from_header_value(value: Option<&HeaderValue>) -> Result<Self, ChallengeHeaderError> {
        let value = value.ok_or(ChallengeHeaderError::Missing)?;
        let text = value.to_str().map_err(|_| ChallengeHeaderError::NotText)?;
        serde_json::from_str(text).map_err(ChallengeHeaderError::Malformed)
    }

    /// The status link, if the challenge has a usable one.
    pub fn status_link(&self) -> Option<&ChallengeLink> {
        self.link.as_ref().filter(|link| !link.href.is_empty())
    }

    /// Value of the [`ONCE_AUTHENTICATION_HEADER`] header.
    pub(crate) fn activation_header(&self) -> String {
        serde_json::json!({ "id": self.id }).to_string()
    }
}

/// Body returned by the challenge status link.
#[allow(missing_docs)]
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeStatus {
    #[serde(default)]
    pub authentication_id: String,
    pub status: String,
}

/// Interpretation of a [`ChallengeStatus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeState {
    /// The account holder has not answered yet.
    Pending,
    /// The challenge was confirmed.
    Authenticated,
    /// Any other status, such as a declined or expired challenge.
    Rejected(String),
}

impl ChallengeStatus {
    #[allow(missing_docs)]
    pub fn state(&self) -> ChallengeState {
        match self.status.as_str() {
            "AUTHENTICATED" => ChallengeState::Authenticated,
            "PENDING" | "OPEN" => ChallengeState::Pending,
            other => ChallengeState::Rejected(other.to_owned()),
        }
    }
}
