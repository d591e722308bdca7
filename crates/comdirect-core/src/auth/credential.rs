use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::AccessToken;

/// The result of a successful login: the banking token, the session it belongs to and when it
/// was issued.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    access_token: AccessToken,
    session_id: String,
    issued_at: DateTime<Utc>,
}

impl Credential {
    #[allow(missing_docs)]
    pub fn new(access_token: AccessToken, session_id: String, issued_at: DateTime<Utc>) -> Self {
        Self {
            access_token,
            session_id,
            issued_at,
        }
    }

    #[allow(missing_docs)]
    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    #[allow(missing_docs)]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[allow(missing_docs)]
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// The instant at which the token stops being valid.
    pub fn expires_at(&self) -> DateTime<Utc> {
        i64::try_from(self.access_token.expires_in)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|lifetime| self.issued_at.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Whether the token is expired at `now`. The expiry instant itself counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }

    #[allow(missing_docs)]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub(crate) fn renew(&mut self, access_token: AccessToken, issued_at: DateTime<Utc>) {
        self.access_token = access_token;
        self.issued_at = issued_at;
    }
}
