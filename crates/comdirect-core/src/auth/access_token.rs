use serde::{Deserialize, Serialize};

/// Token issued by the comdirect OAuth2 endpoint.
///
/// The password grant yields a token restricted to session handling; the secondary grant after
/// TAN confirmation replaces it with one that can access banking data.
#[allow(missing_docs)]
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: String,
    /// Lifetime in seconds, counted from when the token was issued.
    pub expires_in: u64,
    #[serde(default)]
    pub scope: String,
    #[serde(default, rename = "kdnr")]
    pub customer_id: String,
    #[serde(default, rename = "bpid")]
    pub business_partner_id: u64,
    #[serde(default, rename = "kontaktId")]
    pub contact_id: u64,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("refresh_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .field("customer_id", &self.customer_id)
            .field("business_partner_id", &self.business_partner_id)
            .field("contact_id", &self.contact_id)
            .finish()
    }
}
