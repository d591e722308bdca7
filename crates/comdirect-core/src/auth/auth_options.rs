use serde::{Deserialize, Serialize};

/// Everything needed to run the login flow. The password is only held for the duration of the
/// flow and is never part of a [`Credential`](super::Credential).
#[derive(Clone)]
pub struct AuthOptions {
    /// Customer number or zugangsnummer.
    pub username: String,
    /// Online banking PIN.
    pub password: String,
    /// OAuth2 client id of the registered API application.
    pub client_id: String,
    /// OAuth2 client secret of the registered API application.
    pub client_secret: String,
}

impl AuthOptions {
    /// The client id and secret, which outlive the login flow for refreshing tokens.
    pub fn client_credentials(&self) -> ClientCredentials {
        ClientCredentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
        }
    }
}

impl std::fmt::Debug for AuthOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthOptions")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// OAuth2 client id and secret.
#[allow(missing_docs)]
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_password_and_secret() {
        let options = AuthOptions {
            username: "user".to_string(),
            password: "hunter2".to_string(),
            client_id: "User_ABC".to_string(),
            client_secret: "s3cr3t".to_string(),
        };

        let debug = format!("{options:?}");
        assert!(debug.contains("user"));
        assert!(debug.contains("User_ABC"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("s3cr3t"));
        assert!(!format!("{:?}", options.client_credentials()).contains("s3cr3t"));
    }
}
