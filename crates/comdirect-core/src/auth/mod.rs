//! Authentication against the comdirect API.
//!
//! A login runs five ordered steps, see [`AuthStep`]. Between validating and activating the
//! session the account holder confirms a TAN challenge out of band; how the client waits for that
//! is configured with [`ChallengeConfirmation`].

mod access_token;
pub(crate) mod api;
mod auth_client;
mod auth_options;
mod authenticator;
mod confirmation;
mod credential;
mod login_error;
mod request_identity;
mod session;

pub use access_token::AccessToken;
pub use auth_client::{AuthClient, LoginRequest, TokenError};
pub use auth_options::{AuthOptions, ClientCredentials};
pub use authenticator::Authenticator;
pub use confirmation::ChallengeConfirmation;
pub use credential::Credential;
pub use login_error::{AuthStep, LoginError};
pub use request_identity::{
    generate_request_id, generate_session_id, RequestIdentity, RequestIdentityError,
    REQUEST_INFO_HEADER,
};
pub use session::{
    ChallengeHeaderError, ChallengeInfo, ChallengeLink, ChallengeState, ChallengeStatus,
    SessionDescriptor,
};
