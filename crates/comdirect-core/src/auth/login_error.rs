use std::{fmt, time::Duration};

use thiserror::Error;

use super::RequestIdentityError;
use crate::ApiError;

/// A step of the login flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthStep {
    /// Exchange username and password for a session-scoped token.
    PasswordGrant,
    /// Look up the server-side session.
    FetchSession,
    /// Request a TAN challenge for the session.
    ValidateSession,
    /// Wait until the account holder has confirmed the challenge.
    AwaitChallenge,
    /// Activate the session with the confirmed challenge.
    ActivateSession,
    /// Exchange the session-scoped token for a banking token.
    SecondaryGrant,
}

impl AuthStep {
    /// Position of the step in the login flow. Waiting for the challenge is not a step of its own.
    pub fn number(self) -> Option<u8> {
        match self {
            AuthStep::PasswordGrant => Some(1),
            AuthStep::FetchSession => Some(2),
            AuthStep::ValidateSession => Some(3),
            AuthStep::AwaitChallenge => None,
            AuthStep::ActivateSession => Some(4),
            AuthStep::SecondaryGrant => Some(5),
        }
    }

    fn name(self) -> &'static str {
        match self {
            AuthStep::PasswordGrant => "password grant",
            AuthStep::FetchSession => "fetch session",
            AuthStep::ValidateSession => "validate session",
            AuthStep::AwaitChallenge => "await challenge",
            AuthStep::ActivateSession => "activate session",
            AuthStep::SecondaryGrant => "secondary grant",
        }
    }
}

impl fmt::Display for AuthStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.number() {
            Some(n) => write!(f, "step {n} ({})", self.name()),
            None => f.write_str(self.name()),
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Login failed at {step}: {source}")]
    Api {
        step: AuthStep,
        #[source]
        source: ApiError,
    },
    #[error("Login failed at {step}: unexpected response: {reason}")]
    ProtocolViolation { step: AuthStep, reason: String },
    #[error("Login failed at {step}: challenge was not confirmed: {reason}")]
    ChallengeRejected { step: AuthStep, reason: String },
    #[error("Challenge was not confirmed within {}s", .waited.as_secs())]
    ChallengeTimeout { waited: Duration },
    #[error("Login was cancelled at {step}")]
    Cancelled { step: AuthStep },
    #[error(transparent)]
    Identity(#[from] RequestIdentityError),
}

impl LoginError {
    /// The step the login flow failed at.
    pub fn step(&self) -> AuthStep {
        match self {
            LoginError::Api { step, .. }
            | LoginError::ProtocolViolation { step, .. }
            | LoginError::ChallengeRejected { step, .. }
            | LoginError::Cancelled { step } => *step,
            LoginError::ChallengeTimeout { .. } => AuthStep::AwaitChallenge,
            // The session id is generated right before the session is fetched.
            LoginError::Identity(_) => AuthStep::FetchSession,
        }
    }

    pub(crate) fn api(step: AuthStep) -> impl FnOnce(ApiError) -> Self {
        move |source| match source {
            ApiError::Cancelled => LoginError::Cancelled { step },
            source => LoginError::Api { step, source },
        }
    }

    pub(crate) fn protocol(step: AuthStep, reason: impl Into<String>) -> Self {
        LoginError::ProtocolViolation {
            step,
            reason: reason.into(),
        }
    }
}
