use chrono::Utc;
use comdirect_api_base::{exchange, exchange_empty, Configuration};
use reqwest::header;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{
    api::request::{PasswordTokenRequest, SecondaryTokenRequest},
    session::ONCE_AUTHENTICATION_HEADER,
    AccessToken, AuthOptions, AuthStep, ChallengeConfirmation, ChallengeInfo, Credential,
    LoginError, RequestIdentity, SessionDescriptor, REQUEST_INFO_HEADER,
};
use crate::ApiError;

const SESSIONS_PATH: &str = "/api/session/clients/user/v1/sessions";

/// Runs the login flow against one API configuration.
///
/// Each call to [`authenticate`](Self::authenticate) is an independent attempt with its own
/// session id. Nothing is retried; the first failing step ends the attempt.
pub struct Authenticator<'a> {
    config: &'a Configuration,
    confirmation: ChallengeConfirmation,
}

/// State carried from one step to the next within a single attempt.
struct FlowContext {
    identity: RequestIdentity,
    token: AccessToken,
}

impl<'a> Authenticator<'a> {
    #[allow(missing_docs)]
    pub fn new(config: &'a Configuration, confirmation: ChallengeConfirmation) -> Self {
        Self {
            config,
            confirmation,
        }
    }

    /// Run all steps and return the resulting credential.
    pub async fn authenticate(
        &self,
        options: &AuthOptions,
        cancel: &CancellationToken,
    ) -> Result<Credential, LoginError> {
        let token = self.password_grant(options, cancel).await?;

        let mut flow = FlowContext {
            identity: RequestIdentity::new()?,
            token,
        };

        let session = self.fetch_session(&mut flow, cancel).await?;
        let (session, challenge) = self.validate_session(&mut flow, session, cancel).await?;

        debug!(step = %AuthStep::AwaitChallenge, challenge_type = %challenge.challenge_type);
        self.confirmation
            .confirm(
                self.config,
                &challenge,
                &flow.token.access_token,
                &mut flow.identity,
                cancel,
            )
            .await?;

        self.activate_session(&mut flow, &session, &challenge, cancel)
            .await?;
        let token = self.secondary_grant(&flow, options, cancel).await?;

        info!(session_id = flow.identity.session_id(), "login complete");

        Ok(Credential::new(
            token,
            flow.identity.session_id().to_owned(),
            Utc::now(),
        ))
    }

    async fn password_grant(
        &self,
        options: &AuthOptions,
        cancel: &CancellationToken,
    ) -> Result<AccessToken, LoginError> {
        let step = AuthStep::PasswordGrant;
        debug!(%step);

        let token = PasswordTokenRequest::new(options)
            .send(self.config, cancel)
            .await
            .map_err(LoginError::api(step))?;

        require_token(step, token)
    }

    async fn fetch_session(
        &self,
        flow: &mut FlowContext,
        cancel: &CancellationToken,
    ) -> Result<SessionDescriptor, LoginError> {
        let step = AuthStep::FetchSession;
        debug!(%step);

        flow.identity.refresh_request_id();
        let request = self
            .config
            .client
            .get(self.config.url(SESSIONS_PATH))
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(&flow.token.access_token)
            .header(REQUEST_INFO_HEADER, flow.identity.header_value());

        let sessions: Vec<SessionDescriptor> = exchange(request, cancel)
            .await
            .map_err(LoginError::api(step))?
            .value;

        sessions
            .into_iter()
            .next()
            .ok_or_else(|| LoginError::protocol(step, "no session returned"))
    }

    async fn validate_session(
        &self,
        flow: &mut FlowContext,
        session: SessionDescriptor,
        cancel: &CancellationToken,
    ) -> Result<(SessionDescriptor, ChallengeInfo), LoginError> {
        let step = AuthStep::ValidateSession;
        debug!(%step);

        let session = session.with_tan_activated();

        flow.identity.refresh_request_id();
        let request = self
            .config
            .client
            .post(self.config.url(&format!(
                "{SESSIONS_PATH}/{}/validate",
                comdirect_api_base::urlencode(&session.identifier)
            )))
            .header(header::ACCEPT, "application/json")
            .bearer_auth(&flow.token.access_token)
            .header(REQUEST_INFO_HEADER, flow.identity.header_value())
            .json(&session);

        let response = exchange_empty(request, cancel)
            .await
            .map_err(LoginError::api(step))?;

        let challenge = ChallengeInfo::from_headers(&response.headers)
            .map_err(|e| LoginError::protocol(step, e.to_string()))?;

        Ok((session, challenge))
    }

    async fn activate_session(
        &self,
        flow: &mut FlowContext,
        session: &SessionDescriptor,
        challenge: &ChallengeInfo,
        cancel: &CancellationToken,
    ) -> Result<(), LoginError> {
        let step = AuthStep::ActivateSession;
        debug!(%step);

        flow.identity.refresh_request_id();
        let request = self
            .config
            .client
            .patch(self.config.url(&format!(
                "{SESSIONS_PATH}/{}",
                comdirect_api_base::urlencode(&session.identifier)
            )))
            .header(header::ACCEPT, "application/json")
            .bearer_auth(&flow.token.access_token)
            .header(REQUEST_INFO_HEADER, flow.identity.header_value())
            .header(ONCE_AUTHENTICATION_HEADER, challenge.activation_header())
            .json(session);

        match exchange_empty(request, cancel).await {
            Ok(_) => Ok(()),
            Err(ApiError::Response { status, content }) => Err(LoginError::ChallengeRejected {
                step,
                reason: format!("session activation answered {status}: {content}"),
            }),
            Err(e) => Err(LoginError::api(step)(e)),
        }
    }

    async fn secondary_grant(
        &self,
        flow: &FlowContext,
        options: &AuthOptions,
        cancel: &CancellationToken,
    ) -> Result<AccessToken, LoginError> {
        let step = AuthStep::SecondaryGrant;
        debug!(%step);

        let token = SecondaryTokenRequest::new(&flow.token.access_token, options)
            .send(self.config, cancel)
            .await
            .map_err(LoginError::api(step))?;

        require_token(step, token)
    }
}

fn require_token(step: AuthStep, token: AccessToken) -> Result<AccessToken, LoginError> {
    if token.access_token.is_empty() {
        return Err(LoginError::protocol(step, "empty access token"));
    }
    Ok(token)
}
