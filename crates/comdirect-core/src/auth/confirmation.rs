use std::time::Duration;

use comdirect_api_base::{exchange, Configuration};
use reqwest::header;
use tokio::time::{sleep, sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{
    AuthStep, ChallengeInfo, ChallengeState, ChallengeStatus, LoginError, RequestIdentity,
    REQUEST_INFO_HEADER,
};
use crate::ApiError;

const STEP: AuthStep = AuthStep::AwaitChallenge;

/// How the login flow waits for the account holder to confirm the TAN challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeConfirmation {
    /// Poll the challenge status link every `interval` until it reports the challenge as
    /// authenticated, for at most `timeout`.
    ///
    /// When the challenge has no status link, or the status cannot be read, the flow waits
    /// `fallback` (capped by what is left of `timeout`) and then continues.
    Poll {
        #[allow(missing_docs)]
        interval: Duration,
        #[allow(missing_docs)]
        timeout: Duration,
        #[allow(missing_docs)]
        fallback: Duration,
    },
    /// Wait a fixed amount of time and then continue.
    FixedDelay {
        #[allow(missing_docs)]
        wait: Duration,
    },
}

impl Default for ChallengeConfirmation {
    fn default() -> Self {
        ChallengeConfirmation::Poll {
            interval: Duration::from_secs(3),
            timeout: Duration::from_secs(60),
            fallback: Duration::from_secs(10),
        }
    }
}

impl ChallengeConfirmation {
    /// Wait until the challenge is confirmed according to the strategy.
    pub(crate) async fn confirm(
        &self,
        config: &Configuration,
        challenge: &ChallengeInfo,
        access_token: &str,
        identity: &mut RequestIdentity,
        cancel: &CancellationToken,
    ) -> Result<(), LoginError> {
        match *self {
            ChallengeConfirmation::Poll {
                interval,
                timeout,
                fallback,
            } => {
                info!(
                    challenge_type = %challenge.challenge_type,
                    "waiting up to {}s for the challenge to be confirmed",
                    timeout.as_secs()
                );
                let started = Instant::now();
                let deadline = started + timeout;
                let poller = StatusPoller {
                    config,
                    challenge,
                    access_token,
                };

                match poller.poll(identity, interval, started, deadline, cancel).await? {
                    PollOutcome::Authenticated => Ok(()),
                    PollOutcome::Unavailable => {
                        let remaining = deadline.saturating_duration_since(Instant::now());
                        info!(
                            challenge_type = %challenge.challenge_type,
                            "waiting {}s for the challenge to be confirmed",
                            fallback.min(remaining).as_secs()
                        );
                        wait(fallback.min(remaining), cancel).await
                    }
                }
            }
            ChallengeConfirmation::FixedDelay { wait: duration } => {
                info!(
                    challenge_type = %challenge.challenge_type,
                    "waiting {}s for the challenge to be confirmed",
                    duration.as_secs()
                );
                wait(duration, cancel).await
            }
        }
    }
}

enum PollOutcome {
    Authenticated,
    /// The status could not be determined; fall back to waiting.
    Unavailable,
}

struct StatusPoller<'a> {
    config: &'a Configuration,
    challenge: &'a ChallengeInfo,
    access_token: &'a str,
}

impl StatusPoller<'_> {
    async fn poll(
        &self,
        identity: &mut RequestIdentity,
        interval: Duration,
        started: Instant,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> Result<PollOutcome, LoginError> {
        let Some(link) = self.challenge.status_link() else {
            warn!("challenge has no status link");
            return Ok(PollOutcome::Unavailable);
        };
        let url = self.config.url(&link.href);

        loop {
            identity.refresh_request_id();

            match self.fetch_status(&url, identity, cancel).await {
                Ok(status) => match status.state() {
                    ChallengeState::Authenticated => {
                        debug!("challenge confirmed");
                        return Ok(PollOutcome::Authenticated);
                    }
                    ChallengeState::Pending => debug!(status = %status.status, "challenge pending"),
                    ChallengeState::Rejected(status) => {
                        return Err(LoginError::ChallengeRejected {
                            step: STEP,
                            reason: format!("challenge status is {status}"),
                        });
                    }
                },
                Err(ApiError::Cancelled) => return Err(LoginError::Cancelled { step: STEP }),
                Err(e) => {
                    warn!("could not read challenge status: {e}");
                    return Ok(PollOutcome::Unavailable);
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(LoginError::ChallengeTimeout {
                    waited: now - started,
                });
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(LoginError::Cancelled { step: STEP }),
                _ = sleep_until((now + interval).min(deadline)) => {}
            }
        }
    }

    async fn fetch_status(
        &self,
        url: &str,
        identity: &RequestIdentity,
        cancel: &CancellationToken,
    ) -> Result<ChallengeStatus, ApiError> {
        let request = self
            .config
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .bearer_auth(self.access_token)
            .header(REQUEST_INFO_HEADER, identity.header_value());

        Ok(exchange(request, cancel).await?.value)
    }
}

async fn wait(duration: Duration, cancel: &CancellationToken) -> Result<(), LoginError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(LoginError::Cancelled { step: STEP }),
        _ = sleep(duration) => Ok(()),
    }
}
