use chrono::{DateTime, Utc};
use rand::{rngs::OsRng, RngCore};
use serde::Serialize;
use thiserror::Error;

/// Header carrying the serialized [`RequestIdentity`].
pub const REQUEST_INFO_HEADER: &str = "x-http-request-info";

const REQUEST_ID_MODULUS: i64 = 1_000_000_000;

/// The operating system's random number generator failed.
#[derive(Debug, Error)]
#[error("Could not generate a session id: {0}")]
pub struct RequestIdentityError(#[source] rand::Error);

/// Generate a session id: 16 random bytes from the OS, hex encoded.
pub fn generate_session_id() -> Result<String, RequestIdentityError> {
    let mut bytes = [0u8; 16];
    OsRng.try_fill_bytes(&mut bytes).map_err(RequestIdentityError)?;
    Ok(hex::encode(bytes))
}

/// Generate a request id: the last nine digits of the current Unix time in milliseconds.
pub fn generate_request_id() -> String {
    request_id_at(Utc::now())
}

fn request_id_at(now: DateTime<Utc>) -> String {
    format_request_id(request_number_at(now))
}

fn request_number_at(now: DateTime<Utc>) -> i64 {
    now.timestamp_millis().rem_euclid(REQUEST_ID_MODULUS)
}

fn format_request_id(number: i64) -> String {
    format!("{number:09}")
}

/// The request number following `previous`: the clock-based `candidate` when it has moved past
/// `previous`, otherwise `previous + 1`. Ids issued within one millisecond stay distinct.
fn next_request_number(previous: i64, candidate: i64) -> i64 {
    let behind = (previous - candidate).rem_euclid(REQUEST_ID_MODULUS);
    if behind < REQUEST_ID_MODULUS / 2 {
        (previous + 1).rem_euclid(REQUEST_ID_MODULUS)
    } else {
        candidate
    }
}

/// Identifies a request within a login session. The session id is fixed per authentication
/// attempt, the request id changes with every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity {
    session_id: String,
    request_number: i64,
    request_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestInfo<'a> {
    client_request_id: ClientRequestId<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientRequestId<'a> {
    session_id: &'a str,
    request_id: &'a str,
}

impl RequestIdentity {
    /// Start a new session with a fresh session id.
    pub fn new() -> Result<Self, RequestIdentityError> {
        Ok(Self::for_session(generate_session_id()?))
    }

    /// Continue an existing session.
    pub fn for_session(session_id: impl Into<String>) -> Self {
        let request_number = request_number_at(Utc::now());
        Self {
            session_id: session_id.into(),
            request_number,
            request_id: format_request_id(request_number),
        }
    }

    #[allow(missing_docs)]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[allow(missing_docs)]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Replace the request id; call before every HTTP request. The new id differs from the ones
    /// this identity handed out before, even within the same millisecond.
    pub fn refresh_request_id(&mut self) {
        self.advance(request_number_at(Utc::now()));
    }

    fn advance(&mut self, candidate: i64) {
        self.request_number = next_request_number(self.request_number, candidate);
        self.request_id = format_request_id(self.request_number);
    }

    /// Value of the [`REQUEST_INFO_HEADER`] header.
    pub fn header_value(&self) -> String {
        serde_json::to_string(&RequestInfo {
            client_request_id: ClientRequestId {
                session_id: &self.session_id,
                request_id: &self.request_id,
            },
        })
        .expect("Serialize should be infallible")
    }
}
