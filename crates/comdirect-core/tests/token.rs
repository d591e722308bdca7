//! Refreshing and revoking the token of an existing credential.

use chrono::{TimeDelta, Utc};
use comdirect_core::{
    auth::{AccessToken, ClientCredentials, Credential, TokenError},
    Client, ClientSettings,
};
use comdirect_test::{start_api_mock, token_response};
use tokio_util::sync::CancellationToken;
use wiremock::{matchers, Mock, ResponseTemplate};

fn expired_credential() -> Credential {
    Credential::new(
        AccessToken {
            access_token: "old-token".to_string(),
            refresh_token: "old-refresh".to_string(),
            expires_in: 599,
            ..Default::default()
        },
        "0123456789abcdef0123456789abcdef".to_string(),
        Utc::now() - TimeDelta::seconds(3600),
    )
}

fn client_credentials() -> ClientCredentials {
    ClientCredentials {
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
    }
}

async fn setup(
    mocks: Vec<Mock>,
    client_credentials: Option<ClientCredentials>,
) -> (wiremock::MockServer, Client) {
    let (server, config) = start_api_mock(mocks).await;

    let client = Client::with_credential(
        Some(ClientSettings {
            api_url: config.base_path,
            user_agent: config.user_agent.unwrap(),
            timeout_secs: 5,
        }),
        expired_credential(),
        client_credentials,
    );

    (server, client)
}

fn revoke_mock(status: u16) -> Mock {
    Mock::given(matchers::method("DELETE"))
        .and(matchers::path("/oauth/token"))
        .and(matchers::bearer_token("old-token"))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
}

#[tokio::test]
async fn test_refresh_replaces_token_and_keeps_session() {
    let (_server, client) = setup(
        vec![Mock::given(matchers::method("POST"))
            .and(matchers::path("/oauth/token"))
            .and(matchers::body_string_contains("grant_type=refresh_token"))
            .and(matchers::body_string_contains("refresh_token=old-refresh"))
            .and(matchers::body_string_contains("client_secret=secret"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(token_response("new-token", 599)),
            )
            .expect(1)],
        Some(client_credentials()),
    )
    .await;

    assert!(!client.auth().is_authenticated());

    let credential = client
        .auth()
        .refresh(&CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(credential.access_token().access_token, "new-token");
    assert_eq!(credential.session_id(), "0123456789abcdef0123456789abcdef");
    assert!(!credential.is_expired());
    assert!(client.auth().is_authenticated());
}

#[tokio::test]
async fn test_refresh_requires_client_credentials() {
    let (_server, client) = setup(vec![], None).await;

    let err = client
        .auth()
        .refresh(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, TokenError::MissingClientCredentials));
}

#[tokio::test]
async fn test_refresh_without_credential() {
    let client = Client::new(None);

    let err = client
        .auth()
        .refresh(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, TokenError::NotAuthenticated(_)));
}

#[tokio::test]
async fn test_revoke_204_clears_credential() {
    let (_server, client) = setup(vec![revoke_mock(204)], None).await;

    client
        .auth()
        .revoke(&CancellationToken::new())
        .await
        .unwrap();

    assert!(client.auth().credential().is_none());
}

#[tokio::test]
async fn test_revoke_other_status_fails_and_keeps_credential() {
    let (_server, client) = setup(vec![revoke_mock(200)], None).await;

    let err = client
        .auth()
        .revoke(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TokenError::RevocationFailed(status) if status.as_u16() == 200
    ));
    let held = client.auth().credential().unwrap();
    assert_eq!(held.access_token().access_token, "old-token");
}
