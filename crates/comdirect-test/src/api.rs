use comdirect_api_base::Configuration;

/// Helper for testing the comdirect API using wiremock.
///
/// Warning: when using `Mock::expected` ensure `server` is not dropped before the test completes.
pub async fn start_api_mock(mocks: Vec<wiremock::Mock>) -> (wiremock::MockServer, Configuration) {
    let server = wiremock::MockServer::start().await;

    for mock in mocks {
        server.register(mock).await;
    }

    let config = Configuration {
        base_path: server.uri(),
        user_agent: Some("test-agent".to_string()),
        client: reqwest::Client::new().into(),
    };

    (server, config)
}

/// A token endpoint response body with the given access token.
pub fn token_response(access_token: &str, expires_in: u64) -> serde_json::Value {
    serde_json::json!({
        "access_token": access_token,
        "token_type": "bearer",
        "refresh_token": format!("refresh-{access_token}"),
        "expires_in": expires_in,
        "scope": "TWO_FACTOR",
        "kdnr": "1234567890",
        "bpid": 12345,
        "kontaktId": 67890
    })
}
