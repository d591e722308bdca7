use std::time::Instant;

use tracing::{debug, warn};

/// Middleware that traces every outgoing request with its method, path, status and latency.
///
/// Only the path is logged; query strings and headers may carry account data or tokens.
pub(crate) struct TraceMiddleware;

#[async_trait::async_trait]
impl reqwest_middleware::Middleware for TraceMiddleware {
    async fn handle(
        &self,
        req: reqwest::Request,
        extensions: &mut http::Extensions,
        next: reqwest_middleware::Next<'_>,
    ) -> Result<reqwest::Response, reqwest_middleware::Error> {
        let method = req.method().clone();
        let path = req.url().path().to_owned();
        let started = Instant::now();

        let result = next.run(req, extensions).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(response) => debug!(
                %method,
                %path,
                status = response.status().as_u16(),
                elapsed_ms,
                "request completed"
            ),
            Err(e) => warn!(%method, %path, elapsed_ms, "request failed: {e}"),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn passes_responses_through() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/ping"))
            .respond_with(ResponseTemplate::new(418).set_body_string("teapot"))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest_middleware::ClientBuilder::new(reqwest::Client::new())
            .with(TraceMiddleware)
            .build();

        let response = client
            .get(format!("{}/ping", server.uri()))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 418);
        assert_eq!(response.text().await.unwrap(), "teapot");
    }
}
