//! Configuration types for API clients.

/// Configuration for an API client.
///
/// This struct provides all the configuration options needed for making
/// requests against the comdirect REST API.
#[derive(Debug, Clone)]
pub struct Configuration {
    /// Base URL of the API host (e.g., "<https://api.comdirect.de>"). Paths such as
    /// `/oauth/token` or `/api/...` are appended to it.
    pub base_path: String,
    /// HTTP client with middleware support.
    pub client: reqwest_middleware::ClientWithMiddleware,

    /// User-Agent header value to be sent with requests.
    pub user_agent: Option<String>,
}

impl Configuration {
    /// Resolve `path` against the base path.
    ///
    /// Absolute URLs are returned unchanged, which allows following links handed out by the
    /// server (e.g. challenge status links).
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let base = self.base_path.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_path: &str) -> Configuration {
        Configuration {
            base_path: base_path.to_string(),
            client: reqwest::Client::new().into(),
            user_agent: None,
        }
    }

    #[test]
    fn joins_relative_paths() {
        let config = config("https://api.comdirect.de/");
        assert_eq!(
            config.url("/oauth/token"),
            "https://api.comdirect.de/oauth/token"
        );
        assert_eq!(
            config.url("api/session/clients/user/v1/sessions"),
            "https://api.comdirect.de/api/session/clients/user/v1/sessions"
        );
    }

    #[test]
    fn keeps_absolute_urls() {
        let config = config("https://api.comdirect.de");
        assert_eq!(
            config.url("https://example.com/status/1"),
            "https://example.com/status/1"
        );
    }
}
