//! API client
//!
//! Combines the endpoint, credentials and HTTP transport. Managers borrow
//! one of these to issue requests; it holds no per-request state.

use super::http::{ApiResponse, HttpClient};
use crate::config::ClientConfig;
use crate::error::Result;
use serde_json::Value;
use url::Url;

/// Main API client
#[derive(Clone, Debug)]
pub struct ApiClient {
    pub http: HttpClient,
    endpoint: String,
}

impl ApiClient {
    /// Create a new client from configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        // Validate once so every later URL is well-formed
        let parsed = Url::parse(&config.endpoint)?;
        let endpoint = parsed.as_str().trim_end_matches('/').to_string();

        let http = HttpClient::new(&config.user_agent, config.timeout, config.auth_token.clone())?;

        Ok(Self { http, endpoint })
    }

    /// Base URL every path is appended to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build a full URL from a path starting with `/`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.http.get(&self.url(path)).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.http.post(&self.url(path), Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.http.delete(&self.url(path)).await
    }
}

/// Percent-encode one path segment (an identifier)
pub fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: &str) -> ClientConfig {
        ClientConfig::new(endpoint)
    }

    #[test]
    fn url_joins_without_double_slash() {
        let client = ApiClient::new(&config("http://cinder.local:8776/v1/tenant/")).unwrap();
        assert_eq!(
            client.url("/volumes/detail"),
            "http://cinder.local:8776/v1/tenant/volumes/detail"
        );
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let err = ApiClient::new(&config("not a url")).unwrap_err();
        assert!(matches!(err, crate::Error::BadUrl(_)));
    }

    #[test]
    fn segment_encodes_reserved_characters() {
        assert_eq!(segment("abc123"), "abc123");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }
}
