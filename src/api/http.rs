//! HTTP utilities for the volume REST API

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
pub const REQUEST_ID_HEADER: &str = "X-OpenStack-Request-ID";

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Raw result of one round trip: the status line and the decoded body.
///
/// Empty bodies decode to [`Value::Null`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    /// Take the value stored under `key` in the response envelope.
    pub fn unwrap_key(self, key: &str) -> Result<Value> {
        match self.body {
            Value::Object(mut map) => map.remove(key).ok_or_else(|| Error::missing_key(key)),
            _ => Err(Error::missing_key(key)),
        }
    }
}

/// HTTP client wrapper for volume API calls
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    auth_token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client. The timeout applies to every request.
    pub fn new(user_agent: &str, timeout: Option<Duration>, auth_token: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().user_agent(user_agent).default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            auth_token,
        })
    }

    /// Send one request and decode its JSON body.
    ///
    /// Non-2xx statuses become [`Error::Api`]; nothing is retried.
    pub async fn request(&self, method: Method, url: &str, body: Option<&Value>) -> Result<ApiResponse> {
        let request_id = format!("req-{}", uuid::Uuid::new_v4());
        tracing::debug!("{} {} ({})", method, url, request_id);

        let mut request = self
            .client
            .request(method, url)
            .header(REQUEST_ID_HEADER, &request_id);

        if let Some(token) = &self.auth_token {
            request = request.header(AUTH_TOKEN_HEADER, token);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;

        let status = response.status();
        let response_body = response.text().await?;

        if !status.is_success() {
            // Only the sanitized/truncated body is logged or returned
            let message = sanitize_for_log(&response_body);
            tracing::error!("API error: {} - {}", status, message);
            return Err(Error::Api { status, message });
        }

        if response_body.trim().is_empty() {
            return Ok(ApiResponse {
                status,
                body: Value::Null,
            });
        }

        let body = serde_json::from_str(&response_body)?;
        Ok(ApiResponse { status, body })
    }

    pub async fn get(&self, url: &str) -> Result<ApiResponse> {
        self.request(Method::GET, url, None).await
    }

    pub async fn post(&self, url: &str, body: Option<&Value>) -> Result<ApiResponse> {
        self.request(Method::POST, url, body).await
    }

    pub async fn delete(&self, url: &str) -> Result<ApiResponse> {
        self.request(Method::DELETE, url, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let out = sanitize_for_log(&body);
        assert!(out.starts_with(&"x".repeat(MAX_LOG_BODY_LENGTH)));
        assert!(out.contains("truncated, 500 bytes total"));
    }

    #[test]
    fn sanitize_strips_control_characters() {
        assert_eq!(sanitize_for_log("bad\nrequest\t!"), "badrequest!");
    }

    #[test]
    fn unwrap_key_takes_envelope_member() {
        let response = ApiResponse {
            status: StatusCode::OK,
            body: json!({"volume": {"id": "v1"}, "other": 1}),
        };
        assert_eq!(response.unwrap_key("volume").unwrap(), json!({"id": "v1"}));
    }

    #[test]
    fn unwrap_key_reports_missing_key() {
        let response = ApiResponse {
            status: StatusCode::OK,
            body: Value::Null,
        };
        let err = response.unwrap_key("volumes").unwrap_err();
        assert!(matches!(err, Error::MissingKey { ref key } if key == "volumes"));
    }
}
