use std::time::Duration;

use reqwest::Method;
use tracing::{debug, error};
use uuid::Uuid;

use shopfront_api::ApiError;

/// How much of a non-2xx response body makes it into the error
/// message.
const BODY_EXCERPT_CHARS: usize = 300;

/// Shared HTTP client for every REST backend.
///
/// Owns the connection pool and the request timeout, tags every
/// request with an `x-request-id` correlation id, and maps transport
/// and status failures into [`ApiError`].
pub struct RestClient {
    http: reqwest::Client,
}

impl RestClient {
    pub fn new(timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self { http }
    }

    /// Start a request with a fresh correlation id.
    pub(crate) fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let request_id = Uuid::new_v4();
        debug!("[RestClient] {} {} request_id={}", method, url, request_id);
        self.http
            .request(method, url)
            .header("x-request-id", request_id.to_string())
    }

    /// Classify a reqwest error into a client-side failure message
    /// with specific guidance where the error kind allows it.
    pub(crate) fn transport_error(e: reqwest::Error, url: &str, operation: &str) -> ApiError {
        let message = if e.is_timeout() {
            format!(
                "request to {} timed out while trying to {} (check the network or raise the timeout)",
                url, operation
            )
        } else if e.is_connect() {
            format!(
                "could not connect to {} to {}: check connectivity and the configured base URL ({})",
                url, operation, e
            )
        } else if e.is_decode() {
            format!("unexpected response format from {} while trying to {}: {}", url, operation, e)
        } else {
            format!("failed to {} at {}: {}", operation, url, e)
        };
        error!("[RestClient] {}", message);
        ApiError::Client { message }
    }

    /// Turn a non-2xx response into a server-side failure, consuming
    /// the body for the message. 2xx responses pass through untouched.
    pub(crate) async fn handle_response(
        response: reqwest::Response,
        url: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = Self::status_error(status.as_u16(), url, &body);
        error!("[RestClient] {}", err);
        Err(err)
    }

    fn status_error(status: u16, url: &str, body: &str) -> ApiError {
        let excerpt: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
        let message = if excerpt.is_empty() {
            format!("request to {} failed", url)
        } else if excerpt.len() < body.len() {
            format!("{}... (truncated)", excerpt)
        } else {
            excerpt
        };
        ApiError::Server { status, message }
    }
}
