use serde::{Deserialize, Serialize};

/// Failure taxonomy for backend operations.
///
/// Every request failure is classified as either a client-side failure
/// (the request never produced an HTTP response) or a server-side
/// failure (a non-2xx status). Both render to a single descriptive
/// message via `Display`; nothing structured survives past the service
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure: network unreachable, timeout, or a
    /// malformed request/response below the HTTP status layer.
    #[error("Client error: {message}")]
    Client { message: String },

    /// The backend answered with a non-2xx status. The body is used
    /// only to compose the message, never parsed for error codes.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_message() {
        let err = ApiError::Client {
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "Client error: connection refused");
    }

    #[test]
    fn test_server_error_message_includes_status() {
        let err = ApiError::Server {
            status: 503,
            message: "service unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "Server error (503): service unavailable");
    }
}
