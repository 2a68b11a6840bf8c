// ── Core error types ──
//
// User-facing errors from hotelier-core. Consumers never see raw HTTP
// details: the `From<hotelier_api::Error>` impl translates transport
// failures into domain variants. Server messages are kept verbatim.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the booking service at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to the booking service timed out")]
    Timeout,

    // ── Session errors ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// The bearer token was rejected or is missing; the caller should
    /// send the user to the login view.
    #[error("Login required")]
    LoginRequired,

    #[error("Not permitted: {message}")]
    Forbidden { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// The server refused the request; `message` is shown as-is.
    #[error("{message}")]
    Rejected { message: String, status: u16 },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Unexpected response from the booking service: {message}")]
    InvalidResponse { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn is_login_required(&self) -> bool {
        matches!(self, Self::LoginRequired)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<hotelier_api::Error> for CoreError {
    fn from(err: hotelier_api::Error) -> Self {
        match err {
            hotelier_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            hotelier_api::Error::Unauthorized => CoreError::LoginRequired,
            hotelier_api::Error::Forbidden { message } => CoreError::Forbidden { message },
            hotelier_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                }
            }
            hotelier_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            hotelier_api::Error::Tls(reason) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {reason}"),
            },
            hotelier_api::Error::NotFound { message } => CoreError::NotFound { message },
            hotelier_api::Error::Api { status, message } => {
                CoreError::Rejected { message, status }
            }
            hotelier_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidResponse { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_message_is_verbatim() {
        let err = CoreError::from(hotelier_api::Error::Api {
            status: 409,
            message: "Room unavailable for selected dates".into(),
        });
        assert_eq!(err.to_string(), "Room unavailable for selected dates");
    }

    #[test]
    fn unauthorized_becomes_login_required() {
        let err = CoreError::from(hotelier_api::Error::Unauthorized);
        assert!(err.is_login_required());
    }
}
