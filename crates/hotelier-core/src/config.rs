// ── Runtime client configuration ──
//
// Describes how to reach the booking service. Carries credentials and
// transport tuning but never touches disk; hotelier-config builds it.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Default API root of a local backend.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Email and password used to obtain a bearer token.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (staging servers with self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for talking to one booking backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `http://localhost:8000/api`.
    pub api_url: Url,
    /// Login credentials, when the caller wants an authenticated session.
    pub credentials: Option<Credentials>,
    /// A previously issued bearer token to resume with.
    pub token: Option<SecretString>,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            credentials: None,
            token: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    pub(crate) fn transport(&self) -> hotelier_api::TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => hotelier_api::TlsMode::System,
            TlsVerification::CustomCa(path) => hotelier_api::TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => hotelier_api::TlsMode::DangerAcceptInvalid,
        };
        hotelier_api::TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
