// Account endpoints: login, registration, current user.
//
// Login and registration bypass the 401 revocation path: a rejected
// credential is an authentication failure, not an expired session.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, info};

use crate::client::{ApiClient, decode_body, extract_message};
use crate::error::Error;
use crate::models::{LoginRequest, RegisterRequest, TokenResponse, UserRecord};

/// Result of a successful login or registration. The access token has
/// already been stored in the client's [`TokenStore`](crate::TokenStore).
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: UserRecord,
    pub refresh: Option<SecretString>,
}

impl ApiClient {
    /// Authenticate with email and password. `POST /auth/login`
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoginOutcome, Error> {
        let body = LoginRequest {
            email,
            password: password.expose_secret(),
        };
        let outcome = self.exchange_credentials("auth/login", &body).await?;
        info!(email, "logged in");
        Ok(outcome)
    }

    /// Create an account and log straight in. `POST /auth/register`
    pub async fn register(
        &self,
        email: &str,
        password: &SecretString,
        full_name: &str,
    ) -> Result<LoginOutcome, Error> {
        let body = RegisterRequest {
            email,
            password: password.expose_secret(),
            full_name,
        };
        let outcome = self.exchange_credentials("auth/register", &body).await?;
        info!(email, "registered");
        Ok(outcome)
    }

    /// The authenticated user. `GET /auth/me`
    pub async fn current_user(&self) -> Result<UserRecord, Error> {
        self.get("auth/me").await
    }

    /// Forget the bearer token. No request is made.
    pub fn logout(&self) {
        debug!("logging out");
        self.tokens().clear();
    }

    async fn exchange_credentials<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<LoginOutcome, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let raw = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: extract_message(status, &raw),
            });
        }

        let parsed: TokenResponse = decode_body(resp).await?;
        self.tokens().set(SecretString::from(parsed.token));
        Ok(LoginOutcome {
            user: parsed.user,
            refresh: parsed.refresh.map(SecretString::from),
        })
    }
}
