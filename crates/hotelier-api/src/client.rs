// Async HTTP client for the booking REST API.
//
// Base path: configurable, default http://localhost:8000/api/
// Auth: `Authorization: Bearer <token>` when a token is held

use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::auth::TokenStore;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Longest slice of a raw error body surfaced as a message.
const MAX_RAW_MESSAGE: usize = 200;

/// Async client for the booking API.
///
/// Cheap to clone: the underlying `reqwest::Client` and the token store
/// are both reference counted, so clones share connections and the
/// bearer token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub(crate) http: reqwest::Client,
    base_url: Url,
    tokens: TokenStore,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a base URL and transport settings.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            tokens: TokenStore::new(),
        })
    }

    /// Share a token store with other owners (session, persisted login).
    #[must_use]
    pub fn with_tokens(mut self, tokens: TokenStore) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"bookings/me"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match self.tokens.token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.request(Method::GET, url).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.request(Method::POST, url).json(body).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.request(Method::DELETE, url).send().await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            decode_body(resp).await
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: StatusCode, resp: reqwest::Response) -> Error {
        if status == StatusCode::UNAUTHORIZED {
            warn!("server rejected bearer token");
            self.tokens.revoke();
            return Error::Unauthorized;
        }

        let raw = resp.text().await.unwrap_or_default();
        let message = extract_message(status, &raw);

        match status {
            StatusCode::FORBIDDEN => Error::Forbidden { message },
            StatusCode::NOT_FOUND => Error::NotFound { message },
            _ => Error::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

pub(crate) async fn decode_body<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(MAX_RAW_MESSAGE).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw.trim())?;
    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&format!("{path}/"));
    Ok(url)
}

/// Pull the first human-readable message out of an error body.
///
/// Recognised shapes, in order: `{"message": ..}`, `{"detail": ..}`,
/// `{"error": ..}`, `{"non_field_errors": [..]}`, then the first field
/// error of a `{"field": ["msg", ..]}` map. A bare JSON string is used
/// as-is; any other body is surfaced raw (truncated). An empty body
/// falls back to the status line.
pub(crate) fn extract_message(status: StatusCode, raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return status.to_string();
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => {
            for key in ["message", "detail", "error"] {
                if let Some(msg) = map.get(key).and_then(first_text) {
                    return msg;
                }
            }
            if let Some(msg) = map.get("non_field_errors").and_then(first_text) {
                return msg;
            }
            map.iter()
                .find_map(|(field, value)| first_text(value).map(|msg| format!("{field}: {msg}")))
                .unwrap_or_else(|| status.to_string())
        }
        Ok(Value::String(s)) => s,
        Ok(other) => first_text(&other).unwrap_or_else(|| status.to_string()),
        Err(_) => trimmed.chars().take(MAX_RAW_MESSAGE).collect(),
    }
}

fn first_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_text),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let url = normalize_base_url("http://localhost:8000/api").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/");
        assert_eq!(
            url.join("bookings/me").unwrap().as_str(),
            "http://localhost:8000/api/bookings/me"
        );
    }

    #[test]
    fn message_key_wins() {
        let msg = extract_message(
            StatusCode::BAD_REQUEST,
            r#"{"message": "Room unavailable for selected dates", "detail": "x"}"#,
        );
        assert_eq!(msg, "Room unavailable for selected dates");
    }

    #[test]
    fn detail_and_non_field_errors() {
        assert_eq!(
            extract_message(StatusCode::FORBIDDEN, r#"{"detail": "Not allowed"}"#),
            "Not allowed"
        );
        assert_eq!(
            extract_message(
                StatusCode::BAD_REQUEST,
                r#"{"non_field_errors": ["Check-out must be after check-in"]}"#
            ),
            "Check-out must be after check-in"
        );
    }

    #[test]
    fn field_error_map_is_prefixed_with_field() {
        let msg = extract_message(
            StatusCode::BAD_REQUEST,
            r#"{"roomId": ["A valid integer is required."]}"#,
        );
        assert_eq!(msg, "roomId: A valid integer is required.");
    }

    #[test]
    fn raw_and_empty_bodies() {
        assert_eq!(
            extract_message(StatusCode::BAD_GATEWAY, "upstream down\n"),
            "upstream down"
        );
        assert_eq!(
            extract_message(StatusCode::INTERNAL_SERVER_ERROR, ""),
            "500 Internal Server Error"
        );
    }
}
