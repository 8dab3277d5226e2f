// Shared HTTP plumbing for both API generations
//
// Wraps `reqwest::Client` with base-URL joining, bearer-token injection
// from the persisted storage slot, and uniform response parsing: HTTP
// failures, `{"error": ...}` bodies returned with 200, and the 401
// "log in again" transition.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::Error;
use crate::storage::{Storage, TOKEN_KEY};
use crate::transport::TransportConfig;

/// Longest body excerpt carried in an error message.
const BODY_PREVIEW_CHARS: usize = 200;

/// HTTP client shared by the RPC and REST facades.
///
/// Cheap to clone: the reqwest client, storage, and login signal are all
/// reference-counted, so both facades observe the same token and the same
/// `login_required` transitions.
#[derive(Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: Url,
    storage: Arc<dyn Storage>,
    login_required: Arc<watch::Sender<bool>>,
    timeout_secs: u64,
}

impl HttpClient {
    /// Build a client from a transport config.
    ///
    /// `base_url` is the API root (e.g. `http://localhost:8000/api`); a
    /// trailing slash is added so relative paths join beneath it.
    pub fn new(
        base_url: Url,
        transport: &TransportConfig,
        storage: Arc<dyn Storage>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, storage, transport.timeout_secs()))
    }

    /// Wrap a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        storage: Arc<dyn Storage>,
        timeout_secs: u64,
    ) -> Self {
        let (login_required, _) = watch::channel(false);
        Self {
            http,
            base_url: normalize_base_url(base_url),
            storage,
            login_required: Arc::new(login_required),
            timeout_secs,
        }
    }

    /// The API root every path is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The persisted storage slot backing the bearer token.
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    // ── Credential slot ──────────────────────────────────────────────

    /// The bearer token currently attached to requests, if any.
    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY)
    }

    /// Persist a new bearer token and clear any pending login requirement.
    pub fn set_token(&self, token: &str) -> Result<(), Error> {
        self.storage.set(TOKEN_KEY, token)?;
        self.login_required.send_replace(false);
        Ok(())
    }

    /// Forget the bearer token.
    pub fn clear_token(&self) -> Result<(), Error> {
        self.storage.remove(TOKEN_KEY)
    }

    /// Subscribe to the "credentials rejected, log in again" signal.
    ///
    /// Flips to `true` whenever the backend answers 401.
    pub fn login_required(&self) -> watch::Receiver<bool> {
        self.login_required.subscribe()
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Join a relative path onto the API root.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Send a GET request with optional query parameters.
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");
        let builder = self.http.get(url).query(query);
        self.send(builder).await
    }

    /// Send a request with a JSON body.
    pub async fn send_json(&self, method: Method, path: &str, body: &Value) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");
        let builder = self.http.request(method, url).json(body);
        self.send(builder).await
    }

    /// Send a request without a body.
    pub async fn send_empty(&self, method: Method, path: &str) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");
        let builder = self.http.request(method, url);
        self.send(builder).await
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Value, Error> {
        let builder = match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        let resp = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_secs: self.timeout_secs,
                }
            } else {
                Error::Transport(e)
            }
        })?;
        self.handle_response(resp).await
    }

    /// Map a response into a JSON value or the matching error.
    async fn handle_response(&self, resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(%status, len = body.len(), "response received");

        if status == StatusCode::UNAUTHORIZED {
            self.on_unauthorized();
            return Err(Error::Authentication {
                message: parse_error_message(&body)
                    .unwrap_or_else(|| "session expired or invalid credentials".into()),
            });
        }

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: parse_error_message(&body).unwrap_or_else(|| preview(&body)),
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })?;

        // The backend reports many failures as `{"error": "..."}` with HTTP 200.
        if let Some(message) = embedded_error(&value) {
            return Err(Error::Application { message });
        }

        Ok(value)
    }

    fn on_unauthorized(&self) {
        warn!("credentials rejected by backend, login required");
        if let Err(e) = self.clear_token() {
            warn!(error = %e, "failed to clear stored token");
        }
        self.login_required.send_replace(true);
    }
}

/// Ensure the base path ends in `/` so `Url::join` appends rather than replaces.
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Extract the application error from a successful body, if present.
fn embedded_error(value: &Value) -> Option<String> {
    let err = value.as_object()?.get("error")?;
    match err {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => Some(
            map.get("message")
                .and_then(Value::as_str)
                .map_or_else(|| err.to_string(), String::from),
        ),
        other => Some(other.to_string()),
    }
}

/// Pull a human-readable message out of an error body.
///
/// Prefers `error` (string or `{message}`), then `message`.
fn parse_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    embedded_error(&value).or_else(|| {
        value
            .get("message")
            .and_then(Value::as_str)
            .map(String::from)
    })
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base_url_gains_trailing_slash() {
        let url = normalize_base_url(Url::parse("http://localhost:8000/api").unwrap());
        assert_eq!(url.as_str(), "http://localhost:8000/api/");
        assert_eq!(
            url.join("Community/_getAllCommunities").unwrap().path(),
            "/api/Community/_getAllCommunities"
        );
    }

    #[test]
    fn embedded_error_accepts_string_and_object() {
        assert_eq!(
            embedded_error(&json!({"error": "Name taken"})).as_deref(),
            Some("Name taken")
        );
        assert_eq!(
            embedded_error(&json!({"error": {"message": "Denied"}})).as_deref(),
            Some("Denied")
        );
        assert!(embedded_error(&json!({"error": null, "community": "c1"})).is_none());
        assert!(embedded_error(&json!([{"error": "x"}])).is_none());
    }

    #[test]
    fn error_message_falls_back_to_message_field() {
        assert_eq!(
            parse_error_message(r#"{"message":"Group is full"}"#).as_deref(),
            Some("Group is full")
        );
        assert!(parse_error_message("<html>502</html>").is_none());
    }
}
