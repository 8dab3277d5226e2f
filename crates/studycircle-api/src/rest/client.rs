// REST API HTTP client
//
// Typed wrappers around the shared `HttpClient` verbs. Responses decode
// straight into models; the REST backend does not wrap records.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::trace;

use crate::error::Error;
use crate::http::HttpClient;

/// Client for the path-based REST backend.
#[derive(Clone)]
pub struct RestClient {
    http: HttpClient,
}

impl RestClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let value = self.http.get(path, query).await?;
        decode(value)
    }

    pub(crate) async fn send<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(|e| Error::Deserialization {
            message: format!("failed to encode request: {e}"),
            body: String::new(),
        })?;
        trace!(%method, path, "rest call");
        let value = self.http.send_json(method, path, &body).await?;
        decode(value)
    }

    /// Send a bodiless request and discard whatever comes back.
    pub(crate) async fn send_empty(&self, method: Method, path: &str) -> Result<Value, Error> {
        self.http.send_empty(method, path).await
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    serde_json::from_value(value.clone()).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: value.to_string(),
    })
}
