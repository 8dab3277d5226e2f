// RPC API HTTP client
//
// Thin layer over the shared `HttpClient`: builds `{Concept}/{action}`
// paths and posts JSON bodies. Endpoint families live in sibling modules
// as inherent methods so this file stays focused on call mechanics.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::trace;

use crate::error::Error;
use crate::http::HttpClient;
use crate::rpc::normalize;

/// Client for the concept-style RPC backend.
///
/// All methods return canonical, already-normalized values; callers never
/// see whether the backend wrapped a record in `{community: {...}}`, an
/// array, or nothing at all.
#[derive(Clone)]
pub struct RpcClient {
    http: HttpClient,
}

impl RpcClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// The shared HTTP client (token management, login signal).
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Invoke `{concept}/{action}` and return the raw JSON body.
    pub(crate) async fn call(&self, concept: &str, action: &str, body: Value) -> Result<Value, Error> {
        let path = format!("{concept}/{action}");
        trace!(%path, %body, "rpc call");
        self.http.send_json(Method::POST, &path, &body).await
    }

    /// Invoke an action whose response carries nothing the caller needs.
    pub(crate) async fn call_unit(&self, concept: &str, action: &str, body: Value) -> Result<(), Error> {
        let _ = self.call(concept, action, body).await?;
        Ok(())
    }

    /// Invoke an action that returns `{<field>: "<id>"}`.
    pub(crate) async fn call_for_id(
        &self,
        concept: &str,
        action: &str,
        field: &'static str,
        body: Value,
    ) -> Result<String, Error> {
        let value = self.call(concept, action, body).await?;
        normalize::id_field(&value, field)
    }

    /// Invoke a query returning at most one record.
    pub(crate) async fn query_one<T: DeserializeOwned>(
        &self,
        concept: &str,
        action: &str,
        field: &str,
        body: Value,
    ) -> Result<Option<T>, Error> {
        let value = self.call(concept, action, body).await?;
        normalize::single(value, field)
    }

    /// Invoke a query returning a list of records.
    pub(crate) async fn query_list<T: DeserializeOwned>(
        &self,
        concept: &str,
        action: &str,
        field: &str,
        body: Value,
    ) -> Result<Vec<T>, Error> {
        let value = self.call(concept, action, body).await?;
        normalize::list(value, field)
    }
}

/// Merge `session` into a serialized request struct.
pub(crate) fn with_session(session: &str, fields: serde_json::Result<Value>) -> Value {
    let mut body = match fields {
        Ok(Value::Object(map)) => Value::Object(map),
        _ => json!({}),
    };
    if let Value::Object(map) = &mut body {
        map.insert("session".into(), session.into());
    }
    body
}
