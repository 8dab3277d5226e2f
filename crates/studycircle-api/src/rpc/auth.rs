// RPC API authentication endpoints
//
// `login` is the one action whose response the backend shapes freely:
// `user` and `session` may each be a bare id or a full object.

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::Error;
use crate::rpc::client::RpcClient;
use crate::rpc::models::{LoginGrant, UserRecord};
use crate::rpc::normalize;

const CONCEPT: &str = "UserAuthentication";

impl RpcClient {
    /// Register a new account and return its user id.
    ///
    /// `POST /UserAuthentication/register`
    pub async fn register(&self, username: &str, password: &SecretString) -> Result<String, Error> {
        debug!(username, "registering user");
        self.call_for_id(
            CONCEPT,
            "register",
            "user",
            json!({ "username": username, "password": password.expose_secret() }),
        )
        .await
    }

    /// Log in and return the user and session identifiers.
    ///
    /// `POST /UserAuthentication/login`
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<LoginGrant, Error> {
        debug!(username, "logging in");
        let value = self
            .call(
                CONCEPT,
                "login",
                json!({ "username": username, "password": password.expose_secret() }),
            )
            .await?;
        parse_login(&value)
    }

    /// End a server-side session.
    ///
    /// `POST /UserAuthentication/logout`
    pub async fn logout(&self, session: &str) -> Result<(), Error> {
        debug!("logging out");
        self.call_unit(CONCEPT, "logout", json!({ "session": session }))
            .await
    }

    /// Look up a user by id.
    ///
    /// `POST /UserAuthentication/_getUserById`
    pub async fn get_user_by_id(&self, user: &str) -> Result<Option<UserRecord>, Error> {
        debug!(user, "fetching user");
        self.query_one(CONCEPT, "_getUserById", "user", json!({ "user": user }))
            .await
    }
}

fn parse_login(value: &Value) -> Result<LoginGrant, Error> {
    let record = match value {
        Value::Array(items) => items.first().unwrap_or(&Value::Null),
        other => other,
    };
    let user_id = normalize::id_field(record, "user")?;
    let session_id = normalize::id_field(record, "session")?;
    let user = record
        .get("user")
        .filter(|v| v.is_object())
        .and_then(|v| serde_json::from_value::<UserRecord>(v.clone()).ok());
    let expiry_time = record
        .get("expiryTime")
        .or_else(|| record.get("session").and_then(|s| s.get("expiryTime")))
        .and_then(Value::as_str)
        .map(String::from);
    Ok(LoginGrant {
        user_id,
        user,
        session_id,
        expiry_time,
    })
}
