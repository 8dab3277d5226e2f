// REST API authentication endpoints
//
// A successful login or registration that carries a `token` stores it in
// the shared slot, so subsequent calls on either generation are
// authenticated.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, info};

use crate::error::Error;
use crate::rest::client::RestClient;
use crate::rest::models::AuthResponse;

impl RestClient {
    /// `POST /auth/login` with `{email, password}`
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<AuthResponse, Error> {
        debug!(email, "logging in (rest)");
        let resp: AuthResponse = self
            .send(
                Method::POST,
                "auth/login",
                &json!({ "email": email, "password": password.expose_secret() }),
            )
            .await?;
        self.adopt_token(&resp)?;
        Ok(resp)
    }

    /// `POST /auth/register` with `{name, email, password}`
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, Error> {
        debug!(name, email, "registering (rest)");
        let resp: AuthResponse = self
            .send(
                Method::POST,
                "auth/register",
                &json!({ "name": name, "email": email, "password": password.expose_secret() }),
            )
            .await?;
        self.adopt_token(&resp)?;
        Ok(resp)
    }

    /// `POST /auth/logout`. The stored token is dropped whether or not the
    /// server call succeeds.
    pub async fn logout(&self) -> Result<(), Error> {
        debug!("logging out (rest)");
        let result = self.send_empty(Method::POST, "auth/logout").await;
        self.http().clear_token()?;
        result.map(|_| ())
    }

    fn adopt_token(&self, resp: &AuthResponse) -> Result<(), Error> {
        if let Some(token) = resp.token.as_deref().filter(|t| !t.is_empty()) {
            self.http().set_token(token)?;
            info!("stored rest api token");
        }
        Ok(())
    }
}
