// REST API user profile endpoints

use reqwest::Method;
use tracing::debug;

use crate::error::Error;
use crate::rest::client::RestClient;
use crate::rest::models::{User, UserUpdate};

impl RestClient {
    /// `GET /user/profile`
    pub async fn get_user_profile(&self) -> Result<User, Error> {
        debug!("fetching user profile (rest)");
        self.get("user/profile", &[]).await
    }

    /// `PUT /user/profile`
    pub async fn update_user_profile(&self, update: &UserUpdate) -> Result<User, Error> {
        debug!("updating user profile (rest)");
        self.send(Method::PUT, "user/profile", update).await
    }
}
