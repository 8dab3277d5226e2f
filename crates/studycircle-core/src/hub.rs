// ── Hub: one configured backend, wired ──
//
// Builds the shared HTTP client, both facade generations, and every store
// for a `ClientConfig`, then restores any persisted login.

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{debug, info};

use studycircle_api::{HttpClient, RestClient, RpcClient, Storage};

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::model::Session;
use crate::profile_lookup::ProfileLookup;
use crate::store::Stores;

/// Facades and stores for one backend.
///
/// `stores` is a public field so callers can borrow the auth store's
/// session and another store mutably in the same expression:
///
/// ```ignore
/// hub.stores.community
///     .fetch_community(&id)
///     .await;
/// hub.stores.board
///     .create_post(hub.stores.auth.session(), new_post)
///     .await?;
/// ```
pub struct Hub {
    config: ClientConfig,
    rpc: RpcClient,
    rest: RestClient,
    pub stores: Stores,
}

impl Hub {
    /// Wire everything for `config`, sharing `storage` between the HTTP
    /// client's bearer slot and the auth store.
    pub fn new(config: ClientConfig, storage: Arc<dyn Storage>) -> Result<Self, CoreError> {
        let transport = config.transport();
        let http = HttpClient::new(config.base_url.clone(), &transport, storage)?;
        let rpc = RpcClient::new(http.clone());
        let rest = RestClient::new(http);
        let mut stores = Stores::new(&rpc, &rest);

        if stores.auth.load_from_storage() {
            debug!(user = ?stores.auth.username(), "restored login");
        }

        Ok(Self {
            config,
            rpc,
            rest,
            stores,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    pub fn rest(&self) -> &RestClient {
        &self.rest
    }

    /// The live session, if logged in.
    pub fn session(&self) -> Option<&Session> {
        self.stores.auth.session()
    }

    /// Flips to `true` when the backend rejects the stored credentials.
    pub fn login_required(&self) -> watch::Receiver<bool> {
        self.rpc.http().login_required()
    }

    /// Drop the login if the backend has answered 401 since it was made.
    ///
    /// Cached entities are kept; only the user, session, and stored
    /// credentials go. Returns `true` when a login was cleared.
    pub fn expire_rejected_login(&mut self) -> bool {
        let rejected = *self.login_required().borrow();
        rejected && self.stores.auth.expire_rejected_login()
    }

    /// Batch profile lookups backed by the profile store.
    pub fn profile_lookup(&mut self) -> ProfileLookup<'_> {
        ProfileLookup::new(&mut self.stores.profile)
    }

    pub async fn login(&mut self, username: &str, password: &SecretString) -> Result<(), CoreError> {
        self.stores.auth.login(username, password).await
    }

    /// Log out and drop every cached entity.
    pub async fn logout(&mut self) {
        self.stores.auth.logout().await;
        self.stores.reset_all();
        info!("all stores reset");
    }
}
