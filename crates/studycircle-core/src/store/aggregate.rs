// ── Cross-store aggregator ──
//
// Owns one instance of every store so bulk operations (logout, "dismiss
// all errors") can fan out without callers naming each store.

use studycircle_api::{RestClient, RpcClient};

use crate::store::auth::AuthStore;
use crate::store::board::BoardStore;
use crate::store::catalog::CatalogStore;
use crate::store::community::CommunityStore;
use crate::store::enrollment::EnrollmentStore;
use crate::store::profile::ProfileStore;
use crate::store::status::StoreStatus;
use crate::store::study_group::StudyGroupStore;

/// Shared loading/error/reset primitives every store exposes.
pub trait StatefulStore {
    fn status_mut(&mut self) -> &mut StoreStatus;

    /// Drop all cached entities, selections, and status.
    fn reset(&mut self);

    fn clear_error(&mut self) {
        self.status_mut().clear_error();
    }

    fn set_loading(&mut self, loading: bool) {
        self.status_mut().set_loading(loading);
    }
}

macro_rules! impl_stateful_store {
    ($($store:ty),+ $(,)?) => {
        $(
            impl StatefulStore for $store {
                fn status_mut(&mut self) -> &mut StoreStatus {
                    &mut self.status
                }

                fn reset(&mut self) {
                    <$store>::reset(self);
                }
            }
        )+
    };
}

impl_stateful_store!(
    AuthStore,
    ProfileStore,
    CommunityStore,
    BoardStore,
    CatalogStore,
    EnrollmentStore,
    StudyGroupStore,
);

/// Every store for one backend.
pub struct Stores {
    pub auth: AuthStore,
    pub profile: ProfileStore,
    pub community: CommunityStore,
    pub board: BoardStore,
    pub catalog: CatalogStore,
    pub enrollment: EnrollmentStore,
    pub study_groups: StudyGroupStore,
}

impl Stores {
    pub fn new(rpc: &RpcClient, rest: &RestClient) -> Self {
        Self {
            auth: AuthStore::new(rpc.clone()),
            profile: ProfileStore::new(rpc.clone()),
            community: CommunityStore::new(rpc.clone()),
            board: BoardStore::new(rpc.clone()),
            catalog: CatalogStore::new(rpc.clone()),
            enrollment: EnrollmentStore::new(rpc.clone()),
            study_groups: StudyGroupStore::new(rest.clone()),
        }
    }

    fn each(&mut self) -> [&mut dyn StatefulStore; 7] {
        [
            &mut self.auth,
            &mut self.profile,
            &mut self.community,
            &mut self.board,
            &mut self.catalog,
            &mut self.enrollment,
            &mut self.study_groups,
        ]
    }

    pub fn clear_all_errors(&mut self) {
        for store in self.each() {
            store.clear_error();
        }
    }

    pub fn set_all_loading(&mut self, loading: bool) {
        for store in self.each() {
            store.set_loading(loading);
        }
    }

    pub fn reset_all(&mut self) {
        for store in self.each() {
            store.reset();
        }
    }

    /// First recorded error across all stores, for status lines.
    pub fn first_error(&self) -> Option<&str> {
        [
            self.auth.status(),
            self.profile.status(),
            self.community.status(),
            self.board.status(),
            self.catalog.status(),
            self.enrollment.status(),
            self.study_groups.status(),
        ]
        .into_iter()
        .find_map(StoreStatus::error)
    }

    pub fn any_loading(&self) -> bool {
        [
            self.auth.status(),
            self.profile.status(),
            self.community.status(),
            self.board.status(),
            self.catalog.status(),
            self.enrollment.status(),
            self.study_groups.status(),
        ]
        .into_iter()
        .any(StoreStatus::is_loading)
    }
}
