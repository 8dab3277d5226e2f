//! Client-side data layer between `studycircle-api` and consumers (CLI).
//!
//! - **[`Hub`]**: builds the shared HTTP client, both facade generations,
//!   and every store for one backend; restores a persisted login.
//!
//! - **Stores** ([`store`]): one per backend concept (auth, profiles,
//!   communities, board, catalog, enrollments, study groups). Each mirrors
//!   server-owned entities in an [`EntityCollection`], applies mutations
//!   after the server accepts them, and exposes pure derived views.
//!
//! - **[`ProfileLookup`]**: batch profile fetching plus display-name and
//!   avatar derivations for lists of authors.
//!
//! - **Domain model** ([`model`]): canonical types keyed by [`EntityId`],
//!   converted from wire records in [`convert`].

pub mod config;
pub mod convert;
pub mod error;
pub mod hub;
pub mod model;
pub mod profile_lookup;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, TlsVerification};
pub use error::{CoreError, NOT_LOGGED_IN};
pub use hub::Hub;
pub use profile_lookup::{ProfileLookup, initials};
pub use store::{
    AuthStore, BoardStore, CatalogStore, CommunityStore, CourseDetails, EnrollmentStore,
    EntityCollection, ProfileStore, SectionDetails, StatefulStore, StoreStatus, Stores,
    StudyGroupStore,
};

pub use model::{
    Community, CommunityPatch, Course, CoursePatch, Enrollment, EnrollmentPatch, Entity, EntityId,
    Membership, MembershipPatch, NewPost, Post, PostPatch, ProfilePatch, Reply, ReplyPatch, Role,
    Section, SectionPatch, Session, StudyGroup, StudyGroupMember, StudySession, Term, TermPatch,
    User, UserProfile, dedupe_tags,
};
