// ── Entity stores ──
//
// One store per backend concept. Each owns its collections, a
// `StoreStatus`, and a facade handle; operations call the facade and
// reconcile the response into local state.

pub mod aggregate;
pub mod auth;
pub mod board;
pub mod catalog;
pub mod collection;
pub mod community;
pub mod enrollment;
pub mod profile;
pub mod status;
pub mod study_group;

pub use aggregate::{StatefulStore, Stores};
pub use auth::AuthStore;
pub use board::BoardStore;
pub use catalog::{CatalogStore, CourseDetails, SectionDetails};
pub use collection::EntityCollection;
pub use community::CommunityStore;
pub use enrollment::EnrollmentStore;
pub use profile::ProfileStore;
pub use status::StoreStatus;
pub use study_group::StudyGroupStore;
