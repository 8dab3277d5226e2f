// REST API client modules
//
// The older backend generation: path + verb endpoints with numeric ids
// (`/study-groups/{id}/join`). Shares the HTTP client, and therefore the
// bearer token and 401 handling, with the RPC generation.

pub mod auth;
pub mod client;
pub mod groups;
pub mod models;
pub mod profile;

pub use client::RestClient;
