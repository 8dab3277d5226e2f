// RPC API client modules
//
// The current backend generation: every operation is
// `POST {base}/{Concept}/{action}` with a JSON body, and read-only queries
// are underscore-prefixed actions (`_getAllCommunities`). Each facade method
// normalizes the backend's inconsistent response shapes before returning.

pub mod auth;
pub mod board;
pub mod catalog;
pub mod client;
pub mod community;
pub mod enrollment;
pub mod models;
pub mod normalize;
pub mod profile;

pub use client::RpcClient;
