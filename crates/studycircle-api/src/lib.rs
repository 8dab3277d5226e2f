// studycircle-api: async client for the StudyCircle backend (RPC + REST)

pub mod error;
pub mod http;
pub mod rest;
pub mod rpc;
pub mod storage;
pub mod transport;

pub use error::Error;
pub use http::HttpClient;
pub use rest::RestClient;
pub use rpc::RpcClient;
pub use storage::{FileStorage, MemoryStorage, Storage, TOKEN_KEY};
pub use transport::{TlsMode, TransportConfig};
