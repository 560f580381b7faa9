//! Config server library: environment-sharded configuration documents with
//! cross-document references, served over HTTP.

pub mod admin;
pub mod engine;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod loaders;
pub mod observability;
pub mod settings;
pub mod store;

pub use error::{Error, Result};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use settings::ServerSettings;
pub use store::ConfigStore;
