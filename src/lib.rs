//! Music API Relay Library

pub mod config;
pub mod crypto;
pub mod http;
pub mod modules;
pub mod observability;
pub mod routing;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use routing::RouteTable;
