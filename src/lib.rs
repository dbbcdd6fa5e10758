//! Edge service: age calculator and Discord presence lookup behind
//! rate limiting, CORS and security headers.

pub mod config;
pub mod dates;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod presence;
pub mod security;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
