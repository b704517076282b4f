//! URL shortener: path → destination redirects resolved through an
//! ordered chain of lookup tables, with a terminal fallback.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod redirect;
pub mod source;

pub use config::schema::ShortenerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
