//! iiko API gateway library.
//!
//! Accepts simplified `{endpoint, body}` requests, shapes them into the exact
//! payloads the iiko Cloud API expects, forwards them, and relays the reply.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod translator;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use translator::{translate, OutboundRequest, TranslateError, Translator};
