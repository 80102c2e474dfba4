//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, dispatch by path and method)
//!     → request.rs (request ID, decode {endpoint, body})
//!     → translator (allow-list, defaults, identifier validation)
//!     → upstream.rs (POST to upstream API)
//!     → response.rs (relay reply, or map rejection to status)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod upstream;
pub mod welcome;

pub use request::X_REQUEST_ID;
pub use response::{ApiError, UpstreamReply};
pub use server::HttpServer;
pub use upstream::{UpstreamClient, UpstreamError};
