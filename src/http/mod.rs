//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace/timeout/request-id layers)
//!     → request.rs (request ID)
//!     → middleware/prerender.rs (classify; relay or pass on)
//!     → origin.rs (next handler) when not prerendered or on service 5xx
//!     → Send to client
//! ```

pub mod middleware;
pub mod origin;
pub mod request;
pub mod server;

pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use server::{HttpServer, ServerError};
