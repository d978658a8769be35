//! Prerender relay library.
//!
//! Decides per request whether a page should be served by a remote
//! rendering service, relays those requests upstream and re-encodes the
//! answer for the caller. Everything else goes to the origin application.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod prerender;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use prerender::{Prerender, PrerenderOptions, RelayOutcome};
