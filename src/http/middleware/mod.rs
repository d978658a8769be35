//! axum bindings for the prerender core.

pub mod prerender;

pub use prerender::{prerender_handler, prerender_middleware};
