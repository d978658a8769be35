//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → optional TOML file (loader.rs)
//!     → PRERENDER_* environment overrides (loader.rs)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → PrerenderOptions shared via Arc by every request
//! ```
//!
//! # Design Decisions
//! - Config is resolved once at startup and never re-read per request
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_with, load_from_env, ConfigError};
pub use schema::{
    ListenerConfig, LogFormat, ObservabilityConfig, OriginConfig, PrerenderSettings, RelayConfig,
    TimeoutConfig,
};
pub use validation::ValidationError;
