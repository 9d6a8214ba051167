//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → loader.rs (optional TOML file)
//!     → loader.rs (CLI flags / env: PORT, CONFIG_DIR, HEARTBEAT_TIMEOUT)
//!     → validation.rs (semantic checks)
//!     → RegistryConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{resolve_config, ConfigError, ConfigOverrides};
pub use schema::{LivenessConfig, ListenerConfig, ObservabilityConfig, RegistryConfig, RoutingConfig};
pub use validation::{validate_config, ValidationError};
