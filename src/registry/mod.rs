//! Client registration subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → name.rs (validate identifier, derive canonical id)
//!     → store.rs (mutate under the write lock)
//!     → routing::ConfigPublisher (regenerate artifact)
//!
//! sweeper.rs (every sweep interval)
//!     → store.rs expire_stale
//!     → routing::ConfigPublisher when anything was evicted
//! ```

pub mod name;
pub mod store;
pub mod sweeper;

pub use name::{canonicalize, validate};
pub use store::{ClientRecord, Registry, RegistryError};
pub use sweeper::ExpirySweeper;
