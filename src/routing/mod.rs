//! Proxy routing document subsystem.
//!
//! # Data Flow
//! ```text
//! Registry mutation (register / unregister / expiry)
//!     → writer.rs (take snapshot under the publisher lock)
//!     → document.rs (snapshot → RoutingDocument → YAML)
//!     → writer.rs (temp file + atomic rename into the shared directory)
//!     → external proxy notices the file change and reloads
//! ```
//!
//! # Design Decisions
//! - Full regeneration on every change, never incremental patches
//! - Deterministic output: same live set, same bytes
//! - Write failures are logged and retried on the next change

pub mod document;
pub mod writer;

pub use document::{generate, RouteTemplate, RoutingDocument};
pub use writer::{ConfigPublisher, PublishError, PublishOutcome};
