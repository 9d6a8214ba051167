//! Registering client used by `devroute-client`.
//!
//! # Data Flow
//! ```text
//! port.rs (pick a free local port)
//!     → api.rs register
//!     → child process runs with PORT set
//!     → heartbeat.rs (periodic heartbeat until stopped)
//!     → api.rs unregister (best effort)
//!     → process.rs (SIGTERM, then kill after a grace period)
//! ```

pub mod api;
pub mod heartbeat;
pub mod port;
pub mod process;

pub use api::{ClientError, RegistrationClient};
pub use heartbeat::run_heartbeats;
pub use port::find_free_port;
pub use process::terminate;
