//! HTTP registration API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, middleware: request ID, tracing, limits)
//!     → handlers.rs (parse request, call registry, regenerate artifact)
//!     → response.rs (JSON body + status code)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::ApiError;
pub use server::{AppState, RegistryServer};
