//! Local development hostname registry library.

pub mod client;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod routing;

pub use config::schema::RegistryConfig;
pub use http::RegistryServer;
pub use lifecycle::Shutdown;
pub use registry::{ClientRecord, Registry, RegistryError};
pub use routing::{ConfigPublisher, RoutingDocument};
