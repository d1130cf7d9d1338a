//! Domain model, errors, configuration and logging shared by both services.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use config::{IngestConfig, ServerConfig};
pub use error::{PortsError, Result, ValidationError};
pub use types::Port;
