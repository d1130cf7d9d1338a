//! Configuration for the ports service and the ingest run.
//!
//! Both configurations are filled by the clap front ends in [`crate::cli`]
//! (flags with environment fallbacks) and validated before use.

use crate::core::{PortsError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default address of the ports service, for both binding and dialing.
pub const DEFAULT_ADDRESS: &str = ":9090";

/// Ports service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// TCP address to listen on. `:PORT` binds all interfaces, port `0` picks
    /// an ephemeral port.
    pub grpc_server_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            grpc_server_address: DEFAULT_ADDRESS.to_string(),
        }
    }
}

impl ServerConfig {
    /// Create a configuration listening on the given address.
    pub fn new(grpc_server_address: impl Into<String>) -> Self {
        Self {
            grpc_server_address: grpc_server_address.into(),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.grpc_server_address.trim().is_empty() {
            return Err(PortsError::config("GRPC_SERVER_ADDRESS must not be empty"));
        }
        Ok(())
    }

    /// Address in a form accepted by `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        bind_address(&self.grpc_server_address)
    }
}

/// Ingest run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Path to the JSON document with input ports. Required.
    pub ports_file_path: PathBuf,
    /// Address of the ports service.
    pub ports_service_address: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            ports_file_path: PathBuf::new(),
            ports_service_address: DEFAULT_ADDRESS.to_string(),
        }
    }
}

impl IngestConfig {
    /// Create a configuration for the given input file and service address.
    pub fn new(ports_file_path: impl Into<PathBuf>, ports_service_address: impl Into<String>) -> Self {
        Self {
            ports_file_path: ports_file_path.into(),
            ports_service_address: ports_service_address.into(),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.ports_file_path.as_os_str().is_empty() {
            return Err(PortsError::config("PORTS_FILE_PATH is required"));
        }
        if self.ports_service_address.trim().is_empty() {
            return Err(PortsError::config("PORTS_SVC_ADDRESS must not be empty"));
        }
        Ok(())
    }
}

/// Turn `:PORT` into an all-interfaces bind address.
pub fn bind_address(address: &str) -> String {
    let address = address.trim();
    if address.starts_with(':') {
        format!("0.0.0.0{address}")
    } else {
        address.to_string()
    }
}

/// Turn a service address into a URI a gRPC channel can dial.
///
/// `:PORT` dials the local host and bare `host:port` gets an `http://` scheme.
pub fn dial_uri(address: &str) -> String {
    let address = address.trim();
    if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else if address.starts_with(':') {
        format!("http://127.0.0.1{address}")
    } else {
        format!("http://{address}")
    }
}
