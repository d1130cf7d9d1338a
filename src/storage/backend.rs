//! Repository trait for port records.

use crate::core::{Port, Result};

/// Keyed store of ports.
///
/// Implementations must be safe for concurrent use. Validation is the
/// caller's job; a repository stores whatever it is given.
#[async_trait::async_trait]
pub trait PortRepository: Send + Sync {
    /// Insert or replace the port stored under `port.id`.
    async fn store_port(&self, port: Port) -> Result<()>;

    /// Independent copies of every stored port, in no particular order.
    async fn list_ports(&self) -> Result<Vec<Port>>;

    /// Number of stored ports.
    async fn count(&self) -> Result<usize>;
}
