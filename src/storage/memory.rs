//! In-memory port repository.

use super::PortRepository;
use crate::core::{logging, Port, PortsError, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::Span;

/// Hash map of ports guarded by a reader/writer lock.
///
/// Writers exclude everyone, readers share. Each store is a single upsert
/// under the write lock, so there is no read-modify-write window.
pub struct InMemoryPortRepository {
    ports: RwLock<HashMap<String, Port>>,
    span: Span,
}

impl InMemoryPortRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::with_span(logging::component_span("in-memory-ports-repo"))
    }

    /// Create an empty repository logging into the given span.
    pub fn with_span(span: Span) -> Self {
        Self {
            ports: RwLock::new(HashMap::new()),
            span,
        }
    }

    #[cfg(test)]
    fn insert_raw(&self, key: &str, port: Port) {
        self.ports.write().insert(key.to_string(), port);
    }
}

impl Default for InMemoryPortRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PortRepository for InMemoryPortRepository {
    async fn store_port(&self, port: Port) -> Result<()> {
        self.span.in_scope(|| tracing::debug!(port_id = %port.id, "Storing port"));

        self.ports.write().insert(port.id.clone(), port);
        Ok(())
    }

    async fn list_ports(&self) -> Result<Vec<Port>> {
        self.span.in_scope(|| tracing::debug!("Listing ports"));

        let ports = self.ports.read();
        let mut result = Vec::with_capacity(ports.len());
        for (key, port) in ports.iter() {
            // A slot must hold the record it is keyed by.
            if port.id != *key {
                return Err(PortsError::internal(format!(
                    "slot {key} holds port with ID {:?}",
                    port.id
                )));
            }
            result.push(port.clone());
        }
        Ok(result)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.ports.read().len())
    }
}
