//! Ports domain service.
//!
//! The only reader and writer of the repository. Validation is its single
//! business rule; everything else is passed straight through.

use crate::core::{logging, Port, PortsError, Result};
use crate::storage::PortRepository;
use std::sync::Arc;
use tracing::Span;

/// Stores and lists ports through a [`PortRepository`].
#[derive(Clone)]
pub struct PortsService {
    repository: Arc<dyn PortRepository>,
    span: Span,
}

impl PortsService {
    /// Create a service over the given repository.
    pub fn new(repository: Arc<dyn PortRepository>) -> Self {
        Self::with_span(repository, logging::component_span("ports-service"))
    }

    /// Create a service logging into the given span.
    pub fn with_span(repository: Arc<dyn PortRepository>, span: Span) -> Self {
        Self { repository, span }
    }

    /// Validate and store a port. `None` is rejected with
    /// [`PortsError::MissingPort`].
    pub async fn store_port(&self, port: Option<Port>) -> Result<()> {
        let Some(port) = port else {
            self.span.in_scope(|| tracing::debug!("Rejecting store request without a port"));
            return Err(PortsError::MissingPort);
        };
        self.span.in_scope(|| tracing::debug!(port_id = %port.id, "Storing port"));

        port.validate()?;

        self.repository.store_port(port).await
    }

    /// List every stored port, in no particular order.
    pub async fn list_ports(&self) -> Result<Vec<Port>> {
        self.span.in_scope(|| tracing::debug!("Listing ports"));
        self.repository.list_ports().await
    }

    /// Number of stored ports.
    pub async fn count(&self) -> Result<usize> {
        self.repository.count().await
    }
}
