//! Ports service gRPC client.

use crate::core::{config, logging, Port, PortsError, Result};
use crate::proto::pb::{self, port_service_client::PortServiceClient, StorePortRequest};
use tonic::transport::{Channel, Endpoint};
use tracing::Span;

/// Typed client for the ports service.
///
/// The channel is established eagerly by [`connect`](Self::connect) and
/// released by [`close`](Self::close) or when the client is dropped. Every
/// call is attempted exactly once; there are no retries.
pub struct PortsClient {
    client: PortServiceClient<Channel>,
    address: String,
    span: Span,
}

impl PortsClient {
    /// Connect to the ports service at `address` (`host:port`, `:port` or a
    /// full `http://` URI).
    pub async fn connect(address: &str) -> Result<Self> {
        Self::connect_with_span(address, logging::component_span("ports-client")).await
    }

    /// Connect, logging into the given span.
    pub async fn connect_with_span(address: &str, span: Span) -> Result<Self> {
        let uri = config::dial_uri(address);
        span.in_scope(|| tracing::debug!(server_address = %uri, "Dialing gRPC"));

        let endpoint = Endpoint::from_shared(uri.clone())
            .map_err(|e| PortsError::connection(format!("invalid address {}: {}", address, e)))?;
        let channel = endpoint
            .connect()
            .await
            .map_err(|e| PortsError::connection(format!("gRPC dial on {}: {}", uri, e)))?;

        Ok(Self {
            client: PortServiceClient::new(channel),
            address: uri,
            span,
        })
    }

    /// Store a port in the ports service.
    pub async fn store_port(&self, port: &Port) -> Result<()> {
        self.store(Some(pb::Port::from(port.clone()))).await
    }

    /// Send a store request with an optional payload. A `None` payload is
    /// rejected by the service.
    pub async fn store(&self, port: Option<pb::Port>) -> Result<()> {
        self.span.in_scope(|| {
            tracing::debug!(port_id = port.as_ref().map(|p| p.id.as_str()), "StorePort call")
        });

        self.client
            .clone()
            .store_port(StorePortRequest { port })
            .await
            .map_err(|status| PortsError::rpc("StorePort", status))?;
        Ok(())
    }

    /// List all ports stored in the ports service.
    pub async fn list_ports(&self) -> Result<Vec<Port>> {
        self.span.in_scope(|| tracing::debug!("ListPorts call"));

        let response = self
            .client
            .clone()
            .list_ports(())
            .await
            .map_err(|status| PortsError::rpc("ListPorts", status))?;

        Ok(response.into_inner().ports.into_iter().map(Port::from).collect())
    }

    /// URI this client is connected to.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Release the channel.
    ///
    /// Consumes the client, so it can only happen once.
    pub fn close(self) -> Result<()> {
        self.span
            .in_scope(|| tracing::debug!(server_address = %self.address, "Closing gRPC client"));
        drop(self.client);
        Ok(())
    }
}
