//! gRPC front end of the ports service.
//!
//! [`PortsServer`] owns the listener lifecycle:
//!
//! - `NotStarted → Listening`: [`PortsServer::serve`] binds the configured
//!   address and publishes the resolved address once through a
//!   [`ReadySignal`].
//! - `Listening → Draining`: the cancellation token fires; no new
//!   connections are accepted, in-flight requests run to completion.
//! - `Draining → Stopped`: every in-flight request finished and `serve`
//!   returns.

pub mod ready;

pub use ready::ReadySignal;

use crate::core::{logging, Port, PortsError, Result, ServerConfig};
use crate::proto::pb::{
    self,
    port_service_server::{PortService, PortServiceServer},
    ListPortsResponse, StorePortRequest,
};
use crate::service::PortsService;
use crate::storage::{InMemoryPortRepository, PortRepository};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::{transport::Server, Request, Response, Status};
use tracing::{Instrument, Span};

/// Lifecycle of a [`PortsServer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// `serve` has not been called.
    NotStarted,
    /// Bound and accepting connections.
    Listening,
    /// Shutdown requested, finishing in-flight requests.
    Draining,
    /// `serve` returned.
    Stopped,
}

/// gRPC server for the ports domain service.
pub struct PortsServer {
    config: ServerConfig,
    service: PortsService,
    ready: ReadySignal<SocketAddr>,
    state: watch::Sender<ServerState>,
    started: AtomicBool,
    span: Span,
}

impl PortsServer {
    /// Create a server backed by a fresh in-memory repository.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_repository(config, Arc::new(InMemoryPortRepository::new()))
    }

    /// Create a server backed by the given repository.
    pub fn with_repository(config: ServerConfig, repository: Arc<dyn PortRepository>) -> Self {
        let span = logging::component_span("ports-server");
        span.in_scope(|| tracing::debug!(config = ?config, "Creating ports server"));

        let (state, _) = watch::channel(ServerState::NotStarted);
        Self {
            config,
            service: PortsService::new(repository),
            ready: ReadySignal::new(),
            state,
            started: AtomicBool::new(false),
            span,
        }
    }

    /// Replace the span server events are logged into.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Run the server until `shutdown` fires and in-flight requests finish.
    ///
    /// Fails if the address cannot be bound, if the transport stops
    /// abnormally, or if the server was already started.
    pub async fn serve(&self, shutdown: CancellationToken) -> Result<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(PortsError::server("server already started"));
        }

        let listener = match self.bind().await {
            Ok(listener) => listener,
            Err(e) => {
                self.state.send_replace(ServerState::Stopped);
                return Err(e);
            },
        };
        let address = match listener.local_addr() {
            Ok(address) => address,
            Err(e) => {
                self.state.send_replace(ServerState::Stopped);
                return Err(PortsError::server(format!("resolve listener address: {}", e)));
            },
        };

        self.state.send_replace(ServerState::Listening);
        self.ready.fire(address);
        self.span
            .in_scope(|| tracing::info!(address = %address, "Starting gRPC Ports server"));

        let state = &self.state;
        let span = self.span.clone();
        let drain = async move {
            shutdown.cancelled().await;
            span.in_scope(|| tracing::debug!("Stopping the gRPC server"));
            state.send_replace(ServerState::Draining);
        };

        let result = Server::builder()
            .add_service(PortServiceServer::new(GrpcPortService {
                service: self.service.clone(),
                span: self.span.clone(),
            }))
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), drain)
            .instrument(self.span.clone())
            .await;

        self.state.send_replace(ServerState::Stopped);
        match result {
            Ok(()) => {
                self.span.in_scope(|| tracing::info!("gRPC Ports server stopped"));
                Ok(())
            },
            Err(e) => {
                self.span
                    .in_scope(|| tracing::error!(error = %e, "gRPC Ports server failed"));
                Err(PortsError::server(format!("gRPC transport: {}", e)))
            },
        }
    }

    async fn bind(&self) -> Result<TcpListener> {
        let address = self.config.bind_address();
        TcpListener::bind(&address)
            .await
            .map_err(|e| PortsError::server(format!("listen TCP on {}: {}", address, e)))
    }

    /// Address the server is bound to.
    ///
    /// Waits until [`serve`](Self::serve) has bound its listener, so it must
    /// only be awaited once `serve` runs in another task.
    pub async fn address(&self) -> SocketAddr {
        self.ready.wait().await
    }

    /// Address the server is bound to, or `None` before `serve` binds.
    pub fn bound_address(&self) -> Option<SocketAddr> {
        self.ready.get()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ServerState {
        *self.state.borrow()
    }

    /// The domain service behind the RPC endpoints.
    pub fn service(&self) -> &PortsService {
        &self.service
    }
}

/// Translates between wire messages and the domain service.
///
/// Requests run on connection tasks spawned by the transport, so events are
/// entered into the server span explicitly.
struct GrpcPortService {
    service: PortsService,
    span: Span,
}

#[tonic::async_trait]
impl PortService for GrpcPortService {
    async fn store_port(
        &self,
        request: Request<StorePortRequest>,
    ) -> std::result::Result<Response<()>, Status> {
        let port = request.into_inner().port.map(Port::from);
        self.span.in_scope(|| {
            tracing::debug!(port_id = port.as_ref().map(|p| p.id.as_str()), "StorePort request")
        });

        self.service.store_port(port).await.map_err(|e| {
            self.span
                .in_scope(|| tracing::debug!(error = %e, "StorePort rejected"));
            Status::from(e)
        })?;

        Ok(Response::new(()))
    }

    async fn list_ports(
        &self,
        _request: Request<()>,
    ) -> std::result::Result<Response<ListPortsResponse>, Status> {
        self.span.in_scope(|| tracing::debug!("ListPorts request"));

        let ports = self.service.list_ports().await?;
        Ok(Response::new(ListPortsResponse {
            ports: ports.into_iter().map(pb::Port::from).collect(),
        }))
    }
}
