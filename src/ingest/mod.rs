//! Ingest service: reads ports from a JSON document and stores them in the
//! ports service one by one.
//!
//! The run is sequential and fail-fast. The first decode or store error
//! aborts it; records stored before the error stay stored. Cancellation is
//! checked between records.

pub mod decoder;

pub use decoder::{PortEntry, PortStream};

use crate::client::PortsClient;
use crate::core::{logging, IngestConfig, PortsError, Result};
use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span};

/// Outcome of a completed ingest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Ports stored in the ports service.
    pub stored: usize,
    /// Whether the run stopped early on cancellation.
    pub cancelled: bool,
}

/// Ingest service bound to one input file and one ports service.
pub struct IngestService {
    config: IngestConfig,
    client: PortsClient,
    span: Span,
}

impl IngestService {
    /// Validate the configuration and connect to the ports service.
    pub async fn new(config: IngestConfig) -> Result<Self> {
        config.validate()?;

        let span = logging::component_span("ingest-service");
        span.in_scope(|| tracing::debug!(config = ?config, "Creating ingest service"));

        let client = PortsClient::connect(&config.ports_service_address).await?;

        Ok(Self {
            config,
            client,
            span,
        })
    }

    /// Replace the span run events are logged into.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Read every port from the input file and store it in the ports service.
    ///
    /// Consumes the service: the client is closed exactly once when the run
    /// ends, whatever the outcome. A close error is only returned when the
    /// run itself succeeded.
    pub async fn run(self, shutdown: CancellationToken) -> Result<IngestReport> {
        let Self {
            config,
            client,
            span,
        } = self;

        let result = async {
            tracing::info!(
                path = %config.ports_file_path.display(),
                server_address = client.address(),
                "Ingesting ports"
            );
            let ports = PortStream::open(&config.ports_file_path)?;
            ingest_ports(&client, ports, &shutdown).await
        }
        .instrument(span.clone())
        .await;

        let closed = client
            .close()
            .map_err(|e| PortsError::connection(format!("failed to close client connection: {}", e)));

        let report = result?;
        closed?;

        span.in_scope(|| {
            tracing::info!(stored = report.stored, cancelled = report.cancelled, "Ingest finished")
        });
        Ok(report)
    }
}

/// Store every entry of `ports` through `client`, in order.
///
/// Stops before the next entry once `shutdown` fires, and on the first
/// error, which is returned with the failing port ID attached.
pub async fn ingest_ports<S>(
    client: &PortsClient,
    mut ports: S,
    shutdown: &CancellationToken,
) -> Result<IngestReport>
where
    S: Stream<Item = Result<PortEntry>> + Unpin,
{
    let mut report = IngestReport::default();

    loop {
        if shutdown.is_cancelled() {
            tracing::info!(stored = report.stored, "Ingest cancelled");
            report.cancelled = true;
            break;
        }

        let Some(entry) = ports.next().await else {
            break;
        };
        let (id, port) = entry?;

        tracing::debug!(port_id = %id, "Storing port in ports service");
        client
            .store_port(&port)
            .await
            .map_err(|e| PortsError::store_port(id, e))?;
        report.stored += 1;
    }

    Ok(report)
}
