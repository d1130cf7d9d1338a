//! Command-line front ends for the two binaries.
//!
//! Every flag falls back to an environment variable, so both services can be
//! configured purely through the environment.

use crate::core::{logging, IngestConfig, PortsError, Result, ServerConfig};
use crate::ingest::IngestService;
use crate::server::PortsServer;
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// Ports service: stores and serves port records over gRPC.
#[derive(Parser, Debug)]
#[command(name = "portssvc")]
#[command(version, about, long_about = None)]
pub struct PortsServiceCli {
    /// TCP address to listen on; port 0 picks an ephemeral port
    #[arg(long, env = "GRPC_SERVER_ADDRESS", default_value = ":9090")]
    pub grpc_server_address: String,

    /// Enable debug logging
    #[arg(short, long, env = "PORTS_DEBUG")]
    pub debug: bool,

    /// Validate configuration and exit
    #[arg(long)]
    pub check_config: bool,
}

impl PortsServiceCli {
    /// Build the server configuration.
    pub fn config(&self) -> Result<ServerConfig> {
        let config = ServerConfig::new(self.grpc_server_address.clone());
        config.validate()?;
        Ok(config)
    }
}

/// Ingest service: streams ports from a JSON file into the ports service.
#[derive(Parser, Debug)]
#[command(name = "ingestsvc")]
#[command(version, about, long_about = None)]
pub struct IngestCli {
    /// Path to the JSON file with input ports
    #[arg(long, env = "PORTS_FILE_PATH")]
    pub ports_file_path: Option<PathBuf>,

    /// Address of the ports service
    #[arg(long, env = "PORTS_SVC_ADDRESS", default_value = ":9090")]
    pub ports_svc_address: String,

    /// Enable debug logging
    #[arg(short, long, env = "PORTS_DEBUG")]
    pub debug: bool,

    /// Validate configuration and exit
    #[arg(long)]
    pub check_config: bool,
}

impl IngestCli {
    /// Build the ingest configuration. Fails when no input file is given.
    pub fn config(&self) -> Result<IngestConfig> {
        let path = self
            .ports_file_path
            .clone()
            .ok_or_else(|| PortsError::config("PORTS_FILE_PATH is required"))?;
        let config = IngestConfig::new(path, self.ports_svc_address.clone());
        config.validate()?;
        Ok(config)
    }
}

/// Root cancellation token, cancelled on SIGINT or SIGTERM.
pub fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let cancel = token.clone();
    tokio::spawn(async move {
        let signal = wait_for_signal().await;
        tracing::info!(signal, "Received shutdown signal - stopping application");
        cancel.cancel();
    });
    token
}

#[cfg(unix)]
async fn wait_for_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(terminate) => terminate,
        Err(e) => {
            tracing::warn!(error = %e, "Cannot listen for SIGTERM, only handling SIGINT");
            let _ = tokio::signal::ctrl_c().await;
            return "SIGINT";
        },
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> &'static str {
    let _ = tokio::signal::ctrl_c().await;
    "SIGINT"
}

/// Run the ports service until a shutdown signal arrives.
pub async fn run_ports_service(cli: PortsServiceCli) -> Result<()> {
    logging::init(cli.debug)?;
    let config = cli.config()?;

    if cli.check_config {
        println!("Configuration is valid!");
        println!("  GRPC server address: {}", config.grpc_server_address);
        return Ok(());
    }

    let server = PortsServer::new(config);
    server.serve(shutdown_token()).await?;

    tracing::info!("Ports service finished successfully");
    Ok(())
}

/// Run one ingest pass, stopping early on a shutdown signal.
pub async fn run_ingest(cli: IngestCli) -> Result<()> {
    logging::init(cli.debug)?;
    let config = cli.config()?;

    if cli.check_config {
        println!("Configuration is valid!");
        println!("  Ports file: {}", config.ports_file_path.display());
        println!("  Ports service address: {}", config.ports_service_address);
        return Ok(());
    }

    let shutdown = shutdown_token();
    let ingest = IngestService::new(config).await?;
    let report = ingest.run(shutdown).await?;

    tracing::info!(stored = report.stored, cancelled = report.cancelled, "Ingest service finished successfully");
    Ok(())
}

/// Log a fatal error and exit with a non-zero status.
pub fn exit_on_error(result: Result<()>) {
    if let Err(e) = result {
        tracing::error!(error = %e, category = e.category(), "Service stopped");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
