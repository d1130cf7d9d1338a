//! Ports - streaming ingestion of port records into a gRPC-backed store.
//!
//! Two cooperating services share this crate:
//!
//! - `portssvc` validates port records and keeps them in a concurrent
//!   in-memory repository, exposed through the `ports.v1.PortService` gRPC
//!   API.
//! - `ingestsvc` streams a large JSON document of ports and forwards the
//!   records one by one to `portssvc`.
//!
//! # Architecture
//!
//! - `core`: domain types, errors, configuration and logging
//! - `storage`: repository trait and the in-memory backend
//! - `service`: validation on top of the repository
//! - `server`: gRPC front end and its lifecycle
//! - `client`: typed gRPC client
//! - `ingest`: streaming decoder and the ingest driver
//! - `cli`: command-line front ends
//!
//! # Example
//!
//! ```no_run
//! use ports_lib::core::{IngestConfig, ServerConfig};
//! use ports_lib::ingest::IngestService;
//! use ports_lib::server::PortsServer;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let shutdown = CancellationToken::new();
//!     let server = Arc::new(PortsServer::new(ServerConfig::new(":0")));
//!     let serving = tokio::spawn({
//!         let server = Arc::clone(&server);
//!         let shutdown = shutdown.clone();
//!         async move { server.serve(shutdown).await }
//!     });
//!
//!     let address = server.address().await.to_string();
//!     let ingest = IngestService::new(IngestConfig::new("ports.json", address)).await?;
//!     let report = ingest.run(shutdown.clone()).await?;
//!     println!("stored {} ports", report.stored);
//!
//!     shutdown.cancel();
//!     serving.await??;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod client;
pub mod core;
pub mod ingest;
pub mod proto;
pub mod server;
pub mod service;
pub mod storage;

// Re-export core types for convenience
pub use crate::core::{Port, PortsError, Result};
