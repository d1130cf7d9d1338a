//! Common test utilities and fixtures.

#![allow(dead_code)]

use ports_lib::core::{Port, ServerConfig};
use ports_lib::server::PortsServer;
use ports_lib::storage::PortRepository;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A server running on an ephemeral local port.
pub struct TestServer {
    pub server: Arc<PortsServer>,
    pub shutdown: CancellationToken,
    pub handle: JoinHandle<ports_lib::Result<()>>,
    pub address: String,
}

impl TestServer {
    /// Start a server backed by a fresh in-memory repository.
    pub async fn start() -> Self {
        Self::start_with(PortsServer::new(ServerConfig::new("127.0.0.1:0"))).await
    }

    /// Start a server backed by the given repository.
    pub async fn start_with_repository(repository: Arc<dyn PortRepository>) -> Self {
        Self::start_with(PortsServer::with_repository(
            ServerConfig::new("127.0.0.1:0"),
            repository,
        ))
        .await
    }

    async fn start_with(server: PortsServer) -> Self {
        let server = Arc::new(server);
        let shutdown = CancellationToken::new();
        let handle = {
            let server = Arc::clone(&server);
            let shutdown = shutdown.clone();
            tokio::spawn(async move { server.serve(shutdown).await })
        };
        let address = server.address().await.to_string();

        Self {
            server,
            shutdown,
            handle,
            address,
        }
    }

    /// Cancel the server and wait for it to drain.
    pub async fn stop(self) {
        self.shutdown.cancel();
        self.handle.await.unwrap().unwrap();
    }
}

pub fn new_ajman_port() -> Port {
    Port {
        id: "AEAJM".to_string(),
        name: "Ajman".to_string(),
        city: "Ajman".to_string(),
        country: "United Arab Emirates".to_string(),
        alias: vec!["foo-alias".to_string(), "bar-alias".to_string()],
        regions: vec!["foo-region".to_string(), "bar-region".to_string()],
        coordinates: vec![55.5136433, 25.4052165],
        province: "Ajman".to_string(),
        timezone: "Asia/Dubai".to_string(),
        unlocs: vec!["AEAJM".to_string()],
        code: "52000".to_string(),
    }
}

/// Ports expected from `testdata/3-ports.json`, keyed by ID.
pub fn three_ports() -> HashMap<String, Port> {
    let ports = vec![
        new_ajman_port(),
        Port {
            id: "AEAUH".to_string(),
            name: "Abu Dhabi".to_string(),
            city: "Abu Dhabi".to_string(),
            country: "United Arab Emirates".to_string(),
            alias: vec![],
            regions: vec![],
            coordinates: vec![54.37, 24.47],
            province: "Abu Z¸aby [Abu Dhabi]".to_string(),
            timezone: "Asia/Dubai".to_string(),
            unlocs: vec!["AEAUH".to_string()],
            code: "52001".to_string(),
        },
        Port {
            id: "AEDXB".to_string(),
            name: "Dubai".to_string(),
            city: "Dubai".to_string(),
            country: "United Arab Emirates".to_string(),
            alias: vec![],
            regions: vec![],
            coordinates: vec![55.27, 25.25],
            province: "Dubayy [Dubai]".to_string(),
            timezone: "Asia/Dubai".to_string(),
            unlocs: vec!["AEDXB".to_string()],
            code: "52005".to_string(),
        },
    ];
    ports.into_iter().map(|p| (p.id.clone(), p)).collect()
}

pub fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("testdata").join(name)
}

/// Write a ports document to a temporary file.
pub fn write_document(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// A document with `count` minimal ports named `P0000`, `P0001`, ...
pub fn generated_document(count: usize) -> String {
    let members: Vec<String> = (0..count)
        .map(|i| format!("\"P{i:04}\": {{\"name\": \"port {i}\", \"unlocs\": [\"P{i:04}\"]}}"))
        .collect();
    format!("{{{}}}", members.join(",\n"))
}

/// Index listed ports by ID, asserting IDs are unique.
pub fn by_id(ports: Vec<Port>) -> HashMap<String, Port> {
    let count = ports.len();
    let map: HashMap<String, Port> = ports.into_iter().map(|p| (p.id.clone(), p)).collect();
    assert_eq!(map.len(), count, "listing contains duplicate IDs");
    map
}
