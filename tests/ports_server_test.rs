//! Ports server component tests.
//!
//! Drive a real server on an ephemeral port through the gRPC client.

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use ports_lib::client::PortsClient;
use ports_lib::core::Port;
use ports_lib::proto::pb;
use ports_lib::server::ServerState;
use ports_lib::storage::{InMemoryPortRepository, PortRepository};
use ports_lib::PortsError;
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::*;

#[tokio::test]
async fn test_store_ports() {
    let cases: Vec<(&str, Option<pb::Port>, bool, Vec<Port>)> = vec![
        ("nil port given", None, true, vec![]),
        ("empty port given", Some(pb::Port::default()), true, vec![]),
        (
            "valid port given",
            Some(new_ajman_port().into()),
            false,
            vec![new_ajman_port()],
        ),
        (
            "port with empty ID given",
            Some(Port { id: String::new(), ..new_ajman_port() }.into()),
            true,
            vec![],
        ),
        (
            "port with empty name given",
            Some(Port { name: String::new(), ..new_ajman_port() }.into()),
            true,
            vec![],
        ),
    ];

    for (name, input, expected_error, expected_ports) in cases {
        let server = TestServer::start().await;
        let client = PortsClient::connect(&server.address).await.unwrap();

        let result = client.store(input).await;
        assert_eq!(result.is_err(), expected_error, "{name}: {result:?}");

        let ports = client.list_ports().await.unwrap();
        assert_eq!(ports, expected_ports, "{name}");

        client.close().unwrap();
        server.stop().await;
    }
}

#[tokio::test]
async fn test_rejections_are_invalid_argument() {
    let server = TestServer::start().await;
    let client = PortsClient::connect(&server.address).await.unwrap();

    match client.store(None).await {
        Err(PortsError::Rpc { status, .. }) => {
            assert_eq!(status.code(), tonic::Code::InvalidArgument);
            assert_eq!(status.message(), "nil port given");
        },
        other => panic!("unexpected result: {other:?}"),
    }

    match client.store_port(&Port::new("AEAJM", "")).await {
        Err(PortsError::Rpc { status, .. }) => {
            assert_eq!(status.code(), tonic::Code::InvalidArgument);
            assert_eq!(status.message(), "validate port: name is required");
        },
        other => panic!("unexpected result: {other:?}"),
    }

    // A rejected request leaves the server usable.
    client.store_port(&new_ajman_port()).await.unwrap();
    assert_eq!(client.list_ports().await.unwrap().len(), 1);

    client.close().unwrap();
    server.stop().await;
}

#[tokio::test]
async fn test_last_write_wins() {
    let server = TestServer::start().await;
    let client = PortsClient::connect(&server.address).await.unwrap();

    client.store_port(&new_ajman_port()).await.unwrap();
    let updated = Port {
        name: "Ajman Port".to_string(),
        coordinates: vec![55.5, 25.4],
        alias: vec![],
        ..new_ajman_port()
    };
    client.store_port(&updated).await.unwrap();

    assert_eq!(client.list_ports().await.unwrap(), vec![updated]);
    assert_eq!(server.server.service().count().await.unwrap(), 1);

    client.close().unwrap();
    server.stop().await;
}

#[tokio::test]
async fn test_concurrent_stores_with_distinct_ids() {
    let server = TestServer::start().await;
    let client = Arc::new(PortsClient::connect(&server.address).await.unwrap());

    let mut handles = Vec::new();
    for i in 0..50 {
        let client = Arc::clone(&client);
        handles.push(tokio::spawn(async move {
            client.store_port(&Port::new(format!("P{i:03}"), format!("port {i}"))).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let ports = by_id(client.list_ports().await.unwrap());
    assert_eq!(ports.len(), 50);
    for i in 0..50 {
        assert_eq!(ports[&format!("P{i:03}")].name, format!("port {i}"));
    }

    drop(client);
    server.stop().await;
}

#[tokio::test]
async fn test_many_clients() {
    let server = TestServer::start().await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let address = server.address.clone();
        handles.push(tokio::spawn(async move {
            let client = PortsClient::connect(&address).await?;
            client.store_port(&Port::new(format!("C{i}"), "port")).await?;
            client.close()
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(server.server.service().count().await.unwrap(), 8);
    server.stop().await;
}

#[tokio::test]
async fn test_graceful_stop_keeps_state_observable() {
    let server = TestServer::start().await;
    assert_eq!(server.server.state(), ServerState::Listening);

    let client = PortsClient::connect(&server.address).await.unwrap();
    client.store_port(&new_ajman_port()).await.unwrap();
    client.close().unwrap();

    let inner = Arc::clone(&server.server);
    server.stop().await;
    assert_eq!(inner.state(), ServerState::Stopped);
    assert_eq!(inner.service().list_ports().await.unwrap(), vec![new_ajman_port()]);
}

#[tokio::test]
async fn test_client_dials_local_address_for_bare_port() {
    let server = TestServer::start().await;
    let port = server.address.rsplit(':').next().unwrap().to_string();

    let client = PortsClient::connect(&format!(":{port}")).await.unwrap();
    assert_eq!(client.address(), format!("http://127.0.0.1:{port}"));
    assert!(client.list_ports().await.unwrap().is_empty());

    client.close().unwrap();
    server.stop().await;
}

/// Repository whose stores take `delay` to complete.
struct SlowRepository {
    inner: InMemoryPortRepository,
    delay: Duration,
}

#[async_trait]
impl PortRepository for SlowRepository {
    async fn store_port(&self, port: Port) -> ports_lib::Result<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.store_port(port).await
    }

    async fn list_ports(&self) -> ports_lib::Result<Vec<Port>> {
        self.inner.list_ports().await
    }

    async fn count(&self) -> ports_lib::Result<usize> {
        self.inner.count().await
    }
}

#[tokio::test]
async fn test_in_flight_request_completes_while_draining() {
    let repository = Arc::new(SlowRepository {
        inner: InMemoryPortRepository::new(),
        delay: Duration::from_millis(500),
    });
    let TestServer {
        server,
        shutdown,
        handle,
        address,
    } = TestServer::start_with_repository(Arc::clone(&repository) as Arc<dyn PortRepository>).await;

    let client = PortsClient::connect(&address).await.unwrap();
    let in_flight = tokio::spawn(async move {
        let result = client.store_port(&new_ajman_port()).await;
        client.close().unwrap();
        result
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(1), async {
        while server.state() != ServerState::Draining {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("server never started draining");

    in_flight.await.unwrap().unwrap();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not finish draining")
        .unwrap()
        .unwrap();

    assert_eq!(server.state(), ServerState::Stopped);
    assert_eq!(repository.count().await.unwrap(), 1);
    assert_eq!(repository.list_ports().await.unwrap(), vec![new_ajman_port()]);
}
