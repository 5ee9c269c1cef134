// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! End-to-end checks: simulator -> forwarder -> mock intake.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use event_forwarder::Forwarder;
use event_simulator::{validation, EventSender};
use log_ingestion::Config;

const TEST_KEY_B64: &str = "MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY=";

async fn spawn_forwarder(config: Config) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind forwarder listener");
    let addr = listener.local_addr().expect("failed to get local addr");
    let forwarder = Forwarder::new(Arc::new(config));
    tokio::spawn(async move {
        let _ = forwarder.run(listener).await;
    });
    addr
}

async fn spawn_pipeline() -> (mockito::ServerGuard, mockito::Mock, SocketAddr) {
    let mut intake = mockito::Server::new_async().await;
    let mock = intake
        .mock("POST", "/api/logs")
        .with_status(200)
        .with_body("OK")
        .expect_at_least(1)
        .create_async()
        .await;

    let config = Config {
        workspace_id: Some("test-ws".to_string()),
        shared_key: Some(TEST_KEY_B64.to_string()),
        url_override: Some(format!("{}/api/logs", intake.url())),
        ..Config::default()
    };
    let addr = spawn_forwarder(config).await;
    (intake, mock, addr)
}

#[tokio::test]
async fn validation_probes_pass_against_healthy_pipeline() {
    let (_intake, mock, addr) = spawn_pipeline().await;
    let sender = EventSender::new(&format!("http://{addr}"));

    let results = validation::probe_endpoints(&sender).await;
    assert_eq!(results.len(), 3);
    for result in &results {
        assert!(result.passed(), "{} failed: {}", result.endpoint, result.detail);
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn data_flow_batch_is_fully_delivered() {
    let (_intake, _mock, addr) = spawn_pipeline().await;
    let sender = EventSender::new(&format!("http://{addr}"));

    let (delivered, total) = validation::data_flow_check(&sender).await;
    assert_eq!(total, 5);
    assert_eq!(delivered, 5);
}

#[tokio::test]
async fn validation_probes_fail_without_credentials() {
    let addr = spawn_forwarder(Config::default()).await;
    let sender = EventSender::new(&format!("http://{addr}"));

    let results = validation::probe_endpoints(&sender).await;
    assert_eq!(results.len(), 3);
    for result in &results {
        assert_eq!(result.status, Some(500), "{} unexpectedly passed", result.endpoint);
        assert!(result.detail.contains("Missing workspace configuration"));
    }
}
