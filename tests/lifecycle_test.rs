//! Start/stop lifecycle tests.

use std::time::Duration;

use tinyserve::{Server, ServerError, ServerState, Shutdown, ValidationError};

mod common;

#[tokio::test]
async fn zero_prefixes_fails_before_any_bind() {
    let err = Server::builder()
        .get_route_text("/", "hi")
        .build()
        .expect_err("no prefixes must fail");
    assert!(err.errors().contains(&ValidationError::NoPrefixes));
}

#[tokio::test]
async fn stop_is_idempotent() {
    let (builder, _port) = common::localhost_builder();
    let mut server = builder
        .get_route_text("/", "hi")
        .build()
        .expect("valid config");
    server.start().await.expect("start");

    server.stop();
    server.stop();
    assert_eq!(server.state(), ServerState::Stopped);
    server.stopped().await;
}

#[tokio::test]
async fn stop_before_start_is_safe() {
    let (builder, _port) = common::localhost_builder();
    let server = builder
        .get_route_text("/", "hi")
        .build()
        .expect("valid config");
    server.stop();
    server.stop();
}

#[tokio::test]
async fn double_start_is_rejected() {
    let (builder, _port) = common::localhost_builder();
    let mut server = builder
        .get_route_text("/", "hi")
        .build()
        .expect("valid config");
    server.start().await.expect("first start");

    let err = server.start().await.expect_err("second start must fail");
    assert!(matches!(err, ServerError::AlreadyStarted));

    server.stop();
}

#[tokio::test]
async fn bind_conflict_propagates() {
    let (builder, port) = common::localhost_builder();
    let mut first = builder
        .get_route_text("/", "hi")
        .build()
        .expect("valid config");
    first.start().await.expect("first server start");

    let mut second = Server::builder()
        .localhost(port)
        .get_route_text("/", "hi")
        .build()
        .expect("valid config");
    let err = second.start().await.expect_err("second bind must fail");
    assert!(matches!(err, ServerError::Bind(_)));

    first.stop();
}

#[tokio::test]
async fn stop_releases_the_address_for_a_new_server() {
    let (builder, port) = common::localhost_builder();
    let mut first = builder
        .get_route_text("/", "first")
        .build()
        .expect("valid config");
    first.start().await.expect("first start");
    first.stop();
    drop(first);

    // The aborted accept tasks drop their listeners almost immediately.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let mut second = Server::builder()
        .localhost(port)
        .get_route_text("/", "second")
        .build()
        .expect("valid config");
    second.start().await.expect("rebind after stop");

    let response = reqwest::get(common::url(port, "/")).await.expect("request");
    assert_eq!(response.text().await.expect("body"), "second");

    second.stop();
}

#[tokio::test]
async fn external_shutdown_signal_stops_the_server() {
    let shutdown = Shutdown::new();
    let (builder, port) = common::localhost_builder();
    let mut server = builder
        .shutdown_signal(shutdown.clone())
        .get_route_text("/", "hi")
        .build()
        .expect("valid config");
    server.start().await.expect("start");

    let response = reqwest::get(common::url(port, "/")).await.expect("request");
    assert_eq!(response.status(), 200);

    shutdown.trigger();
    assert_eq!(server.state(), ServerState::Stopped);
    // stop() after an external trigger is still a clean no-op.
    server.stop();
}

#[tokio::test]
async fn dropping_the_server_stops_it() {
    let (builder, port) = common::localhost_builder();
    let mut server = builder
        .get_route_text("/", "hi")
        .build()
        .expect("valid config");
    server.start().await.expect("start");
    drop(server);

    tokio::time::sleep(Duration::from_millis(100)).await;

    // Connections are refused once the listeners are gone.
    let result = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .expect("client")
        .get(common::url(port, "/"))
        .send()
        .await;
    assert!(result.is_err());
}
