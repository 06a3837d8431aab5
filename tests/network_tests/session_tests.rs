//! Tests for TCP sessions
//!
//! These tests verify:
//! - Greeting and READY on connect
//! - Plain and blob commands through the client
//! - Device errors surfacing as statuses
//! - Device state surviving across sessions

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use cmdlink::network::{Client, Server};
use cmdlink::{CmdlinkError, Config, SimulatedDevice, Status};

// =============================================================================
// Helper Functions
// =============================================================================

struct TestServer {
    addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    fn start() -> Self {
        let config = Config::builder().listen_addr("127.0.0.1:0").build();
        let mut server = Server::new(config);
        let addr = server.bind().unwrap();
        let shutdown = server.shutdown_handle();

        let handle = thread::spawn(move || {
            let mut device = SimulatedDevice::in_memory();
            server.run(&mut device).unwrap();
        });

        Self {
            addr,
            shutdown,
            handle: Some(handle),
        }
    }

    fn connect(&self) -> Client {
        let mut client = Client::connect(self.addr).unwrap();
        client.set_timeout(Some(Duration::from_secs(5))).unwrap();
        client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

// =============================================================================
// Session Tests
// =============================================================================

#[test]
fn test_banner_on_connect() {
    let server = TestServer::start();
    let client = server.connect();

    assert!(client
        .banner()
        .starts_with("Welcome to the avr-iot command handler!\r\n"));
    assert!(client.banner().contains("Command handler 1.3.0\r\n"));
}

#[test]
fn test_ping() {
    let server = TestServer::start();
    let mut client = server.connect();

    assert_eq!(client.command("MC+PING=hello").unwrap(), "MC+PONG=HELLO");
    assert_eq!(client.command("MC+VERSION=FIRMWARE").unwrap(), "0.4.9\r\n");
}

#[test]
fn test_device_error_status() {
    let server = TestServer::start();
    let mut client = server.connect();

    match client.command("MC+NOPE") {
        Err(CmdlinkError::Device(status)) => assert_eq!(status, Status::BAD_COMMAND),
        other => panic!("expected BadCommand, got {:?}", other),
    }

    // The session carries on after an error
    assert_eq!(client.command("MC+PING=1").unwrap(), "MC+PONG=1");
}

#[test]
fn test_blob_commands() {
    let server = TestServer::start();
    let mut client = server.connect();

    assert_eq!(
        client.command_with_blob("MC+BLOBTEST=5", b"abcde").unwrap(),
        "abcde"
    );
    assert_eq!(
        client
            .command_with_blob("MC+WINC+WRITEBLOB=0x40,2,4", b"A55A")
            .unwrap(),
        ""
    );
    assert_eq!(client.command("MC+WINC+READ=0x40,2").unwrap(), "A55A");
}

#[test]
fn test_echo_that_looks_like_status() {
    let server = TestServer::start();
    let mut client = server.connect();

    assert_eq!(client.command_with_blob("MC+BLOBTEST=2", b"OK").unwrap(), "OK");
    assert_eq!(
        client.command_with_blob("mc+blobtest=10", b"ERROR: 0x1").unwrap(),
        "ERROR: 0x1"
    );
    assert_eq!(client.command("MC+PING=1").unwrap(), "MC+PONG=1");
}

#[test]
fn test_echo_of_binary_blob() {
    let server = TestServer::start();
    let mut client = server.connect();

    let blob = [0xFF, 0x00, 0x80, b'O', b'K'];
    assert_eq!(client.echo(&blob).unwrap(), blob.to_vec());
    assert_eq!(client.command("MC+PING=2").unwrap(), "MC+PONG=2");
}

#[test]
fn test_blob_rejected_before_prompt() {
    let server = TestServer::start();
    let mut client = server.connect();

    match client.command_with_blob("MC+BLOBTEST=2000", b"x") {
        Err(CmdlinkError::Device(status)) => assert_eq!(status, Status::BAD_BLOB),
        other => panic!("expected BadBlob, got {:?}", other),
    }
}

#[test]
fn test_state_survives_reconnect() {
    let server = TestServer::start();
    {
        let mut client = server.connect();
        client.command("MC+SETLED=WIFI,ON").unwrap();
    }

    let mut client = server.connect();
    assert_eq!(client.command("MC+GETLED=WIFI").unwrap(), "LED:WIFI is ON");
}
