//! Socket-level tests: a real listener on an ephemeral port.

use sdg_emulator::client::ScpiClient;
use sdg_emulator::config::ServerConfig;
use sdg_emulator::function_generator::InstrumentModel;
use sdg_emulator::network::EmulatorServer;
use sdg_emulator::{Engine, SharedEngine};
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

async fn start_server() -> SocketAddr {
    let config = ServerConfig {
        port: 0,
        ..Default::default()
    };
    let engine = SharedEngine::from(Engine::with_model(InstrumentModel::Sdg1032x));
    let server = EmulatorServer::bind(&config, engine).await.unwrap();
    let addr = server.local_addr().unwrap();
    let _handle = server.spawn();
    addr
}

#[tokio::test]
async fn query_over_tcp() {
    let addr = start_server().await;
    let client = ScpiClient::connect_once(&addr.to_string()).await.unwrap();

    assert_eq!(
        client.query("*IDN?").await.unwrap(),
        "Siglent Technologies,SDG1032X,SDG1XCBD5R6027,1.01.01.33R1B6"
    );
    assert_eq!(
        client.query_raw("c1:outp?").await.unwrap(),
        "C1:OUTP OFF,LOAD,HZ,PLRT,NOR\n"
    );
}

#[tokio::test]
async fn writes_are_silent_and_change_state() {
    let addr = start_server().await;
    let client = ScpiClient::connect_once(&addr.to_string()).await.unwrap();

    assert_eq!(client.send("C1:OUTP ON").await.unwrap(), None);
    assert_eq!(
        client.send("C1:OUTP?").await.unwrap().as_deref(),
        Some("C1:OUTP ON,LOAD,HZ,PLRT,NOR\n")
    );
}

#[tokio::test]
async fn stacked_commands_in_one_packet() {
    let addr = start_server().await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    stream
        .write_all(b"C2:OUTP PLRT,INVT\nBOGUS\nC2:OUTP?\r\n*OPC?\n")
        .await
        .unwrap();

    let mut lines = BufReader::new(stream).lines();
    assert_eq!(
        lines.next_line().await.unwrap().as_deref(),
        Some("C2:OUTP OFF,LOAD,HZ,PLRT,INVT")
    );
    assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("*OPC 1"));
}

#[tokio::test]
async fn connections_share_one_instrument() {
    let addr = start_server().await;
    let first = ScpiClient::connect_once(&addr.to_string()).await.unwrap();
    let second = ScpiClient::connect_once(&addr.to_string()).await.unwrap();

    first.write("C1:BSWV FRQ,44.4").await.unwrap();
    // `*OPC?` on the same connection orders the write before the next query.
    first.query("*OPC?").await.unwrap();

    let reply = second.query("C1:BSWV?").await.unwrap();
    assert!(reply.contains("FRQ,44.4HZ"), "{reply}");
}

#[tokio::test]
async fn client_disconnect_does_not_stop_server() {
    let addr = start_server().await;
    {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"*RST\nC1:OUTP ON").await.unwrap();
    }

    let client = ScpiClient::connect_once(&addr.to_string()).await.unwrap();
    assert_eq!(client.query("BUZZ?").await.unwrap(), "BUZZ ON");
}
