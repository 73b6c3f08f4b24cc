use drum_core::Lane;
use drum_relay::{
    normalize_token, pump_lines, relay, run_source, serve, serve_incoming, RelayConfig, TriggerHub,
};
use futures_util::{stream, SinkExt, StreamExt};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

const WAIT: Duration = Duration::from_secs(5);

#[test]
fn normalize_trims_and_drops_blank_lines() {
    assert_eq!(normalize_token("KICK\r"), Some("KICK"));
    assert_eq!(normalize_token("  CYMBAL \t"), Some("CYMBAL"));
    assert_eq!(normalize_token(""), None);
    assert_eq!(normalize_token(" \r"), None);
    // content is not validated here
    assert_eq!(normalize_token("noise"), Some("noise"));
}

#[test]
fn config_defaults() {
    use clap::Parser;
    let config = RelayConfig::try_parse_from(["drum-relay"]).unwrap();
    assert_eq!(config.listen.to_string(), "127.0.0.1:8081");
    assert_eq!(config.reopen_delay(), Duration::from_secs(1));
    assert_eq!(config.buffer, 64);
    assert_eq!(config.baud, 9600);
    assert!(!config.reads_stdin());

    let stdin = RelayConfig::try_parse_from(["drum-relay", "--serial", "-"]).unwrap();
    assert!(stdin.reads_stdin());
}

#[test]
fn publish_without_clients_is_dropped() {
    let hub = TriggerHub::new(4);
    assert_eq!(hub.receiver_count(), 0);
    assert_eq!(hub.publish("KICK".into()), 0);
}

#[tokio::test]
async fn pump_forwards_trimmed_lines_in_order() {
    let hub = TriggerHub::new(16);
    let mut rx = hub.subscribe();
    let input: &[u8] = b"KICK\r\n\r\n CYMBAL\nHIGHTOM";

    let n = pump_lines(input, &hub).await.unwrap();
    assert_eq!(n, 3);
    assert_eq!(rx.recv().await.unwrap(), "KICK");
    assert_eq!(rx.recv().await.unwrap(), "CYMBAL");
    assert_eq!(rx.recv().await.unwrap(), "HIGHTOM");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn forwarded_tokens_map_to_lanes() {
    let hub = TriggerHub::new(16);
    let mut rx = hub.subscribe();
    pump_lines(&b"CYMBAL\r\nKICK\r\nHIGHTOM\r\n"[..], &hub)
        .await
        .unwrap();
    for lane in Lane::ALL {
        let token = rx.recv().await.unwrap();
        assert_eq!(Lane::from_sensor_token(&token), Some(lane));
    }
}

#[tokio::test]
async fn slow_receiver_loses_oldest_tokens() {
    let hub = TriggerHub::new(2);
    let mut rx = hub.subscribe();
    for token in ["KICK", "KICK", "CYMBAL", "HIGHTOM"] {
        hub.publish(token.into());
    }
    assert!(matches!(
        rx.recv().await,
        Err(tokio::sync::broadcast::error::RecvError::Lagged(2))
    ));
    assert_eq!(rx.recv().await.unwrap(), "CYMBAL");
    assert_eq!(rx.recv().await.unwrap(), "HIGHTOM");
}

async fn next_text<S>(ws: &mut S) -> String
where
    S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let msg = tokio::time::timeout(WAIT, ws.next())
            .await
            .expect("message in time")
            .expect("stream open")
            .expect("valid frame");
        if let Message::Text(text) = msg {
            return text;
        }
    }
}

async fn wait_for_clients(hub: &TriggerHub, n: usize) {
    tokio::time::timeout(WAIT, async {
        while hub.receiver_count() < n {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("clients subscribed");
}

#[tokio::test]
async fn broadcasts_to_every_client() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    let hub = TriggerHub::new(16);
    let server = tokio::spawn(serve(listener, hub.clone()));

    let (mut a, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
    let (mut b, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
    wait_for_clients(&hub, 2).await;

    pump_lines(&b"KICK\r\nHIGHTOM\r\n"[..], &hub).await.unwrap();

    assert_eq!(next_text(&mut a).await, "KICK");
    assert_eq!(next_text(&mut a).await, "HIGHTOM");
    assert_eq!(next_text(&mut b).await, "KICK");
    assert_eq!(next_text(&mut b).await, "HIGHTOM");

    server.abort();
}

#[tokio::test]
async fn client_messages_are_ignored_and_close_unsubscribes() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    let hub = TriggerHub::new(16);
    let server = tokio::spawn(serve(listener, hub.clone()));

    let (mut ws, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
    wait_for_clients(&hub, 1).await;

    ws.send(Message::Text("hello".into())).await.unwrap();
    hub.publish("CYMBAL".into());
    assert_eq!(next_text(&mut ws).await, "CYMBAL");

    ws.close(None).await.unwrap();
    tokio::time::timeout(WAIT, async {
        while hub.receiver_count() > 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("client task finished");

    server.abort();
}

#[tokio::test]
async fn accept_errors_do_not_stop_the_server() {
    let (client_io, server_io) = tokio::io::duplex(1024);
    let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
    let incoming = stream::iter(vec![
        Err(io::Error::from(io::ErrorKind::ConnectionAborted)),
        Err(io::Error::new(io::ErrorKind::Other, "too many open files")),
        Ok((server_io, peer)),
    ])
    .chain(stream::pending());
    let hub = TriggerHub::new(16);
    let server = tokio::spawn(serve_incoming(incoming, hub.clone()));

    let (mut ws, _) = tokio_tungstenite::client_async("ws://relay/", client_io)
        .await
        .unwrap();
    wait_for_clients(&hub, 1).await;
    hub.publish("HIGHTOM".into());
    assert_eq!(next_text(&mut ws).await, "HIGHTOM");
    assert!(!server.is_finished());

    server.abort();
}

async fn expect_token(rx: &mut tokio::sync::broadcast::Receiver<String>) -> String {
    tokio::time::timeout(WAIT, rx.recv())
        .await
        .expect("token in time")
        .expect("hub open")
}

#[tokio::test]
async fn source_is_reopened_after_eof() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ttyACM0");
    std::fs::write(&path, "KICK\r\n").unwrap();

    let hub = TriggerHub::new(16);
    let mut rx = hub.subscribe();
    let open_path = path.clone();
    let reader = tokio::spawn(run_source(
        "test device".to_string(),
        move || tokio::fs::File::open(open_path.clone()),
        hub.clone(),
        Duration::from_millis(20),
    ));

    assert_eq!(expect_token(&mut rx).await, "KICK");
    // same line again from the reopened source
    assert_eq!(expect_token(&mut rx).await, "KICK");
    assert!(!reader.is_finished());

    reader.abort();
}

#[tokio::test]
async fn missing_device_is_retried() {
    let dir = tempfile::tempdir().unwrap();
    let path: PathBuf = dir.path().join("ttyUSB9");

    let hub = TriggerHub::new(16);
    let mut rx = hub.subscribe();
    let open_path = path.clone();
    let reader = tokio::spawn(run_source(
        "test device".to_string(),
        move || tokio::fs::File::open(open_path.clone()),
        hub.clone(),
        Duration::from_millis(20),
    ));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!reader.is_finished());

    std::fs::write(&path, "CYMBAL\n").unwrap();
    assert_eq!(expect_token(&mut rx).await, "CYMBAL");

    reader.abort();
}

#[tokio::test]
async fn relay_forwards_a_stream_source_and_stops_with_it() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    let hub = TriggerHub::new(16);
    let (mut writer, reader) = tokio::io::duplex(64);

    let source_hub = hub.clone();
    let running = tokio::spawn(relay(listener, hub.clone(), async move {
        pump_lines(reader, &source_hub).await.map(|_| ())
    }));

    let (mut ws, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
    wait_for_clients(&hub, 1).await;

    writer.write_all(b"KICK\r\n\r\nCYMBAL\r\n").await.unwrap();
    assert_eq!(next_text(&mut ws).await, "KICK");
    assert_eq!(next_text(&mut ws).await, "CYMBAL");

    // end of input ends the relay
    drop(writer);
    tokio::time::timeout(WAIT, running)
        .await
        .expect("relay stopped")
        .unwrap()
        .unwrap();
}
