use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};

use gesture_typer::adapter::protocol::{create_event, create_frame, create_hello, PROTOCOL_VERSION};
use gesture_typer::adapter::server::{run_server, ServerConfig};
use gesture_typer::adapter::{apply_inbound, InboundCommand, InboundPayload, OutboundMessage};
use gesture_typer::core::Game;
use gesture_typer::input::HandObservation;
use gesture_typer::types::{GameMode, GestureLabel, Handedness};

struct Harness {
    addr: std::net::SocketAddr,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    server: tokio::task::JoinHandle<()>,
}

async fn start_server(max_pending_frames: usize) -> Harness {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        protocol_version: PROTOCOL_VERSION.to_string(),
        max_pending_frames,
    };

    let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending_frames);
    let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();

    let server = tokio::spawn(async move {
        let _ = run_server(config, cmd_tx, out_rx, Some(ready_tx)).await;
    });

    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .expect("server did not signal ready")
        .expect("ready channel dropped");

    Harness {
        addr,
        cmd_rx,
        out_tx,
        server,
    }
}

struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    write_half: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: std::net::SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect failed");
        let (read_half, write_half) = stream.into_split();
        Self {
            lines: BufReader::new(read_half).lines(),
            write_half,
        }
    }

    async fn send(&mut self, line: &str) {
        self.write_half.write_all(line.as_bytes()).await.unwrap();
        self.write_half.write_all(b"\n").await.unwrap();
        self.write_half.flush().await.unwrap();
    }

    async fn recv(&mut self) -> serde_json::Value {
        let line = tokio::time::timeout(Duration::from_secs(2), self.lines.next_line())
            .await
            .expect("timed out waiting for line")
            .unwrap()
            .expect("connection closed");
        serde_json::from_str(&line).unwrap()
    }

    async fn hello(&mut self, seq: u64) {
        let hello = create_hello(seq, "e2e-test", PROTOCOL_VERSION);
        self.send(&serde_json::to_string(&hello).unwrap()).await;
        let welcome = self.recv().await;
        assert_eq!(welcome["type"], "welcome");
        assert_eq!(welcome["seq"], seq);
    }
}

/// Frame line with the right hand detected first.
fn frame_line(seq: u64, ts: u64, left: GestureLabel, right: GestureLabel) -> String {
    let frame = create_frame(
        seq,
        ts,
        vec![
            HandObservation::new(Handedness::Right, right),
            HandObservation::new(Handedness::Left, left),
        ],
    );
    serde_json::to_string(&frame).unwrap()
}

#[tokio::test]
async fn adapter_hello_frame_and_broadcast() {
    let mut h = start_server(8).await;
    let mut client = Client::connect(h.addr).await;
    client.hello(1).await;

    client.send(r#"{"type":"start","seq":2,"ts":0}"#).await;
    client.send(&frame_line(3, 33, GestureLabel::Top, GestureLabel::One)).await;

    let start = tokio::time::timeout(Duration::from_secs(2), h.cmd_rx.recv())
        .await
        .unwrap()
        .expect("expected start");
    assert_eq!(start.seq, 2);
    assert!(matches!(start.payload, InboundPayload::Start));

    let frame = tokio::time::timeout(Duration::from_secs(2), h.cmd_rx.recv())
        .await
        .unwrap()
        .expect("expected frame");
    assert_eq!(frame.seq, 3);
    assert_eq!(frame.ts, 33);
    assert!(frame.received_ms >= start.received_ms);
    match &frame.payload {
        InboundPayload::Frame(f) => assert_eq!(f.hand_count(), 2),
        other => panic!("unexpected payload {other:?}"),
    }

    // Events from the game loop are broadcast.
    let mut game = Game::new(["a"]);
    apply_inbound(&mut game, &start.payload, start.received_ms);
    let events = apply_inbound(&mut game, &frame.payload, frame.received_ms);
    assert_eq!(events.len(), 1);
    h.out_tx
        .send(OutboundMessage::Broadcast {
            line: serde_json::to_string(&create_event(10, &events[0])).unwrap(),
        })
        .unwrap();

    let started = client.recv().await;
    assert_eq!(started["type"], "started");
    assert_eq!(started["seq"], 10);
    assert_eq!(started["target"], "a");

    h.server.abort();
}

#[tokio::test]
async fn adapter_requires_handshake() {
    let mut h = start_server(8).await;
    let mut client = Client::connect(h.addr).await;

    client.send(&frame_line(1, 0, GestureLabel::Top, GestureLabel::One)).await;
    let err = client.recv().await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["seq"], 1);
    assert_eq!(err["code"], "handshake_required");
    assert!(h.cmd_rx.try_recv().is_err());

    h.server.abort();
}

#[tokio::test]
async fn adapter_rejects_protocol_mismatch() {
    let h = start_server(8).await;
    let mut client = Client::connect(h.addr).await;

    let hello = create_hello(1, "e2e-test", "9.0.0");
    client.send(&serde_json::to_string(&hello).unwrap()).await;
    let err = client.recv().await;
    assert_eq!(err["code"], "protocol_mismatch");

    // Server closes the connection.
    let next = tokio::time::timeout(Duration::from_secs(2), client.lines.next_line())
        .await
        .unwrap()
        .unwrap();
    assert!(next.is_none());

    h.server.abort();
}

#[tokio::test]
async fn adapter_rejects_stale_seq_and_bad_json() {
    let mut h = start_server(8).await;
    let mut client = Client::connect(h.addr).await;
    client.hello(5).await;

    client.send(&frame_line(5, 0, GestureLabel::Top, GestureLabel::One)).await;
    let err = client.recv().await;
    assert_eq!(err["code"], "invalid_message");
    assert_eq!(err["seq"], 5);

    client.send(r#"{"type":"frame","seq":6,"ts":"soon"}"#).await;
    let err = client.recv().await;
    assert_eq!(err["code"], "invalid_message");
    assert_eq!(err["seq"], 6);

    client.send(r#"{"type":"calibrate","seq":7}"#).await;
    let err = client.recv().await;
    assert_eq!(err["code"], "invalid_message");
    assert_eq!(err["seq"], 7);

    assert!(h.cmd_rx.try_recv().is_err());
    h.server.abort();
}

#[tokio::test]
async fn adapter_backpressure_returns_error() {
    let mut h = start_server(1).await;
    let mut client = Client::connect(h.addr).await;
    client.hello(1).await;

    // Send two frames without draining cmd_rx; second should backpressure.
    client.send(&frame_line(2, 0, GestureLabel::Top, GestureLabel::One)).await;
    client.send(&frame_line(3, 33, GestureLabel::Top, GestureLabel::One)).await;

    let err = client.recv().await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["seq"], 3);
    assert_eq!(err["code"], "backpressure");

    let first = h.cmd_rx.recv().await.unwrap();
    assert_eq!(first.seq, 2);

    h.server.abort();
}

/// Game loop as `serve` runs it: timed at receipt, events broadcast.
fn spawn_game_loop(h: &mut Harness, sentence: &'static str) -> tokio::task::JoinHandle<Game> {
    let out_tx = h.out_tx.clone();
    let mut cmd_rx = std::mem::replace(&mut h.cmd_rx, mpsc::channel(1).1);
    tokio::spawn(async move {
        let mut game = Game::new([sentence]);
        let mut seq = 100;
        while let Some(cmd) = cmd_rx.recv().await {
            for event in apply_inbound(&mut game, &cmd.payload, cmd.received_ms) {
                seq += 1;
                let line = serde_json::to_string(&create_event(seq, &event)).unwrap();
                let _ = out_tx.send(OutboundMessage::Broadcast { line });
            }
            if game.mode() == GameMode::Finished {
                return game;
            }
        }
        game
    })
}

/// Event types up to and including `finished`, plus the `finished` message.
async fn collect_until_finished(client: &mut Client) -> (Vec<String>, serde_json::Value) {
    let mut types = Vec::new();
    loop {
        let v = client.recv().await;
        let ty = v["type"].as_str().unwrap().to_string();
        types.push(ty.clone());
        if ty == "finished" {
            return (types, v);
        }
    }
}

/// Longer than the 700ms letter gap, measured on the server clock.
const DWELL: Duration = Duration::from_millis(750);

#[tokio::test]
async fn adapter_closed_loop_types_a_sentence() {
    let mut h = start_server(8).await;
    let mut client = Client::connect(h.addr).await;
    client.hello(1).await;
    let game_loop = spawn_game_loop(&mut h, "hi");

    client.send(r#"{"type":"start","seq":2,"ts":0}"#).await;
    client.send(&frame_line(3, 0, GestureLabel::None, GestureLabel::None)).await;
    tokio::time::sleep(DWELL).await;
    client.send(&frame_line(4, 800, GestureLabel::Left, GestureLabel::Two)).await;
    // Still held: rejected.
    client.send(&frame_line(5, 900, GestureLabel::Left, GestureLabel::Two)).await;
    tokio::time::sleep(DWELL).await;
    client.send(&frame_line(6, 1_600, GestureLabel::Left, GestureLabel::Three)).await;

    let (types, finished) = collect_until_finished(&mut client).await;
    assert_eq!(types, vec!["started", "typed", "typed", "finished"]);
    assert!(finished["elapsed_ms"].as_u64().unwrap() >= 1_500);
    assert_eq!(finished["report"]["total_attempts"], 0);

    let game = game_loop.await.unwrap();
    assert_eq!(game.mode(), GameMode::Finished);
    h.server.abort();
}

#[tokio::test]
async fn adapter_timing_ignores_client_clock_stepping_back() {
    let mut h = start_server(8).await;
    let mut client = Client::connect(h.addr).await;
    client.hello(1).await;
    let game_loop = spawn_game_loop(&mut h, "abc");

    client.send(r#"{"type":"start","seq":2,"ts":1000000}"#).await;
    client.send(&frame_line(3, 1_000_000, GestureLabel::None, GestureLabel::None)).await;
    tokio::time::sleep(DWELL).await;
    client.send(&frame_line(4, 1_000_800, GestureLabel::Top, GestureLabel::One)).await;
    tokio::time::sleep(DWELL).await;
    // Recognizer restarted: its clock is now far behind.
    client.send(&frame_line(5, 10, GestureLabel::Top, GestureLabel::Two)).await;
    tokio::time::sleep(DWELL).await;
    client.send(&frame_line(6, 20, GestureLabel::Top, GestureLabel::Three)).await;

    let (types, finished) = collect_until_finished(&mut client).await;
    assert_eq!(types, vec!["started", "typed", "typed", "typed", "finished"]);
    assert!(finished["elapsed_ms"].as_u64().unwrap() >= 2_250);

    let game = game_loop.await.unwrap();
    assert_eq!(game.mode(), GameMode::Finished);
    assert_eq!(game.report().total_attempts, 0);
    h.server.abort();
}
