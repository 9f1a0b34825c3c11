//! TCP server for the recognizer adapter
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{info, warn};

use crate::input::HandFrame;
use crate::protocol::*;
use crate::runtime::{InboundCommand, InboundPayload, OutboundMessage};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
    pub max_pending_frames: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            protocol_version: PROTOCOL_VERSION.to_string(),
            max_pending_frames: 64,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let host = env::var("GESTURE_TYPER_HOST").unwrap_or(defaults.host);
        let port = env::var("GESTURE_TYPER_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);
        let max_pending_frames = env::var("GESTURE_TYPER_MAX_PENDING")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_pending_frames);

        Self {
            host,
            port,
            protocol_version: defaults.protocol_version,
            max_pending_frames,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid socket address {}:{}", self.host, self.port))
    }
}

/// Shared server state
pub struct ServerState {
    config: ServerConfig,
    clients: RwLock<Vec<ClientHandle>>,
    epoch: Instant,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            clients: RwLock::new(Vec::new()),
            epoch: Instant::now(),
        }
    }

    /// Monotonic milliseconds since the server started.
    pub fn clock_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    /// Check if the adapter is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("GESTURE_TYPER_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    async fn is_handshaken(&self, client_id: usize) -> bool {
        let clients = self.clients.read().await;
        clients
            .iter()
            .find(|c| c.id == client_id)
            .is_some_and(|c| c.handshaken)
    }

    /// Record `seq` for the client; false if it does not increase.
    async fn check_and_update_seq(&self, client_id: usize, seq: u64) -> bool {
        let mut clients = self.clients.write().await;
        let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
            return true;
        };
        match client.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                client.last_seq = Some(seq);
                true
            }
        }
    }
}

/// Handle to a connected client
pub struct ClientHandle {
    pub id: usize,
    pub addr: SocketAddr,
    pub handshaken: bool,
    pub last_seq: Option<u64>,
    pub tx: mpsc::UnboundedSender<ClientOutbound>, // Channel to send messages to client
}

#[derive(Debug, Clone)]
pub enum ClientOutbound {
    Line(String),
    Error(ErrorMessage),
    Welcome(WelcomeMessage),
}

/// Start the TCP server
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let bound = listener.local_addr()?;
    info!(%bound, "adapter listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState::new(config));
    let mut client_id_counter = 0usize;

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                let clients = state.clients.read().await;
                match msg {
                    OutboundMessage::ToClient { client_id, line } => {
                        if let Some(c) = clients.iter().find(|c| c.id == client_id) {
                            let _ = c.tx.send(ClientOutbound::Line(line));
                        }
                    }
                    OutboundMessage::Broadcast { line } => {
                        for c in clients.iter().filter(|c| c.handshaken) {
                            let _ = c.tx.send(ClientOutbound::Line(line.clone()));
                        }
                    }
                }
            }
        });
    }

    // Accept incoming connections
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;

        info!(client_id, %addr, "client connected");

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();

        // Spawn task to handle this client
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, addr, client_id, state, command_tx).await {
                warn!(client_id, "client error: {e:#}");
            }
            info!(client_id, "client disconnected");
        });
    }
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    addr: SocketAddr,
    client_id: usize,
    state: Arc<ServerState>,
    command_tx: mpsc::Sender<InboundCommand>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);

    // Channel to send messages to this client
    let (tx, mut rx) = mpsc::unbounded_channel::<ClientOutbound>();

    {
        let mut clients = state.clients.write().await;
        clients.push(ClientHandle {
            id: client_id,
            addr,
            handshaken: false,
            last_seq: None,
            tx: tx.clone(),
        });
    }

    // Spawn task to write messages to client
    let write_task = tokio::spawn(async move {
        let mut buf: Vec<u8> = Vec::with_capacity(1024);
        while let Some(msg) = rx.recv().await {
            buf.clear();
            let encoded = match msg {
                ClientOutbound::Line(line) => {
                    buf.extend_from_slice(line.as_bytes());
                    Ok(())
                }
                ClientOutbound::Error(err) => serde_json::to_writer(&mut buf, &err),
                ClientOutbound::Welcome(welcome) => serde_json::to_writer(&mut buf, &welcome),
            };
            if encoded.is_err() {
                continue;
            }
            buf.push(b'\n');
            if writer.write_all(&buf).await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let send_error = |seq: u64, code: ErrorCode, message: &str| {
        let _ = tx.send(ClientOutbound::Error(create_error(seq, code, message)));
    };

    // Handle incoming messages
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            // Client disconnected
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let parsed = match parse_message(trimmed) {
            Ok(parsed) => parsed,
            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                warn!(client_id, "dropping malformed message: {e}");
                send_error(
                    seq,
                    ErrorCode::InvalidMessage,
                    &format!("JSON parse error: {e}"),
                );
                continue;
            }
        };

        let seq = parsed.seq();
        let handshaken = state.is_handshaken(client_id).await;

        // Sequencing: enforce monotonic seq per sender once hello succeeded.
        if handshaken && !state.check_and_update_seq(client_id, seq).await {
            warn!(client_id, seq, "dropping out-of-order message");
            send_error(seq, ErrorCode::InvalidMessage, "seq must be strictly increasing");
            continue;
        }

        let (ts, payload) = match parsed {
            ParsedMessage::Hello(hello) => {
                if handshaken {
                    // Repeated hello just gets a fresh welcome.
                    let welcome =
                        create_welcome(seq, &state.config.protocol_version, client_id as u64);
                    let _ = tx.send(ClientOutbound::Welcome(welcome));
                    continue;
                }

                if !same_major(&hello.protocol_version, &state.config.protocol_version) {
                    send_error(
                        seq,
                        ErrorCode::ProtocolMismatch,
                        &format!("Protocol version {} not supported", hello.protocol_version),
                    );
                    break;
                }

                {
                    let mut clients = state.clients.write().await;
                    if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
                        client.handshaken = true;
                        client.last_seq = Some(seq);
                    }
                }
                info!(client_id, name = %hello.client.name, "handshake complete");

                let welcome =
                    create_welcome(seq, &state.config.protocol_version, client_id as u64);
                let _ = tx.send(ClientOutbound::Welcome(welcome));
                continue;
            }
            ParsedMessage::Start(start) => (start.ts, InboundPayload::Start),
            ParsedMessage::Frame(frame) => {
                (frame.ts, InboundPayload::Frame(HandFrame::new(frame.hands)))
            }
            ParsedMessage::Unknown(_) => {
                send_error(seq, ErrorCode::InvalidMessage, "Unknown message type");
                continue;
            }
        };

        if !handshaken {
            send_error(seq, ErrorCode::HandshakeRequired, "Send hello first");
            continue;
        }

        // Backpressure: bounded queue.
        match command_tx.try_send(InboundCommand {
            client_id,
            seq,
            ts,
            received_ms: state.clock_ms(),
            payload,
        }) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(client_id, seq, "inbound queue full");
                send_error(seq, ErrorCode::Backpressure, "Frame queue is full");
            }
            Err(TrySendError::Closed(_)) => {
                warn!(client_id, "game loop is gone");
                break;
            }
        }
    }

    {
        let mut clients = state.clients.write().await;
        clients.retain(|c| c.id != client_id);
    }

    // Cancel write task
    drop(tx);
    let _ = write_task.await;

    Ok(())
}

/// Versions are compatible when their major components match.
fn same_major(client: &str, server: &str) -> bool {
    fn major(v: &str) -> &str {
        v.split('.').next().unwrap_or_default()
    }
    !major(client).is_empty() && major(client) == major(server)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_major() {
        assert!(same_major("1.0.0", "1.0.0"));
        assert!(same_major("1.4", "1.0.0"));
        assert!(!same_major("2.0.0", "1.0.0"));
        assert!(!same_major("", "1.0.0"));
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 7878);
        assert_eq!(config.protocol_version, PROTOCOL_VERSION);
        assert_eq!(
            config.socket_addr().unwrap(),
            "127.0.0.1:7878".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_invalid_host_is_an_error() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_clock_is_monotonic() {
        let state = ServerState::new(ServerConfig::default());
        let first = state.clock_ms();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(state.clock_ms() >= first + 5);
    }

    #[test]
    fn test_server_config_from_env() {
        // This test just ensures it doesn't panic
        let _config = ServerConfig::from_env();
    }
}
