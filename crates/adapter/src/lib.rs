//! Adapter module - recognizer input via TCP socket with JSON protocol
//!
//! This module lets an external gesture recognizer (a camera pipeline running
//! in any language) drive the game through a TCP socket connection, and
//! streams typing notifications back to it.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Start**: Client sends `start` once its camera is streaming
//! 4. **Frames**: Client sends one `frame` per camera frame with the detected hands
//! 5. **Events**: Server broadcasts typing events to every handshaken client
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Initial handshake with client info and protocol version
//! - **start**: Camera is ready; the first two-hand frame starts the game
//! - **frame**: Up to two hands, each with handedness, gesture label and score
//!
//! ## Server → Client
//!
//! - **welcome**: Response to hello
//! - **error**: Error response with code and message
//! - **started**, **typed**, **error_classified**, **report**, **sentence**,
//!   **finished**: game events
//!
//! # Ordering
//!
//! `seq` must increase strictly per client. Inbound messages reach the game
//! loop through a bounded queue; when it is full the client receives a
//! `backpressure` error and the frame is dropped. The server never touches
//! game state.
//!
//! # Environment Variables
//!
//! - `GESTURE_TYPER_HOST`: Bind address (default: "127.0.0.1")
//! - `GESTURE_TYPER_PORT`: Port number (default: 7878)
//! - `GESTURE_TYPER_MAX_PENDING`: Inbound queue capacity (default: 64)
//! - `GESTURE_TYPER_DISABLED`: Set to "1" or "true" to disable the adapter
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":0,"client":{"name":"cam","version":"0.1.0"},"protocol_version":"1.0.0"}
//! Server -> Client: {"type":"welcome","seq":1,"ts":1700000000000,"protocol_version":"1.0.0","client_id":1,"game_id":"gesture-typer"}
//! Client -> Server: {"type":"start","seq":2,"ts":0}
//! Client -> Server: {"type":"frame","seq":3,"ts":33,"hands":[{"handedness":"Left","gesture":"top","score":0.9},{"handedness":"Right","gesture":"one","score":0.8}]}
//! Server -> Client: {"type":"started","target":"the quick brown fox jumps over the lazy dog","seq":1,"ts":1700000000033}
//! ```
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7878
//! {"type":"hello","seq":1,"ts":0,"client":{"name":"nc","version":"0"},"protocol_version":"1.0.0"}
//! ```

pub mod protocol;
pub mod runtime;
pub mod server;

pub use gesture_typer_core as core;
pub use gesture_typer_input as input;
pub use gesture_typer_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use runtime::{apply_inbound, Adapter, InboundCommand, InboundPayload, OutboundMessage};
pub use server::{run_server, ServerConfig, ServerState};
