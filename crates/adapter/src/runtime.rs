//! Adapter runtime integration.
//!
//! Bridges the sync game loop with the async TCP server. The server only
//! queues inbound messages; [`Game`] is mutated by whoever drains the queue.

use anyhow::Context;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::core::{FrameEvents, Game, GameEvent};
use crate::input::{gesture_pair, HandFrame};
use crate::protocol::create_event;
use crate::server::{run_server, ServerConfig, ServerState};

/// Message delivered to the game loop.
#[derive(Debug, Clone)]
pub struct InboundCommand {
    pub client_id: usize,
    pub seq: u64,
    /// Sender's clock, in milliseconds. Informational only.
    pub ts: u64,
    /// Server clock at receipt (see [`ServerState::clock_ms`]). Games are
    /// timed on this one.
    pub received_ms: u64,
    pub payload: InboundPayload,
}

/// Inbound payload.
#[derive(Debug, Clone)]
pub enum InboundPayload {
    /// Camera is up.
    Start,
    Frame(HandFrame),
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClient { client_id: usize, line: String },
    Broadcast { line: String },
}

/// Apply one inbound payload to the game at `now_ms`.
///
/// Frames without exactly two known hands are dropped here, before they can
/// reach the debouncer.
pub fn apply_inbound(game: &mut Game, payload: &InboundPayload, now_ms: u64) -> FrameEvents {
    match payload {
        InboundPayload::Start => {
            game.camera_ready(now_ms);
            FrameEvents::new()
        }
        InboundPayload::Frame(frame) => match gesture_pair(frame) {
            Some(pair) => game.handle_frame(pair, now_ms),
            None => {
                debug!(hands = frame.hand_count(), "frame dropped");
                FrameEvents::new()
            }
        },
    }
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    next_seq: u64,
}

impl Adapter {
    /// Start the adapter from environment variables.
    ///
    /// Returns `Ok(None)` if `GESTURE_TYPER_DISABLED` is set.
    pub fn start_from_env() -> anyhow::Result<Option<Self>> {
        if ServerState::is_disabled() {
            return Ok(None);
        }
        Self::start(ServerConfig::from_env()).map(Some)
    }

    pub fn start(config: ServerConfig) -> anyhow::Result<Self> {
        let max_pending = config.max_pending_frames.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();

        let rt = Runtime::new().context("failed to create tokio runtime")?;
        rt.spawn(async move {
            if let Err(e) = run_server(config, cmd_tx, out_rx, None).await {
                error!("adapter server stopped: {e:#}");
            }
        });

        Ok(Self {
            _rt: rt,
            cmd_rx,
            out_tx,
            next_seq: 1,
        })
    }

    /// Block until the next inbound message; `None` once the server is gone.
    ///
    /// Must not be called from inside the adapter's runtime.
    pub fn recv_blocking(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.blocking_recv()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }

    /// Broadcast game events to every handshaken client.
    pub fn publish(&mut self, events: &[GameEvent]) {
        for event in events {
            let seq = self.next_seq;
            self.next_seq += 1;
            match serde_json::to_string(&create_event(seq, event)) {
                Ok(line) => self.send(OutboundMessage::Broadcast { line }),
                Err(e) => error!("failed to encode event: {e}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::HandObservation;
    use crate::types::{GameMode, GestureLabel, Handedness};

    fn frame(left: GestureLabel, right: GestureLabel) -> InboundPayload {
        InboundPayload::Frame(HandFrame::new(vec![
            HandObservation::new(Handedness::Right, right),
            HandObservation::new(Handedness::Left, left),
        ]))
    }

    #[test]
    fn test_start_then_frames_drive_the_game() {
        let mut game = Game::new(["a"]);
        assert!(apply_inbound(&mut game, &InboundPayload::Start, 0).is_empty());
        assert_eq!(game.mode(), GameMode::Ready);

        let events = apply_inbound(&mut game, &frame(GestureLabel::Top, GestureLabel::One), 10);
        assert!(matches!(events.as_slice(), [GameEvent::Started { .. }]));

        let events = apply_inbound(&mut game, &frame(GestureLabel::Top, GestureLabel::One), 711);
        assert!(matches!(events.last(), Some(GameEvent::Finished { .. })));
    }

    #[test]
    fn test_one_hand_frame_is_dropped() {
        let mut game = Game::new(["a"]);
        apply_inbound(&mut game, &InboundPayload::Start, 0);

        let one_hand = InboundPayload::Frame(HandFrame::new(vec![HandObservation::new(
            Handedness::Left,
            GestureLabel::Top,
        )]));
        assert!(apply_inbound(&mut game, &one_hand, 10).is_empty());
        assert_eq!(game.mode(), GameMode::Ready);
    }
}
