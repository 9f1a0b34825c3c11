//! Protocol module - JSON message types for the recognizer adapter
//!
//! Implements the line-delimited JSON protocol spoken by gesture recognizers.
//! All messages have: type, seq (sequence number), ts (timestamp in ms)

use serde::{Deserialize, Serialize};

use crate::core::{ErrorRecord, ErrorReport, GameEvent};
use crate::input::HandObservation;
use crate::types::Key;

/// Protocol version announced in `welcome`; clients must share the major.
pub const PROTOCOL_VERSION: &str = "1.0.0";

// ============== Client -> Game Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HelloType {
    #[default]
    #[serde(rename = "hello")]
    Hello,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StartType {
    #[default]
    #[serde(rename = "start")]
    Start,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FrameType {
    #[default]
    #[serde(rename = "frame")]
    Frame,
}

/// Client hello message (first message to establish connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: HelloType,
    pub seq: u64,
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

/// Camera is streaming; the game waits for the first two-hand frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: StartType,
    pub seq: u64,
    pub ts: u64,
}

/// One recognizer frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: FrameType,
    pub seq: u64,
    pub ts: u64,
    #[serde(default)]
    pub hands: Vec<HandObservation>,
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    HandshakeRequired,
    ProtocolMismatch,
    InvalidMessage,
    Backpressure,
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,
    pub game_id: String,
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// Game notification broadcast to every handshaken client.
#[derive(Debug, Clone, Serialize)]
pub struct EventMessage {
    #[serde(flatten)]
    pub body: EventBody,
    pub seq: u64,
    pub ts: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventBody {
    Started {
        target: Option<String>,
    },
    Typed {
        key: Key,
        buffer: String,
        matched: usize,
        mismatch: bool,
    },
    ErrorClassified {
        record: ErrorRecord,
    },
    Report {
        report: ErrorReport,
    },
    Sentence {
        target: String,
    },
    Finished {
        elapsed_ms: u64,
        report: ErrorReport,
    },
}

impl From<&GameEvent> for EventBody {
    fn from(event: &GameEvent) -> Self {
        match event {
            GameEvent::Started { target } => EventBody::Started {
                target: target.clone(),
            },
            GameEvent::KeyTyped {
                key,
                buffer,
                progress,
            } => EventBody::Typed {
                key: *key,
                buffer: buffer.clone(),
                matched: progress.matched,
                mismatch: progress.mismatch,
            },
            GameEvent::ErrorClassified(record) => EventBody::ErrorClassified {
                record: record.clone(),
            },
            GameEvent::ReportUpdated(report) => EventBody::Report { report: *report },
            GameEvent::SentenceCompleted { next } => EventBody::Sentence {
                target: next.clone(),
            },
            GameEvent::Finished { elapsed_ms, report } => EventBody::Finished {
                elapsed_ms: *elapsed_ms,
                report: *report,
            },
        }
    }
}

// ============== Message Parsing ==============

/// Parse a JSON message from a string
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "start")]
        Start(StartMessage),
        #[serde(rename = "frame")]
        Frame(FrameMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Start(m)) => Ok(ParsedMessage::Start(m)),
        Ok(InboundMessage::Frame(m)) => Ok(ParsedMessage::Frame(m)),
        Err(e) => {
            // Unknown message type is not a hard parse error for the protocol.
            #[derive(Debug, Deserialize)]
            struct TypeOnly<'a> {
                #[serde(rename = "type", borrow)]
                msg_type: Option<&'a str>,
                seq: Option<u64>,
            }
            let head = serde_json::from_str::<TypeOnly>(json)?;
            match head.msg_type {
                Some("hello" | "start" | "frame") => Err(e),
                _ => Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq: head.seq.unwrap_or(0),
                })),
            }
        }
    }
}

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Start(StartMessage),
    Frame(FrameMessage),
    Unknown(UnknownMessage),
}

impl ParsedMessage {
    pub fn seq(&self) -> u64 {
        match self {
            ParsedMessage::Hello(m) => m.seq,
            ParsedMessage::Start(m) => m.seq,
            ParsedMessage::Frame(m) => m.seq,
            ParsedMessage::Unknown(m) => m.seq,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

/// Pull `seq` out of a line that failed to parse.
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

// ============== Utility Functions ==============

/// Create a hello message
pub fn create_hello(seq: u64, client_name: &str, protocol_version: &str) -> HelloMessage {
    HelloMessage {
        msg_type: HelloType::Hello,
        seq,
        ts: current_timestamp_ms(),
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: protocol_version.to_string(),
    }
}

/// Create a frame message
pub fn create_frame(seq: u64, ts: u64, hands: Vec<HandObservation>) -> FrameMessage {
    FrameMessage {
        msg_type: FrameType::Frame,
        seq,
        ts,
        hands,
    }
}

/// Create a welcome message
pub fn create_welcome(seq: u64, protocol_version: &str, client_id: u64) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: protocol_version.to_string(),
        client_id: Some(client_id),
        game_id: "gesture-typer".to_string(),
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Wrap a game event for the wire
pub fn create_event(seq: u64, event: &GameEvent) -> EventMessage {
    EventMessage {
        body: EventBody::from(event),
        seq,
        ts: current_timestamp_ms(),
    }
}

/// Get current timestamp in milliseconds
pub(crate) fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
