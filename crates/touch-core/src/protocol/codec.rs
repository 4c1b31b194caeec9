//! JSON codec for the socket wire format.
//!
//! Wire format: one UTF-8 JSON object per connection, no framing, no version
//! field.
//!
//! ```json
//! {"type":"click","x":100,"y":200}
//! {"type":"scroll","x":50,"y":50,"deltaY":2.0}
//! {"type":"drag","startX":0,"startY":0,"x":10,"y":10}
//! {"type":"dragend"}
//! ```
//!
//! # Permissive decoding
//!
//! The protocol has no schema negotiation, so the decoder accepts anything
//! that is a JSON object and fills the gaps:
//!
//! - A missing or non-string `type`, or an unknown one, decodes to
//!   [`InputCommand::Unrecognized`] (a no-op downstream).
//! - A missing coordinate, or one that is not an integral number inside the
//!   `i32` range, is `0`.
//! - A missing or non-numeric `deltaY` is `0.0`.
//! - Unknown fields (clients commonly add a `timestamp`) are ignored.
//!
//! Only input that is not a JSON object at all is rejected, with
//! [`DecodeError::Malformed`].

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::trace;

use crate::domain::geometry::Point;
use crate::protocol::command::{CommandKind, InputCommand};

/// Maximum number of bytes read from one connection.  Anything past this is
/// dropped by the reader before decoding.
pub const MAX_PAYLOAD_BYTES: usize = 2048;

/// Errors that can occur while decoding a payload.
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    /// The bytes are not a JSON object (truncated, not UTF-8, wrong shape).
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Error returned when a command cannot be serialized.
#[derive(Debug, Error)]
#[error("failed to encode command: {0}")]
pub struct EncodeError(#[from] serde_json::Error);

/// Canonical outbound record.  Fields that do not apply to a kind are omitted.
#[derive(Serialize)]
struct WireRecord<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    x: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    y: Option<i32>,
    #[serde(rename = "deltaY", skip_serializing_if = "Option::is_none")]
    delta_y: Option<f64>,
    #[serde(rename = "startX", skip_serializing_if = "Option::is_none")]
    start_x: Option<i32>,
    #[serde(rename = "startY", skip_serializing_if = "Option::is_none")]
    start_y: Option<i32>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Decodes one command from a complete payload.
///
/// Pure: the same bytes always produce the same result.
///
/// # Errors
///
/// Returns [`DecodeError::Malformed`] if `bytes` is not a single JSON object.
///
/// # Examples
///
/// ```rust
/// use touch_core::{decode_command, InputCommand, Point};
///
/// let cmd = decode_command(br#"{"type":"click","x":100,"y":200}"#).unwrap();
/// assert_eq!(cmd, InputCommand::Click { at: Point::new(100, 200) });
/// ```
pub fn decode_command(bytes: &[u8]) -> Result<InputCommand, DecodeError> {
    let record: Map<String, Value> =
        serde_json::from_slice(bytes).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let kind = str_field(&record, "type");
    let at = point_field(&record, "x", "y");

    let cmd = match CommandKind::from_wire(kind) {
        CommandKind::Click => InputCommand::Click { at },
        CommandKind::Tap => InputCommand::Tap { at },
        CommandKind::Scroll => InputCommand::Scroll {
            at,
            delta_y: float_field(&record, "deltaY"),
        },
        CommandKind::DragMove => InputCommand::DragMove {
            start: point_field(&record, "startX", "startY"),
            to: at,
        },
        CommandKind::DragEnd => InputCommand::DragEnd,
        CommandKind::PressStart => InputCommand::PressStart { at },
        CommandKind::Unrecognized => InputCommand::Unrecognized {
            kind: kind.to_string(),
        },
    };
    Ok(cmd)
}

/// Encodes a command as its canonical wire record.
///
/// A non-finite `deltaY` has no JSON representation and is written as
/// `null`, which decodes back as `0.0`.
///
/// # Errors
///
/// Returns [`EncodeError`] if serialization fails.
///
/// # Examples
///
/// ```rust
/// use touch_core::{decode_command, encode_command, InputCommand, Point};
///
/// let original = InputCommand::Scroll { at: Point::new(50, 50), delta_y: 2.0 };
/// let bytes = encode_command(&original).unwrap();
/// assert_eq!(decode_command(&bytes).unwrap(), original);
/// ```
pub fn encode_command(cmd: &InputCommand) -> Result<Vec<u8>, EncodeError> {
    let mut record = WireRecord {
        kind: cmd.wire_type(),
        x: None,
        y: None,
        delta_y: None,
        start_x: None,
        start_y: None,
    };

    match cmd {
        InputCommand::Click { at }
        | InputCommand::Tap { at }
        | InputCommand::PressStart { at } => {
            record.x = Some(at.x);
            record.y = Some(at.y);
        }
        InputCommand::Scroll { at, delta_y } => {
            record.x = Some(at.x);
            record.y = Some(at.y);
            record.delta_y = Some(*delta_y);
        }
        InputCommand::DragMove { start, to } => {
            record.x = Some(to.x);
            record.y = Some(to.y);
            record.start_x = Some(start.x);
            record.start_y = Some(start.y);
        }
        InputCommand::DragEnd | InputCommand::Unrecognized { .. } => {}
    }

    Ok(serde_json::to_vec(&record)?)
}

// ── Field extraction ──────────────────────────────────────────────────────────

fn str_field<'a>(record: &'a Map<String, Value>, key: &str) -> &'a str {
    match record.get(key) {
        Some(Value::String(s)) => s,
        Some(other) => {
            trace!("field {key} is not a string ({other}); treating as empty");
            ""
        }
        None => "",
    }
}

fn int_field(record: &Map<String, Value>, key: &str) -> i32 {
    let Some(value) = record.get(key) else {
        return 0;
    };
    let converted = match value {
        Value::Number(n) => number_to_i32(n),
        _ => None,
    };
    match converted {
        Some(v) => v,
        None => {
            trace!("field {key} is not an integral i32 ({value}); defaulting to 0");
            0
        }
    }
}

/// Integral numbers in `i32` range convert; everything else is rejected.
/// `100.0` is integral, `100.5` and `1e12` are not representable.
fn number_to_i32(n: &serde_json::Number) -> Option<i32> {
    if let Some(i) = n.as_i64() {
        return i32::try_from(i).ok();
    }
    let f = n.as_f64()?;
    let in_range = f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX);
    (f.fract() == 0.0 && in_range).then_some(f as i32)
}

fn float_field(record: &Map<String, Value>, key: &str) -> f64 {
    record.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn point_field(record: &Map<String, Value>, x_key: &str, y_key: &str) -> Point {
    Point::new(int_field(record, x_key), int_field(record, y_key))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
