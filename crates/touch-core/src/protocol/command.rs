//! Decoded input commands.
//!
//! # Wire `type` → command mapping
//!
//! | `type` string              | Command                      |
//! |----------------------------|------------------------------|
//! | `click`                    | [`InputCommand::Click`]      |
//! | `tap`, `touch`             | [`InputCommand::Tap`]        |
//! | `scroll`                   | [`InputCommand::Scroll`]     |
//! | `drag`                     | [`InputCommand::DragMove`]   |
//! | `dragend`                  | [`InputCommand::DragEnd`]    |
//! | `mousedown`, `touchstart`  | [`InputCommand::PressStart`] |
//! | anything else, or missing  | [`InputCommand::Unrecognized`] |
//!
//! `touch` is the legacy name of a tap and is kept for old clients.

use std::fmt;

use crate::domain::geometry::Point;

/// One command read from the socket.  Immutable once decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum InputCommand {
    Click {
        at: Point,
    },
    Tap {
        at: Point,
    },
    Scroll {
        at: Point,
        /// Wheel notches; positive scrolls down.
        delta_y: f64,
    },
    DragMove {
        /// Anchor claimed by the client.  Informational only: the dispatcher
        /// tracks the real anchor itself.
        start: Point,
        to: Point,
    },
    DragEnd,
    PressStart {
        at: Point,
    },
    /// A well-formed record whose `type` is missing or unknown.
    Unrecognized {
        kind: String,
    },
}

/// The discriminant of an [`InputCommand`], without its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Click,
    Tap,
    Scroll,
    DragMove,
    DragEnd,
    PressStart,
    Unrecognized,
}

impl CommandKind {
    /// Maps a wire `type` string to its kind.
    pub fn from_wire(kind: &str) -> CommandKind {
        match kind {
            "click" => CommandKind::Click,
            "tap" | "touch" => CommandKind::Tap,
            "scroll" => CommandKind::Scroll,
            "drag" => CommandKind::DragMove,
            "dragend" => CommandKind::DragEnd,
            "mousedown" | "touchstart" => CommandKind::PressStart,
            _ => CommandKind::Unrecognized,
        }
    }

    /// The canonical wire `type` string the encoder emits for this kind.
    ///
    /// `None` for [`CommandKind::Unrecognized`], whose string is carried by
    /// the command itself.
    pub fn wire_name(self) -> Option<&'static str> {
        match self {
            CommandKind::Click => Some("click"),
            CommandKind::Tap => Some("tap"),
            CommandKind::Scroll => Some("scroll"),
            CommandKind::DragMove => Some("drag"),
            CommandKind::DragEnd => Some("dragend"),
            CommandKind::PressStart => Some("mousedown"),
            CommandKind::Unrecognized => None,
        }
    }
}

impl InputCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            InputCommand::Click { .. } => CommandKind::Click,
            InputCommand::Tap { .. } => CommandKind::Tap,
            InputCommand::Scroll { .. } => CommandKind::Scroll,
            InputCommand::DragMove { .. } => CommandKind::DragMove,
            InputCommand::DragEnd => CommandKind::DragEnd,
            InputCommand::PressStart { .. } => CommandKind::PressStart,
            InputCommand::Unrecognized { .. } => CommandKind::Unrecognized,
        }
    }

    /// The wire `type` string of this command.
    pub fn wire_type(&self) -> &str {
        match self {
            InputCommand::Unrecognized { kind } => kind,
            other => other.kind().wire_name().unwrap_or_default(),
        }
    }

    /// The pointer position the command targets, if it has one.
    pub fn position(&self) -> Option<Point> {
        match *self {
            InputCommand::Click { at }
            | InputCommand::Tap { at }
            | InputCommand::Scroll { at, .. }
            | InputCommand::PressStart { at } => Some(at),
            InputCommand::DragMove { to, .. } => Some(to),
            InputCommand::DragEnd | InputCommand::Unrecognized { .. } => None,
        }
    }
}

impl fmt::Display for InputCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputCommand::Click { at } => write!(f, "click at {at}"),
            InputCommand::Tap { at } => write!(f, "tap at {at}"),
            InputCommand::Scroll { at, delta_y } => write!(f, "scroll at {at} deltaY={delta_y}"),
            InputCommand::DragMove { start, to } => write!(f, "drag from {start} to {to}"),
            InputCommand::DragEnd => f.write_str("dragend"),
            InputCommand::PressStart { at } => write!(f, "press start at {at}"),
            InputCommand::Unrecognized { kind } => write!(f, "unrecognized type {kind:?}"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
