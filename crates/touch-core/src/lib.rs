//! # touch-core
//!
//! Shared library for the touch injector containing the socket wire codec,
//! the drag state machine, and the synthetic event types delivered to a GUI
//! target surface.
//!
//! This crate is used by both the injector service and the `touch-send`
//! client.  It has zero dependencies on OS APIs, GUI toolkits, or sockets.
//!
//! # Architecture overview (for beginners)
//!
//! The touch injector is a debug aid for a GUI application: an external
//! process connects to a local Unix socket, writes one small JSON record
//! (`{"type":"click","x":100,"y":200}`), and disconnects.  The injector turns
//! that record into native press/release/move/wheel events against the
//! running GUI.
//!
//! This crate (`touch-core`) is the shared foundation.  It defines:
//!
//! - **`protocol`** – How a command travels over the socket.  One JSON
//!   object per connection, decoded permissively into an [`InputCommand`].
//!
//! - **`domain`** – Pure types with no OS dependencies: screen geometry,
//!   the [`DragState`] tracker, and the [`SyntheticEvent`]s the dispatcher
//!   hands to the GUI.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `touch_core::InputCommand` instead of `touch_core::protocol::command::InputCommand`.
pub use domain::drag::DragState;
pub use domain::event::{DeliveryOutcome, ElementId, Receiver, SyntheticEvent};
pub use domain::geometry::{Point, Rect};
pub use protocol::codec::{
    decode_command, encode_command, DecodeError, EncodeError, MAX_PAYLOAD_BYTES,
};
pub use protocol::command::{CommandKind, InputCommand};
