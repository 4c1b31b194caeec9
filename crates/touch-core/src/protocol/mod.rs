//! Protocol module containing the command type and the JSON codec.

pub mod codec;
pub mod command;

pub use codec::{decode_command, encode_command, DecodeError, EncodeError, MAX_PAYLOAD_BYTES};
pub use command::{CommandKind, InputCommand};
