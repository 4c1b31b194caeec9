//! touch-send: deliver one command to a running touch injector.
//!
//! # Usage
//!
//! ```text
//! touch-send [--socket <PATH>] <COMMAND>
//!
//! Commands:
//!   click   <X> <Y>                   Press and release
//!   tap     <X> <Y>                   Same as click
//!   scroll  <X> <Y> <DELTA_Y>         Wheel; one notch = 1.0
//!   press   <X> <Y>                   Arm a drag (no event)
//!   drag    <START_X> <START_Y> <X> <Y>
//!   dragend                           Reset the drag state
//!   raw     <JSON>                    Send a payload verbatim
//! ```
//!
//! Each invocation opens one connection, writes one JSON object, and closes
//! it, which is the only exchange the injector understands.  Nothing is read
//! back; check the injector's diagnostics log for the outcome.

use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use touch_core::{encode_command, InputCommand, Point};

// ── CLI argument definitions ──────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name = "touch-send",
    about = "Send one input command to a touch injector socket",
    version
)]
struct Cli {
    /// Injector socket path.
    #[arg(long, default_value = "/tmp/ui_touch_socket", env = "TOUCH_INJECTOR_SOCKET")]
    socket: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Press and release at a point.
    #[command(allow_negative_numbers = true)]
    Click { x: i32, y: i32 },
    /// Same as click.
    #[command(allow_negative_numbers = true)]
    Tap { x: i32, y: i32 },
    /// Scroll at a point.  Positive deltas scroll down.
    #[command(allow_negative_numbers = true)]
    Scroll { x: i32, y: i32, delta_y: f64 },
    /// Arm a drag at a point without delivering an event.
    #[command(allow_negative_numbers = true)]
    Press { x: i32, y: i32 },
    /// Move an active drag to (x, y), starting one if needed.
    #[command(allow_negative_numbers = true)]
    Drag {
        start_x: i32,
        start_y: i32,
        x: i32,
        y: i32,
    },
    /// End the current drag.
    Dragend,
    /// Send a payload verbatim, e.g. to probe error handling.
    Raw { json: String },
}

impl Command {
    /// Bytes to write for this command.
    fn into_payload(self) -> anyhow::Result<Vec<u8>> {
        let cmd = match self {
            Command::Raw { json } => return Ok(json.into_bytes()),
            Command::Click { x, y } => InputCommand::Click { at: Point::new(x, y) },
            Command::Tap { x, y } => InputCommand::Tap { at: Point::new(x, y) },
            Command::Scroll { x, y, delta_y } => InputCommand::Scroll {
                at: Point::new(x, y),
                delta_y,
            },
            Command::Press { x, y } => InputCommand::PressStart { at: Point::new(x, y) },
            Command::Drag {
                start_x,
                start_y,
                x,
                y,
            } => InputCommand::DragMove {
                start: Point::new(start_x, start_y),
                to: Point::new(x, y),
            },
            Command::Dragend => InputCommand::DragEnd,
        };
        encode_command(&cmd).with_context(|| format!("encoding {cmd}"))
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let payload = cli.command.into_payload()?;

    let mut stream = UnixStream::connect(&cli.socket)
        .with_context(|| format!("connecting to {}", cli.socket.display()))?;
    stream
        .write_all(&payload)
        .with_context(|| format!("writing to {}", cli.socket.display()))?;
    debug!(
        "sent {} bytes to {}: {}",
        payload.len(),
        cli.socket.display(),
        String::from_utf8_lossy(&payload)
    );
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
