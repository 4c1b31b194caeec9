//! Local socket listener.
//!
//! Owns the filesystem-addressed Unix stream socket and the background thread
//! that serves it.  The thread never touches the GUI: every decoded command
//! crosses to the foreground through a bounded `tokio::sync::mpsc` channel.
//!
//! # Loop (for beginners)
//!
//! ```text
//! while running {
//!     wait ≤ poll_interval for a client    ── timeout → re-check `running`
//!     accept exactly one client
//!     read once, ≤ max_payload_bytes       ── bounded by poll_interval too
//!     close the client
//!     decode → hand off to the dispatcher  ── failures logged, loop continues
//! }
//! ```
//!
//! Cancellation is cooperative: [`ListenerHandle::stop`] clears the `running`
//! flag and joins the thread, which notices within one poll interval because
//! every wait in the loop is bounded by it.
//!
//! The thread drives its socket with a private current-thread Tokio runtime
//! so that "wait for readiness, but no longer than the poll interval" is a
//! plain `tokio::time::timeout` around `accept`/`read`.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread::JoinHandle;
use std::time::Duration;

use thiserror::Error;
use tokio::{
    io::AsyncReadExt,
    net::{UnixListener, UnixStream},
    sync::mpsc,
    time,
};
use touch_core::{decode_command, InputCommand, MAX_PAYLOAD_BYTES};
use tracing::{debug, error, info, warn};

use crate::infrastructure::diagnostics::DiagnosticsSink;

/// Well-known socket path used when none is configured.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/ui_touch_socket";

/// Default bound on every wait inside the listener loop.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Errors that prevent the listener from starting.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The socket could not be created or bound at `path`.
    #[error("failed to bind touch socket at {path}: {source}")]
    BindFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The OS refused to create the listener thread.
    #[error("failed to spawn listener thread: {0}")]
    Spawn(#[source] io::Error),
}

/// Runtime settings of the listener.
#[derive(Debug, Clone, PartialEq)]
pub struct ListenerConfig {
    pub socket_path: PathBuf,
    pub poll_interval: Duration,
    /// Bytes read from a client; the remainder of a longer payload is dropped.
    pub max_payload_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_payload_bytes: MAX_PAYLOAD_BYTES,
        }
    }
}

/// A bound socket plus the thread serving it.
///
/// Dropping the handle stops the listener.
#[derive(Debug)]
pub struct ListenerHandle {
    socket_path: PathBuf,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    diagnostics: Arc<DiagnosticsSink>,
}

/// State moved onto the listener thread.
struct ListenLoop {
    config: ListenerConfig,
    tx: mpsc::Sender<InputCommand>,
    running: Arc<AtomicBool>,
    diagnostics: Arc<DiagnosticsSink>,
}

/// Binds the socket and spawns the listener thread.
///
/// Any stale file at the socket path is removed first.  Nothing is spawned
/// when binding fails.
///
/// # Errors
///
/// Returns [`ListenerError::BindFailed`] if the socket cannot be bound and
/// [`ListenerError::Spawn`] if the thread cannot be created.
pub fn start_listener(
    config: ListenerConfig,
    tx: mpsc::Sender<InputCommand>,
    diagnostics: Arc<DiagnosticsSink>,
) -> Result<ListenerHandle, ListenerError> {
    let socket_path = config.socket_path.clone();
    remove_socket_file(&socket_path);

    let bind_failed = |source| ListenerError::BindFailed {
        path: socket_path.clone(),
        source,
    };
    let listener = std::os::unix::net::UnixListener::bind(&socket_path).map_err(bind_failed)?;
    // Required by `tokio::net::UnixListener::from_std`.
    listener.set_nonblocking(true).map_err(bind_failed)?;

    let running = Arc::new(AtomicBool::new(true));
    let state = ListenLoop {
        config,
        tx,
        running: Arc::clone(&running),
        diagnostics: Arc::clone(&diagnostics),
    };

    let thread = std::thread::Builder::new()
        .name("touch-listener".to_string())
        .spawn(move || state.run(listener))
        .map_err(|e| {
            remove_socket_file(&socket_path);
            ListenerError::Spawn(e)
        })?;

    info!("touch injector listening on {}", socket_path.display());
    diagnostics.record(&format!(
        "Touch injector socket created successfully at {}",
        socket_path.display()
    ));

    Ok(ListenerHandle {
        socket_path,
        running,
        thread: Some(thread),
        diagnostics,
    })
}

impl ListenerHandle {
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// `true` while the listener thread is alive.
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stops the loop, joins the thread, and removes the socket file.
    ///
    /// Blocks for at most about one poll interval.  Later calls do nothing.
    pub fn stop(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        self.running.store(false, Ordering::Release);
        if thread.join().is_err() {
            error!("touch listener thread panicked");
        }
        remove_socket_file(&self.socket_path);
        info!("touch injector stopped listening on {}", self.socket_path.display());
        self.diagnostics.record("Input listener stopped; socket removed");
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl ListenLoop {
    /// Body of the listener thread.
    fn run(self, listener: std::os::unix::net::UnixListener) {
        self.diagnostics.record("Input listener thread started");

        match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime.block_on(self.serve(listener)),
            Err(e) => {
                error!("failed to build listener runtime: {e}");
                self.diagnostics
                    .record(&format!("Listener runtime unavailable: {e}"));
            }
        }

        self.diagnostics.record("Input listener thread ended");
    }

    async fn serve(&self, listener: std::os::unix::net::UnixListener) {
        let listener = match UnixListener::from_std(listener) {
            Ok(l) => l,
            Err(e) => {
                error!("failed to register touch socket: {e}");
                self.diagnostics
                    .record(&format!("Failed to register touch socket: {e}"));
                return;
            }
        };

        while self.is_running() {
            let stream = match time::timeout(self.config.poll_interval, listener.accept()).await {
                // Poll interval elapsed: loop to re-check the flag.
                Err(_) => continue,
                Ok(Err(e)) => {
                    warn!("accept on touch socket failed: {e}");
                    time::sleep(self.config.poll_interval.min(Duration::from_millis(100))).await;
                    continue;
                }
                Ok(Ok((stream, _addr))) => stream,
            };

            if let Some(payload) = self.read_once(stream).await {
                self.handle_payload(&payload).await;
            }
        }
    }

    /// Reads one payload and closes the connection.
    async fn read_once(&self, mut stream: UnixStream) -> Option<Vec<u8>> {
        let mut buf = vec![0u8; self.config.max_payload_bytes];
        let read = time::timeout(self.config.poll_interval, stream.read(&mut buf)).await;
        drop(stream);

        match read {
            Err(_) => {
                debug!("client sent nothing within {:?}", self.config.poll_interval);
                None
            }
            Ok(Err(e)) => {
                warn!("read from touch client failed: {e}");
                None
            }
            Ok(Ok(0)) => None,
            Ok(Ok(n)) => {
                buf.truncate(n);
                Some(buf)
            }
        }
    }

    async fn handle_payload(&self, payload: &[u8]) {
        self.diagnostics.record(&format!(
            "Received raw data: {}",
            String::from_utf8_lossy(payload)
        ));

        match decode_command(payload) {
            Ok(cmd) => {
                self.diagnostics
                    .record(&format!("Parsed input type: {}", cmd.wire_type()));
                self.forward(cmd).await;
            }
            Err(e) => {
                warn!("dropping touch payload: {e}");
                self.diagnostics.record(&format!("Dropping payload: {e}"));
            }
        }
    }

    /// Hands `cmd` to the foreground.
    ///
    /// Waits for channel capacity in poll-interval slices so a stop request
    /// is still noticed.  A receiver closed during shutdown ends the wait at
    /// once.  Returns `false` if the command was dropped.
    async fn forward(&self, cmd: InputCommand) -> bool {
        loop {
            if !self.is_running() {
                self.diagnostics
                    .record(&format!("Listener stopping, dropped {cmd}"));
                return false;
            }
            match time::timeout(self.config.poll_interval, self.tx.reserve()).await {
                Ok(Ok(permit)) => {
                    permit.send(cmd);
                    return true;
                }
                Ok(Err(_closed)) if !self.is_running() => {
                    self.diagnostics
                        .record(&format!("Listener stopping, dropped {cmd}"));
                    return false;
                }
                Ok(Err(_closed)) => {
                    error!("dispatcher channel closed; dropping {cmd}");
                    self.diagnostics
                        .record(&format!("Dispatcher unavailable, dropped {cmd}"));
                    return false;
                }
                Err(_) => debug!("dispatcher busy; still waiting to hand off {cmd}"),
            }
        }
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Removes a socket file, ignoring "not found".
fn remove_socket_file(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!("removed socket file {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("could not remove socket file {}: {e}", path.display()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::net::UnixStream as StdUnixStream;
    use std::time::Instant;
    use touch_core::Point;

    fn temp_socket_path() -> PathBuf {
        let id = uuid::Uuid::new_v4().simple().to_string();
        std::env::temp_dir().join(format!("touch-{}.sock", &id[..12]))
    }

    fn fast_config(path: PathBuf) -> ListenerConfig {
        ListenerConfig {
            socket_path: path,
            poll_interval: Duration::from_millis(100),
            ..Default::default()
        }
    }

    fn recv_within(rx: &mut mpsc::Receiver<InputCommand>, limit: Duration) -> Option<InputCommand> {
        let deadline = Instant::now() + limit;
        while Instant::now() < deadline {
            if let Ok(cmd) = rx.try_recv() {
                return Some(cmd);
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        None
    }

    fn send(path: &Path, payload: &[u8]) {
        let mut client = StdUnixStream::connect(path).expect("connect");
        client.write_all(payload).expect("write");
    }

    #[test]
    fn test_default_config_matches_reference_values() {
        let cfg = ListenerConfig::default();
        assert_eq!(cfg.socket_path, PathBuf::from("/tmp/ui_touch_socket"));
        assert_eq!(cfg.poll_interval, Duration::from_secs(1));
        assert_eq!(cfg.max_payload_bytes, 2048);
    }

    #[test]
    fn test_bind_into_missing_directory_fails_without_spawning() {
        // Arrange
        let (tx, _rx) = mpsc::channel(1);
        let cfg = fast_config(PathBuf::from("/nonexistent-touch-dir/ui.sock"));

        // Act
        let result = start_listener(cfg, tx, Arc::new(DiagnosticsSink::disabled()));

        // Assert
        assert!(matches!(result, Err(ListenerError::BindFailed { .. })));
    }

    #[test]
    fn test_decoded_command_is_forwarded_to_channel() {
        // Arrange
        let path = temp_socket_path();
        let (tx, mut rx) = mpsc::channel(1);
        let mut handle =
            start_listener(fast_config(path.clone()), tx, Arc::new(DiagnosticsSink::disabled()))
                .expect("listener must start");

        // Act
        send(&path, br#"{"type":"click","x":100,"y":200}"#);

        // Assert
        let cmd = recv_within(&mut rx, Duration::from_secs(3));
        assert_eq!(cmd, Some(InputCommand::Click { at: Point::new(100, 200) }));
        handle.stop();
    }

    #[test]
    fn test_malformed_payload_is_dropped_and_loop_continues() {
        // Arrange
        let path = temp_socket_path();
        let (tx, mut rx) = mpsc::channel(1);
        let mut handle =
            start_listener(fast_config(path.clone()), tx, Arc::new(DiagnosticsSink::disabled()))
                .expect("listener must start");

        // Act
        send(&path, b"{not json");
        send(&path, br#"{"type":"dragend"}"#);

        // Assert – only the valid command arrives
        assert_eq!(
            recv_within(&mut rx, Duration::from_secs(3)),
            Some(InputCommand::DragEnd)
        );
        assert!(rx.try_recv().is_err());
        handle.stop();
    }

    #[test]
    fn test_stop_joins_thread_and_removes_socket() {
        // Arrange
        let path = temp_socket_path();
        let (tx, _rx) = mpsc::channel(1);
        let mut handle =
            start_listener(fast_config(path.clone()), tx, Arc::new(DiagnosticsSink::disabled()))
                .expect("listener must start");
        assert!(path.exists());

        // Act
        handle.stop();
        handle.stop();

        // Assert
        assert!(!handle.is_running());
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_stops_listener() {
        let path = temp_socket_path();
        let (tx, _rx) = mpsc::channel(1);
        let handle =
            start_listener(fast_config(path.clone()), tx, Arc::new(DiagnosticsSink::disabled()))
                .expect("listener must start");

        drop(handle);

        assert!(!path.exists());
    }
}
