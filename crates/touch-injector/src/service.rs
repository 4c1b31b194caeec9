//! The injector service: listener + handoff channel + dispatcher.
//!
//! # Threads (for beginners)
//!
//! ```text
//!  client ──socket──▶ listener thread ──mpsc──▶ foreground (this type) ──▶ TargetSurface
//!                        │                          │
//!                        └──────── DiagnosticsSink ◀┘
//! ```
//!
//! `InjectorService` lives on the foreground thread, the one that owns the
//! GUI.  It is `!Send` because the dispatcher holds its surface through an
//! `Rc`.  The foreground drives it in one of two ways:
//!
//! - **Embedded** in an existing event loop: call [`InjectorService::pump`]
//!   whenever the loop wakes, and wake it no later than
//!   [`InjectorService::next_deadline`].
//! - **Standalone**: `await` [`InjectorService::run_until`] on a
//!   current-thread Tokio runtime.

use std::future::Future;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::time;
use touch_core::InputCommand;
use tracing::{error, info, warn};

use crate::application::dispatch::{DispatchSettings, Dispatcher, TargetSurface};
use crate::infrastructure::diagnostics::DiagnosticsSink;
use crate::infrastructure::listener::{
    start_listener, ListenerConfig, ListenerError, ListenerHandle,
};
use crate::infrastructure::storage::config::InjectorConfig;

/// Decoded commands that may wait between the listener and the foreground.
/// Intake is one connection at a time, so one slot is enough.
pub const HANDOFF_CAPACITY: usize = 1;

/// A dispatcher attached to a surface, plus its socket listener.
pub struct InjectorService {
    dispatcher: Dispatcher,
    diagnostics: Arc<DiagnosticsSink>,
    listener_config: ListenerConfig,
    listener: Option<ListenerHandle>,
    commands: Option<mpsc::Receiver<InputCommand>>,
}

impl InjectorService {
    /// Attaches a new service to `surface`.  Nothing is bound until
    /// [`start`](Self::start).
    pub fn attach(
        surface: Rc<dyn TargetSurface>,
        listener_config: ListenerConfig,
        dispatch: DispatchSettings,
        diagnostics: Arc<DiagnosticsSink>,
    ) -> Self {
        let log = Arc::clone(&diagnostics);
        Self {
            dispatcher: Dispatcher::new(surface, log, dispatch),
            diagnostics,
            listener_config,
            listener: None,
            commands: None,
        }
    }

    /// [`attach`](Self::attach) with settings taken from a loaded config.
    pub fn from_config(
        surface: Rc<dyn TargetSurface>,
        config: &InjectorConfig,
        diagnostics: Arc<DiagnosticsSink>,
    ) -> Self {
        Self::attach(
            surface,
            config.listener_config(),
            config.dispatch_settings(),
            diagnostics,
        )
    }

    /// Binds the socket and starts the listener thread.
    ///
    /// On failure the error is also written to the diagnostics log and the
    /// service stays attached but inert: `pump` and `run_until` keep working
    /// and simply never receive a command.  Calling `start` while already
    /// listening does nothing.
    ///
    /// # Errors
    ///
    /// Returns the [`ListenerError`] that prevented the listener from starting.
    pub fn start(&mut self) -> Result<(), ListenerError> {
        if self.listener.is_some() {
            return Ok(());
        }
        self.diagnostics.record("=== Touch injector starting ===");

        let (tx, rx) = mpsc::channel(HANDOFF_CAPACITY);
        match start_listener(self.listener_config.clone(), tx, Arc::clone(&self.diagnostics)) {
            Ok(handle) => {
                self.listener = Some(handle);
                self.commands = Some(rx);
                Ok(())
            }
            Err(e) => {
                error!("touch injector unavailable: {e}");
                self.diagnostics
                    .record(&format!("Failed to start touch injector: {e}"));
                Err(e)
            }
        }
    }

    /// Stops the listener, removes the socket file, and releases anything
    /// still pressed.
    ///
    /// Commands received but not yet dispatched are discarded.  Returns
    /// within about one poll interval.  Later calls do nothing.
    pub fn stop(&mut self) {
        let Some(mut listener) = self.listener.take() else {
            return;
        };
        // Closed first so a listener blocked on a full channel wakes now.
        if let Some(rx) = self.commands.as_mut() {
            rx.close();
        }
        listener.stop();

        if let Some(mut rx) = self.commands.take() {
            let mut discarded = 0usize;
            while rx.try_recv().is_ok() {
                discarded += 1;
            }
            if discarded > 0 {
                self.diagnostics
                    .record(&format!("Discarded {discarded} undispatched commands"));
            }
        }

        self.dispatcher.shutdown();
        info!("touch injector stopped");
        self.diagnostics.record("=== Touch injector stopped ===");
    }

    /// `true` while the listener thread is serving the socket.
    pub fn is_listening(&self) -> bool {
        self.listener.as_ref().is_some_and(ListenerHandle::is_running)
    }

    pub fn socket_path(&self) -> &Path {
        &self.listener_config.socket_path
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn diagnostics(&self) -> &DiagnosticsSink {
        &self.diagnostics
    }

    /// Earliest instant at which [`pump`](Self::pump) has timed work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.dispatcher.next_deadline()
    }

    /// Dispatches every command waiting in the channel and every release
    /// due at `now`, without blocking.
    ///
    /// Returns the number of commands dispatched.
    pub fn pump(&mut self, now: Instant) -> usize {
        self.dispatcher.run_due(now);

        let mut handled = 0;
        while let Some(rx) = self.commands.as_mut() {
            match rx.try_recv() {
                Ok(cmd) => {
                    self.dispatcher.handle_at(cmd, now);
                    handled += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.listener_gone();
                    break;
                }
            }
        }

        self.dispatcher.run_due(now);
        handled
    }

    /// Serves commands until `shutdown` resolves, then [`stop`](Self::stop)s.
    ///
    /// Must be awaited on the thread that owns the surface, e.g. inside a
    /// current-thread runtime or a `LocalSet`.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let deadline = self.dispatcher.next_deadline();
            tokio::select! {
                _ = &mut shutdown => break,
                cmd = next_command(self.commands.as_mut()) => match cmd {
                    Some(cmd) => self.dispatcher.handle(cmd),
                    None => self.listener_gone(),
                },
                _ = sleep_until(deadline) => {
                    self.dispatcher.run_due(Instant::now());
                }
            }
        }

        self.stop();
    }

    /// The listener thread ended without being asked to.
    fn listener_gone(&mut self) {
        warn!("touch listener ended unexpectedly; no further commands will arrive");
        self.diagnostics.record("Input listener ended unexpectedly");
        self.commands = None;
    }
}

impl Drop for InjectorService {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn next_command(rx: Option<&mut mpsc::Receiver<InputCommand>>) -> Option<InputCommand> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => time::sleep_until(time::Instant::from_std(at)).await,
        None => std::future::pending().await,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
