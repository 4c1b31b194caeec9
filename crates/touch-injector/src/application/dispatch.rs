//! Dispatcher: replays decoded commands as synthetic input on the foreground.
//!
//! The dispatcher runs on the thread that owns the GUI.  It is deliberately
//! `!Send`: it holds the target surface through an `Rc`, so the compiler
//! rejects any attempt to move it onto the listener thread.
//!
//! # Per-command behaviour
//!
//! | Command     | Effect |
//! |-------------|--------|
//! | PressStart  | Drag → active, anchor recorded.  No event. |
//! | DragMove    | If no drag is active, press at the current point first.  Then move. |
//! | DragEnd     | Drag → inactive.  No event (reset only). |
//! | Click / Tap | Press now; release to the same receiver after the tap delay. |
//! | Scroll      | Wheel to the resolved element, then the same wheel to the surface. |
//! | Unrecognized| Nothing. |
//!
//! # Coordinate resolution
//!
//! Command coordinates are surface-local.  They are mapped to global space by
//! the surface, hit-tested to find the receiving element, and mapped back
//! into that element's local space.  When nothing is hit, the surface itself
//! receives the event at the original coordinates.
//!
//! # Delayed releases
//!
//! The tap release is not a sleep.  It is queued with a deadline, and the
//! foreground loop calls [`Dispatcher::run_due`] when
//! [`Dispatcher::next_deadline`] passes, so the GUI keeps processing events
//! during the 50 ms window.

use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use touch_core::{
    DeliveryOutcome, DragState, ElementId, InputCommand, Point, Receiver, SyntheticEvent,
};
use tracing::debug;

/// Default delay between the press and release of a tap.
pub const DEFAULT_TAP_RELEASE_DELAY: Duration = Duration::from_millis(50);

/// Default multiplier from wire `deltaY` notches to wheel delta units.
pub const DEFAULT_SCROLL_SCALE: f64 = 15.0;

/// What the dispatcher needs from the GUI toolkit.
///
/// Implementations wrap the real toolkit window; tests use recording fakes.
#[cfg_attr(test, mockall::automock)]
pub trait TargetSurface {
    /// Maps a surface-local point to display-global coordinates.
    fn map_to_global(&self, local: Point) -> Point;

    /// Returns the receivable element occupying `global`, if any.
    fn element_at(&self, global: Point) -> Option<ElementId>;

    /// Maps a global point into `receiver`'s local coordinates.
    fn map_from_global(&self, receiver: Receiver, global: Point) -> Point;

    /// Delivers `event` synchronously and reports whether it was consumed.
    fn deliver(&self, receiver: Receiver, event: SyntheticEvent) -> DeliveryOutcome;
}

/// Append-only sink for human-readable diagnostic lines.
///
/// Shared between the listener thread and the foreground, hence `Send + Sync`.
pub trait DiagnosticsLog: Send + Sync {
    fn record(&self, line: &str);
}

/// Tunables of the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchSettings {
    pub tap_release_delay: Duration,
    pub scroll_scale: f64,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            tap_release_delay: DEFAULT_TAP_RELEASE_DELAY,
            scroll_scale: DEFAULT_SCROLL_SCALE,
        }
    }
}

/// A receiver resolved for one command.
#[derive(Debug, Clone, Copy)]
struct Target {
    receiver: Receiver,
    local: Point,
    global: Point,
}

/// A release waiting for its deadline.
#[derive(Debug)]
struct PendingRelease {
    due: Instant,
    receiver: Receiver,
    event: SyntheticEvent,
}

/// Converts wire notches to an integer wheel delta.
///
/// Truncates toward zero; saturates at the `i32` bounds; NaN becomes 0.
pub fn scaled_wheel_delta(delta_y: f64, scale: f64) -> i32 {
    (delta_y * scale) as i32
}

/// The dispatch use case.
pub struct Dispatcher {
    surface: Rc<dyn TargetSurface>,
    log: Arc<dyn DiagnosticsLog>,
    settings: DispatchSettings,
    drag: DragState,
    pending: VecDeque<PendingRelease>,
}

impl Dispatcher {
    /// Creates a dispatcher attached to `surface`.
    pub fn new(
        surface: Rc<dyn TargetSurface>,
        log: Arc<dyn DiagnosticsLog>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            surface,
            log,
            settings,
            drag: DragState::new(),
            pending: VecDeque::new(),
        }
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Number of tap releases still waiting for their deadline.
    pub fn pending_releases(&self) -> usize {
        self.pending.len()
    }

    /// Deadline of the earliest queued release.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.front().map(|p| p.due)
    }

    /// Handles one command, timestamped with the current instant.
    pub fn handle(&mut self, cmd: InputCommand) {
        self.handle_at(cmd, Instant::now());
    }

    /// Handles one command as if it arrived at `now`.
    pub fn handle_at(&mut self, cmd: InputCommand, now: Instant) {
        debug!("dispatching {cmd}");
        match cmd {
            InputCommand::Click { at } | InputCommand::Tap { at } => self.tap(at, now),
            InputCommand::Scroll { at, delta_y } => self.scroll(at, delta_y),
            InputCommand::DragMove { start, to } => self.drag_move(start, to),
            InputCommand::DragEnd => {
                // Reset only: clients deliver their own release, if any.
                self.drag.end();
                self.log.record("Drag operation ended");
            }
            InputCommand::PressStart { at } => {
                self.drag.press_start(at);
                self.log.record(&format!("Started potential drag at {at}"));
            }
            InputCommand::Unrecognized { kind } => {
                debug!("ignoring command with unrecognized type {kind:?}");
            }
        }
    }

    /// Delivers every queued release whose deadline is at or before `now`.
    ///
    /// Returns the number delivered.
    pub fn run_due(&mut self, now: Instant) -> usize {
        let mut delivered = 0;
        while self.pending.front().is_some_and(|p| p.due <= now) {
            if let Some(p) = self.pending.pop_front() {
                self.deliver(p.receiver, p.event);
                delivered += 1;
            }
        }
        delivered
    }

    /// Releases everything still pressed and clears the drag.
    ///
    /// Called when the service stops; queued releases are delivered
    /// immediately rather than dropped.
    pub fn shutdown(&mut self) {
        while let Some(p) = self.pending.pop_front() {
            self.deliver(p.receiver, p.event);
        }
        self.drag.end();
    }

    // ── Per-kind handlers ─────────────────────────────────────────────────────

    fn tap(&mut self, at: Point, now: Instant) {
        self.log.record(&format!("Injecting click at {at}"));
        let target = self.resolve(at);

        let press = SyntheticEvent::Press {
            local: target.local,
            global: target.global,
        };
        self.deliver(target.receiver, press);

        self.pending.push_back(PendingRelease {
            due: now + self.settings.tap_release_delay,
            receiver: target.receiver,
            event: SyntheticEvent::Release {
                local: target.local,
                global: target.global,
            },
        });
    }

    fn scroll(&mut self, at: Point, delta_y: f64) {
        self.log
            .record(&format!("Injecting scroll at {at} deltaY={delta_y}"));
        let target = self.resolve(at);
        let delta_y = scaled_wheel_delta(delta_y, self.settings.scroll_scale);

        self.deliver(
            target.receiver,
            SyntheticEvent::Wheel {
                local: target.local,
                global: target.global,
                delta_y,
            },
        );

        // Fallback for elements that do not consume the wheel themselves.
        if target.receiver != Receiver::Surface {
            self.deliver(
                Receiver::Surface,
                SyntheticEvent::Wheel {
                    local: at,
                    global: target.global,
                    delta_y,
                },
            );
        }
    }

    fn drag_move(&mut self, claimed_start: Point, to: Point) {
        self.log.record(&format!(
            "Injecting drag to {to} (client start {claimed_start})"
        ));
        let target = self.resolve(to);

        if self.drag.begin_or_continue(to) {
            self.deliver(
                target.receiver,
                SyntheticEvent::Press {
                    local: target.local,
                    global: target.global,
                },
            );
            self.log.record("Started drag with synthesized press");
        }

        self.deliver(
            target.receiver,
            SyntheticEvent::Move {
                local: target.local,
                global: target.global,
            },
        );
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn resolve(&self, at: Point) -> Target {
        let global = self.surface.map_to_global(at);
        match self.surface.element_at(global) {
            Some(id) => {
                let receiver = Receiver::Element(id);
                Target {
                    receiver,
                    local: self.surface.map_from_global(receiver, global),
                    global,
                }
            }
            None => Target {
                receiver: Receiver::Surface,
                local: at,
                global,
            },
        }
    }

    fn deliver(&self, receiver: Receiver, event: SyntheticEvent) -> DeliveryOutcome {
        let outcome = self.surface.deliver(receiver, event);
        self.log.record(&format!(
            "{} sent to {receiver} at {} (global {}): {outcome}",
            event.name(),
            event.local(),
            event.global(),
        ));
        outcome
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
