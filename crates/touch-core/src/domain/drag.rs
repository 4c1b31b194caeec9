//! Drag state tracker.
//!
//! A two-state machine owned by the dispatcher:
//!
//! ```text
//!               press_start(p)            begin_or_continue(q)
//!   Inactive ───────────────────► Active ◄──────────────────┐
//!      ▲  │                         │  └──────────────────────┘
//!      │  │ begin_or_continue(q)    │
//!      │  └────────────────────────►│   (returns `true`: caller must
//!      │                            │    synthesize the missing press)
//!      └────────── end() ───────────┘
//! ```
//!
//! The anchor is set only on the Inactive→Active transition; subsequent moves
//! update the current point and leave the anchor alone.  `end()` is
//! idempotent.

use crate::domain::geometry::Point;

/// Whether a drag is in progress, where it started, and where it is now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragState {
    active: bool,
    anchor: Point,
    current: Point,
}

impl DragState {
    /// Creates an inactive tracker.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The point where the active (or last) drag started.
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// The most recent pointer position seen by the tracker.
    pub fn current(&self) -> Point {
        self.current
    }

    /// Records an explicit press: anchor = current = `at`, state → active.
    ///
    /// A press while a drag is already active re-anchors it.
    pub fn press_start(&mut self, at: Point) {
        self.active = true;
        self.anchor = at;
        self.current = at;
    }

    /// Advances the drag to `to`.
    ///
    /// Returns `true` when the tracker was inactive, i.e. the drag is starting
    /// here without a preceding press and the caller must deliver one at `to`
    /// before the move.
    pub fn begin_or_continue(&mut self, to: Point) -> bool {
        let started = !self.active;
        if started {
            self.active = true;
            self.anchor = to;
        }
        self.current = to;
        started
    }

    /// Ends the drag.  Safe to call when no drag is active.
    pub fn end(&mut self) {
        self.active = false;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tracker_is_inactive() {
        assert!(!DragState::new().is_active());
    }

    #[test]
    fn test_press_start_activates_and_sets_anchor() {
        // Arrange
        let mut drag = DragState::new();

        // Act
        drag.press_start(Point::new(5, 6));

        // Assert
        assert!(drag.is_active());
        assert_eq!(drag.anchor(), Point::new(5, 6));
        assert_eq!(drag.current(), Point::new(5, 6));
    }

    #[test]
    fn test_move_while_inactive_starts_drag_and_requests_press() {
        let mut drag = DragState::new();

        let needs_press = drag.begin_or_continue(Point::new(10, 10));

        assert!(needs_press);
        assert!(drag.is_active());
        assert_eq!(drag.anchor(), Point::new(10, 10));
    }

    #[test]
    fn test_move_while_active_keeps_anchor_and_updates_current() {
        // Arrange
        let mut drag = DragState::new();
        drag.press_start(Point::new(1, 2));

        // Act
        let needs_press = drag.begin_or_continue(Point::new(30, 40));

        // Assert
        assert!(!needs_press);
        assert_eq!(drag.anchor(), Point::new(1, 2));
        assert_eq!(drag.current(), Point::new(30, 40));
    }

    #[test]
    fn test_end_is_idempotent() {
        let mut drag = DragState::new();
        drag.press_start(Point::ORIGIN);

        drag.end();
        drag.end();

        assert!(!drag.is_active());
    }

    #[test]
    fn test_move_after_end_requests_a_new_press() {
        let mut drag = DragState::new();
        drag.begin_or_continue(Point::new(1, 1));
        drag.end();

        assert!(drag.begin_or_continue(Point::new(2, 2)));
        assert_eq!(drag.anchor(), Point::new(2, 2));
    }
}
