//! Synthetic input events and their receivers.
//!
//! The dispatcher never talks to a GUI toolkit directly.  It builds one of
//! these toolkit-neutral [`SyntheticEvent`]s and hands it, together with a
//! [`Receiver`], to the target surface, which translates it into the
//! toolkit's native event type.
//!
//! All pointer events use the primary (left) button: a press pushes it down,
//! a move is reported with the button held, and a release lets it go.

use std::fmt;

use crate::domain::geometry::Point;

/// Opaque identifier of a GUI element, assigned by the target surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where an event is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Receiver {
    /// The top-level target surface itself.
    Surface,
    /// An element found by hit-testing a global point.
    Element(ElementId),
}

impl fmt::Display for Receiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Receiver::Surface => f.write_str("surface"),
            Receiver::Element(id) => write!(f, "element {id}"),
        }
    }
}

/// A toolkit-neutral input event.
///
/// `local` is expressed in the receiver's own coordinate space, `global` in
/// the display's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyntheticEvent {
    Press { local: Point, global: Point },
    Release { local: Point, global: Point },
    Move { local: Point, global: Point },
    /// Vertical wheel rotation; positive values scroll down.
    Wheel { local: Point, global: Point, delta_y: i32 },
}

impl SyntheticEvent {
    /// Short lowercase name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            SyntheticEvent::Press { .. } => "press",
            SyntheticEvent::Release { .. } => "release",
            SyntheticEvent::Move { .. } => "move",
            SyntheticEvent::Wheel { .. } => "wheel",
        }
    }

    pub fn local(&self) -> Point {
        match *self {
            SyntheticEvent::Press { local, .. }
            | SyntheticEvent::Release { local, .. }
            | SyntheticEvent::Move { local, .. }
            | SyntheticEvent::Wheel { local, .. } => local,
        }
    }

    pub fn global(&self) -> Point {
        match *self {
            SyntheticEvent::Press { global, .. }
            | SyntheticEvent::Release { global, .. }
            | SyntheticEvent::Move { global, .. }
            | SyntheticEvent::Wheel { global, .. } => global,
        }
    }
}

/// What the receiver did with a delivered event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Accepted,
    /// Delivered, but no receiver consumed it.  Logged, never an error.
    Ignored,
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryOutcome::Accepted => f.write_str("accepted"),
            DeliveryOutcome::Ignored => f.write_str("ignored"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_accessors_return_positions() {
        let ev = SyntheticEvent::Wheel {
            local: Point::new(1, 2),
            global: Point::new(11, 22),
            delta_y: 30,
        };
        assert_eq!(ev.name(), "wheel");
        assert_eq!(ev.local(), Point::new(1, 2));
        assert_eq!(ev.global(), Point::new(11, 22));
    }

    #[test]
    fn test_receiver_display() {
        assert_eq!(Receiver::Surface.to_string(), "surface");
        assert_eq!(Receiver::Element(ElementId(7)).to_string(), "element #7");
    }
}
