//! Recording surface for tests.
//!
//! `MockSurface` replaces a real GUI window with plain geometry: the surface
//! sits at a global `origin`, and child elements are rectangles in
//! surface-local coordinates.  Each delivered event is pushed into a
//! `RefCell<Vec<...>>` so tests can assert exactly what was sent, to whom,
//! and in what order.
//!
//! ```ignore
//! let surface = Rc::new(
//!     MockSurface::new(800, 600).with_element(ElementId(1), Rect::new(100, 100, 50, 50)),
//! );
//! // ... drive a Dispatcher holding `surface` ...
//! assert_eq!(surface.deliveries()[0].0, Receiver::Element(ElementId(1)));
//! ```
//!
//! The dispatcher is single-threaded, so interior mutability via `RefCell`
//! is sufficient.

use std::cell::RefCell;

use touch_core::{DeliveryOutcome, ElementId, Point, Receiver, Rect, SyntheticEvent};

use crate::application::dispatch::TargetSurface;

/// One placed child element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MockElement {
    pub id: ElementId,
    /// Bounds in surface-local coordinates.
    pub bounds: Rect,
    /// Outcome reported for events delivered to this element.
    pub accepts: bool,
}

/// In-memory surface that records every delivery.
#[derive(Debug)]
pub struct MockSurface {
    origin: Point,
    bounds: Rect,
    elements: Vec<MockElement>,
    deliveries: RefCell<Vec<(Receiver, SyntheticEvent)>>,
}

impl MockSurface {
    /// A `width`×`height` surface at the global origin with no elements.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            origin: Point::ORIGIN,
            bounds: Rect::new(0, 0, width, height),
            elements: Vec::new(),
            deliveries: RefCell::new(Vec::new()),
        }
    }

    /// Places the surface at `origin` in global coordinates.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Adds an element that accepts events.  Later elements sit on top.
    pub fn with_element(mut self, id: ElementId, bounds: Rect) -> Self {
        self.elements.push(MockElement {
            id,
            bounds,
            accepts: true,
        });
        self
    }

    /// Adds an element that reports every event as ignored.
    pub fn with_ignoring_element(mut self, id: ElementId, bounds: Rect) -> Self {
        self.elements.push(MockElement {
            id,
            bounds,
            accepts: false,
        });
        self
    }

    /// Snapshot of everything delivered so far.
    pub fn deliveries(&self) -> Vec<(Receiver, SyntheticEvent)> {
        self.deliveries.borrow().clone()
    }

    pub fn clear(&self) {
        self.deliveries.borrow_mut().clear();
    }

    fn element(&self, id: ElementId) -> Option<&MockElement> {
        self.elements.iter().find(|e| e.id == id)
    }
}

impl TargetSurface for MockSurface {
    fn map_to_global(&self, local: Point) -> Point {
        local + self.origin
    }

    fn element_at(&self, global: Point) -> Option<ElementId> {
        let local = global - self.origin;
        self.elements
            .iter()
            .rev()
            .find(|e| e.bounds.contains(local))
            .map(|e| e.id)
    }

    fn map_from_global(&self, receiver: Receiver, global: Point) -> Point {
        let local = global - self.origin;
        match receiver {
            Receiver::Element(id) => match self.element(id) {
                Some(e) => local - e.bounds.origin,
                None => local,
            },
            Receiver::Surface => local,
        }
    }

    fn deliver(&self, receiver: Receiver, event: SyntheticEvent) -> DeliveryOutcome {
        self.deliveries.borrow_mut().push((receiver, event));
        let accepts = match receiver {
            Receiver::Surface => self.bounds.contains(event.local()),
            Receiver::Element(id) => self.element(id).is_some_and(|e| e.accepts),
        };
        if accepts {
            DeliveryOutcome::Accepted
        } else {
            DeliveryOutcome::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> MockSurface {
        MockSurface::new(400, 300)
            .with_origin(Point::new(50, 20))
            .with_element(ElementId(1), Rect::new(10, 10, 100, 100))
            .with_element(ElementId(2), Rect::new(60, 60, 20, 20))
    }

    #[test]
    fn test_topmost_element_wins_hit_test() {
        let s = surface();

        assert_eq!(s.element_at(Point::new(50 + 65, 20 + 65)), Some(ElementId(2)));
        assert_eq!(s.element_at(Point::new(50 + 15, 20 + 15)), Some(ElementId(1)));
        assert_eq!(s.element_at(Point::new(50 + 200, 20 + 200)), None);
    }

    #[test]
    fn test_map_from_global_into_element_space() {
        let s = surface();

        let local = s.map_from_global(Receiver::Element(ElementId(1)), Point::new(70, 45));

        assert_eq!(local, Point::new(10, 15));
    }

    #[test]
    fn test_deliveries_are_recorded_in_order() {
        // Arrange
        let s = MockSurface::new(10, 10).with_ignoring_element(ElementId(3), Rect::new(0, 0, 5, 5));
        let press = SyntheticEvent::Press {
            local: Point::new(1, 1),
            global: Point::new(1, 1),
        };
        let release = SyntheticEvent::Release {
            local: Point::new(1, 1),
            global: Point::new(1, 1),
        };

        // Act
        let first = s.deliver(Receiver::Element(ElementId(3)), press);
        let second = s.deliver(Receiver::Surface, release);

        // Assert
        assert_eq!(first, DeliveryOutcome::Ignored);
        assert_eq!(second, DeliveryOutcome::Accepted);
        assert_eq!(
            s.deliveries(),
            vec![
                (Receiver::Element(ElementId(3)), press),
                (Receiver::Surface, release)
            ]
        );
        s.clear();
        assert!(s.deliveries().is_empty());
    }
}
