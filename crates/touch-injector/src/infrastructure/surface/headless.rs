//! A surface with no window behind it.
//!
//! Surface-local and global coordinates coincide.  Events inside the
//! configured bounds are accepted and logged at info level; events outside
//! them are ignored.

use std::cell::Cell;

use touch_core::{DeliveryOutcome, ElementId, Point, Receiver, Rect, SyntheticEvent};
use tracing::info;

use crate::application::dispatch::TargetSurface;

#[derive(Debug)]
pub struct HeadlessSurface {
    bounds: Rect,
    accepted: Cell<u64>,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            bounds: Rect::new(0, 0, width, height),
            accepted: Cell::new(0),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Number of events accepted so far.
    pub fn accepted(&self) -> u64 {
        self.accepted.get()
    }
}

impl TargetSurface for HeadlessSurface {
    fn map_to_global(&self, local: Point) -> Point {
        local
    }

    fn element_at(&self, _global: Point) -> Option<ElementId> {
        None
    }

    fn map_from_global(&self, _receiver: Receiver, global: Point) -> Point {
        global
    }

    fn deliver(&self, receiver: Receiver, event: SyntheticEvent) -> DeliveryOutcome {
        if !self.bounds.contains(event.local()) {
            return DeliveryOutcome::Ignored;
        }
        self.accepted.set(self.accepted.get() + 1);
        match event {
            SyntheticEvent::Wheel { local, delta_y, .. } => {
                info!("{receiver}: wheel {delta_y:+} at {local}");
            }
            other => info!("{receiver}: {} at {}", other.name(), other.local()),
        }
        DeliveryOutcome::Accepted
    }
}
