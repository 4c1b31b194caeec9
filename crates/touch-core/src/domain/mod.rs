//! Domain module: pure types with no I/O.

pub mod drag;
pub mod event;
pub mod geometry;
