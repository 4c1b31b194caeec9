//! Target surface adapters.
//!
//! The dispatcher only sees [`crate::application::dispatch::TargetSurface`].
//! A GUI embedding provides its own implementation around the real window;
//! this module ships the two that need no toolkit:
//!
//! - **`headless`** – [`HeadlessSurface`], a fixed-size surface with no
//!   child elements that logs every event.  Used by the host binary.
//! - **`mock`** – [`MockSurface`], an in-memory surface with placeable
//!   elements that records every delivery.  Used by tests.

pub mod headless;
pub mod mock;

pub use headless::HeadlessSurface;
pub use mock::MockSurface;
