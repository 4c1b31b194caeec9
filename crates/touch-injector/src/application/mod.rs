//! Application layer use cases for the injector.
//!
//! # What use cases does the injector have?
//!
//! - **`dispatch`** – Turns decoded [`touch_core::InputCommand`]s into
//!   synthetic press/release/move/wheel events against the GUI target
//!   surface.  The surface is injected at construction time through the
//!   [`dispatch::TargetSurface`] trait, so this layer never depends on a GUI
//!   toolkit, a socket, or a file.

pub mod dispatch;
