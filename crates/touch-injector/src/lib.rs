//! touch-injector library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does touch-injector do? (for beginners)
//!
//! A GUI application sometimes needs to be driven by a process that cannot
//! touch its window directly, such as a remote-control daemon or a test
//! harness.  The injector lets such a process write one small JSON object to
//! a Unix socket:
//!
//! ```text
//! {"type":"click","x":100,"y":200}
//! ```
//!
//! and turns it into real synthetic press/release/move/wheel events on the
//! application's window, exactly as if the user had touched it.
//!
//! 1. A background **listener** thread accepts each connection, reads one
//!    payload, and decodes it with `touch_core`.
//! 2. The decoded command crosses to the GUI thread over a bounded channel.
//! 3. The **dispatcher** hit-tests the point, delivers the events, and keeps
//!    the drag state between commands.
//! 4. Everything interesting is appended to a timestamped **diagnostics**
//!    log.

/// Application layer: the dispatch use case and the traits it depends on.
pub mod application;

/// Infrastructure layer: socket listener, diagnostics file, config, surfaces.
pub mod infrastructure;

/// The assembled service the GUI thread owns.
pub mod service;

pub use service::InjectorService;
